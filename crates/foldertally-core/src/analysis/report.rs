/// Machine-readable exports of an [`Analysis`]: JSON and CSV.
///
/// Both keep the first-seen entry order of the analysis.
use crate::error::{Error, Result};
use crate::model::{Analysis, InventoryEntry};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output format for [`save_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    log_path: String,
    session_count: u64,
    unique_count: usize,
    entries: &'a [InventoryEntry],
}

/// Write the analysis as pretty-printed JSON.
pub fn write_json<W: Write>(analysis: &Analysis, log_path: &Path, mut writer: W) -> std::io::Result<()> {
    let report = JsonReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        log_path: log_path.to_string_lossy().into_owned(),
        session_count: analysis.session_count,
        unique_count: analysis.unique_count(),
        entries: &analysis.entries,
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Write the analysis as CSV with a `name,count` header.
pub fn write_csv<W: Write>(analysis: &Analysis, writer: W) -> std::io::Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(["name", "count"])?;
    for entry in &analysis.entries {
        csv.serialize(entry)?;
    }
    csv.flush()
}

/// Write the analysis to `out_path` in the given format.
pub fn save_report(
    analysis: &Analysis,
    log_path: &Path,
    format: ReportFormat,
    out_path: &Path,
) -> Result<()> {
    let report_err = |e: std::io::Error| Error::Report {
        path: out_path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::create(out_path).map_err(report_err)?;
    let writer = BufWriter::new(file);
    match format {
        ReportFormat::Json => write_json(analysis, log_path, writer),
        ReportFormat::Csv => write_csv(analysis, writer),
    }
    .map_err(report_err)?;

    tracing::info!("Wrote {:?} report to {}", format, out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Analysis {
        let mut a = Analysis::new();
        a.record_separator();
        a.observe("zeta");
        a.observe("alpha, with comma");
        a.record_separator();
        a.observe("zeta");
        a
    }

    #[test]
    fn csv_has_header_and_first_seen_order() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "name,count\nzeta,2\n\"alpha, with comma\",1\n");
    }

    #[test]
    fn csv_of_empty_analysis_is_header_only() {
        let mut out = Vec::new();
        write_csv(&Analysis::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "name,count\n");
    }

    #[test]
    fn json_carries_counts() {
        let mut out = Vec::new();
        write_json(&sample(), Path::new("list.txt"), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["session_count"], 2);
        assert_eq!(value["unique_count"], 2);
        assert_eq!(value["log_path"], "list.txt");
        assert_eq!(value["entries"][0]["name"], "zeta");
        assert_eq!(value["entries"][0]["count"], 2);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn save_report_writes_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("report.csv");
        save_report(&sample(), Path::new("list.txt"), ReportFormat::Csv, &out).unwrap();
        assert!(std::fs::read_to_string(&out).unwrap().starts_with("name,count\n"));
    }

    #[test]
    fn save_report_into_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("no/such/dir/report.json");
        let err = save_report(&sample(), Path::new("list.txt"), ReportFormat::Json, &out).unwrap_err();
        assert!(matches!(err, Error::Report { .. }));
    }
}
