/// Subcommand dispatch.
///
/// Turns parsed arguments into calls on the core crate. Command output
/// goes to stdout through [`StdoutTranscript`]; diagnostics go through
/// `tracing` to stderr.
use crate::args::{Cli, Command, OutputFormat};
use crate::settings::Settings;
use crate::theme::StdoutTranscript;
use anyhow::Context;
use foldertally_core::analysis::{self, report, stats};
use foldertally_core::actions;
use foldertally_core::scanner::batch::default_workers;
use foldertally_core::sorter::{SortOptions, SortScope};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Run the parsed command line. No subcommand starts the menu with defaults.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Command::Menu {
        log: PathBuf::from(foldertally_core::logfile::DEFAULT_LOG_NAME),
        root: PathBuf::from("."),
    });

    match command {
        Command::Scan { roots, log, jobs } => scan(roots, &log, jobs),
        Command::Analyze { log, format, out } => analyze(&log, format, out.as_deref()),
        Command::Stats { dir, format, out } => directory_stats(&dir, format, out.as_deref()),
        Command::Sort {
            dir,
            all,
            recursive,
            copy,
            dry_run,
        } => {
            let opts = SortOptions {
                scope: if all { SortScope::All } else { SortScope::Media },
                recursive,
                copy,
                dry_run,
            };
            actions::sort_folder(&dir, &opts, &StdoutTranscript::new())
                .with_context(|| format!("sorting {} failed", dir.display()))?;
            Ok(())
        }
        Command::Undo { dir } => {
            actions::undo_sort(&dir, &StdoutTranscript::new())
                .with_context(|| format!("undo in {} failed", dir.display()))?;
            Ok(())
        }
        Command::Menu { log, root } => {
            crate::menu::run(Settings::new(log, root)).context("menu I/O failed")
        }
    }
}

fn scan(roots: Vec<PathBuf>, log: &Path, jobs: Option<usize>) -> anyhow::Result<()> {
    let roots = if roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        roots
    };
    let workers = jobs.unwrap_or_else(default_workers);
    tracing::debug!("Scanning {} root(s) with {} worker(s)", roots.len(), workers);

    actions::scan_roots(&roots, log, workers, &StdoutTranscript::new())
        .with_context(|| format!("scan into {} failed", log.display()))?;
    Ok(())
}

fn analyze(log: &Path, format: OutputFormat, out: Option<&Path>) -> anyhow::Result<()> {
    let report_format = match format {
        OutputFormat::Text => {
            if out.is_some() {
                tracing::warn!("--out is ignored for text output");
            }
            actions::analyze_list(log, &StdoutTranscript::new())
                .with_context(|| format!("analysis of {} failed", log.display()))?;
            return Ok(());
        }
        OutputFormat::Json => report::ReportFormat::Json,
        OutputFormat::Csv => report::ReportFormat::Csv,
    };

    let analysis = analysis::analyze(log)
        .with_context(|| format!("analysis of {} failed", log.display()))?;

    match out {
        Some(path) => {
            report::save_report(&analysis, log, report_format, path)?;
            eprintln!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            match report_format {
                report::ReportFormat::Json => report::write_json(&analysis, log, &mut lock),
                report::ReportFormat::Csv => report::write_csv(&analysis, &mut lock),
            }
            .context("writing report to stdout failed")?;
            lock.flush()?;
        }
    }
    Ok(())
}

fn directory_stats(dir: &Path, format: OutputFormat, out: Option<&Path>) -> anyhow::Result<()> {
    if format == OutputFormat::Text {
        if out.is_some() {
            tracing::warn!("--out is ignored for text output");
        }
        actions::directory_stats(dir, &StdoutTranscript::new())
            .with_context(|| format!("counting files in {} failed", dir.display()))?;
        return Ok(());
    }

    let counted = analysis::directory_stats(dir)
        .with_context(|| format!("counting files in {} failed", dir.display()))?;
    let write = |writer: &mut dyn Write| match format {
        OutputFormat::Csv => stats::write_csv(&counted, writer),
        _ => stats::write_json(&counted, writer),
    };

    match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer).with_context(|| format!("writing {} failed", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock).context("writing report to stdout failed")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn scan_then_csv_report() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("alpha")).unwrap();
        let log = tmp.path().join("list.txt");
        let out = tmp.path().join("report.csv");
        let root = tmp.path().to_str().unwrap();
        let log_s = log.to_str().unwrap();

        run(parse(&["foldertally", "scan", root, "--log", log_s])).unwrap();
        run(parse(&["foldertally", "scan", root, "--log", log_s])).unwrap();
        run(parse(&[
            "foldertally",
            "analyze",
            "--log",
            log_s,
            "--format",
            "csv",
            "--out",
            out.to_str().unwrap(),
        ]))
        .unwrap();

        let csv = fs::read_to_string(&out).unwrap();
        assert_eq!(csv, "name,count\nalpha,2\n");
    }

    #[test]
    fn analyze_missing_log_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("absent.txt");
        let err = run(parse(&["foldertally", "analyze", "--log", log.to_str().unwrap()]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn sort_all_then_undo() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), b"n").unwrap();
        let dir = tmp.path().to_str().unwrap();

        run(parse(&["foldertally", "sort", dir, "--all"])).unwrap();
        assert!(tmp.path().join("TXT/notes.txt").exists());

        run(parse(&["foldertally", "undo", dir])).unwrap();
        assert!(tmp.path().join("notes.txt").exists());
    }

    #[test]
    fn stats_csv_to_file() {
        let tmp = TempDir::new().unwrap();
        let tree = tmp.path().join("tree");
        fs::create_dir_all(tree.join("nested")).unwrap();
        fs::write(tree.join("a.md"), b"x").unwrap();
        fs::write(tree.join("nested/b.MD"), b"x").unwrap();
        let out = tmp.path().join("stats.csv");

        run(parse(&[
            "foldertally",
            "stats",
            tree.to_str().unwrap(),
            "--format",
            "csv",
            "--out",
            out.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "extension,count\nmd,2\n");
    }

    #[test]
    fn stats_of_missing_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        assert!(run(parse(&["foldertally", "stats", missing.to_str().unwrap()])).is_err());
    }
}
