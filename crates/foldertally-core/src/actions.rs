/// User-facing actions that report progress through a [`Transcript`].
///
/// These are the handlers behind the frontend's "scan", "analyze",
/// "stats", "sort" and "undo" commands. Each writes its progress and results as plain
/// lines; on failure it writes an `[!] Error:` line and returns the error.
use crate::analysis::{self, DirectoryStats};
use crate::error::Result;
use crate::model::format::{format_count, format_inventory_row, format_size};
use crate::model::Analysis;
use crate::scanner::{self, ScanSummary};
use crate::sorter::{self, SortOptions, SortReport};
use crate::transcript::Transcript;
use std::path::{Path, PathBuf};

const RULE: &str = "-------------------------------------------";
const STATS_RULE_WIDTH: usize = 40;

/// Write the error line and hand the error back.
fn report_err<T>(t: &dyn Transcript, result: Result<T>) -> Result<T> {
    if let Err(ref e) = result {
        t.line(&format!("[!] Error: {e}"));
    }
    result
}

/// Scan `root`, list every folder found, and append the session to `log`.
pub fn scan_folders(root: &Path, log: &Path, t: &dyn Transcript) -> Result<ScanSummary> {
    t.line(&format!("[>] Scanning folders in {}...", root.display()));

    let session = report_err(t, scanner::scan(root))?;
    for name in session.iter() {
        t.line(&format!("    - {name}"));
    }
    report_err(t, crate::logfile::append_session(log, &session))?;

    t.line(&format!(
        "[+] Saved {} folders to {}",
        session.len(),
        log.display()
    ));
    t.line("");
    Ok(ScanSummary {
        root: root.to_path_buf(),
        log_path: log.to_path_buf(),
        session,
    })
}

/// Scan several roots. A single root behaves exactly like
/// [`scan_folders`]; more roots go through the batch worker pool and are
/// appended in the order given.
pub fn scan_roots(
    roots: &[PathBuf],
    log: &Path,
    workers: usize,
    t: &dyn Transcript,
) -> Result<Vec<ScanSummary>> {
    if let [root] = roots {
        return scan_folders(root, log, t).map(|s| vec![s]);
    }

    t.line(&format!(
        "[>] Scanning {} directories on {} worker(s)...",
        roots.len(),
        workers.clamp(1, roots.len().max(1))
    ));
    let summaries = report_err(t, scanner::scan_many_and_append(roots, log, workers))?;

    for summary in &summaries {
        t.line(&format!(
            "  {}: {} folders",
            summary.root.display(),
            summary.folder_count()
        ));
        for name in summary.session.iter() {
            t.line(&format!("    - {name}"));
        }
    }
    let total: usize = summaries.iter().map(ScanSummary::folder_count).sum();
    t.line(&format!(
        "[+] Saved {} sessions ({} folders) to {}",
        summaries.len(),
        total,
        log.display()
    ));
    t.line("");
    Ok(summaries)
}

/// Analyse `log` and print the inventory table.
pub fn analyze_list(log: &Path, t: &dyn Transcript) -> Result<Analysis> {
    t.line(&format!("[>] Analysing {}...", log.display()));
    t.line("");

    let analysis = report_err(t, analysis::analyze(log))?;
    write_analysis(&analysis, t);
    Ok(analysis)
}

/// Print an analysis as the inventory table.
pub fn write_analysis(analysis: &Analysis, t: &dyn Transcript) {
    t.line("========== RESULTS ==========");
    t.line(&format!("Sessions: {}", format_count(analysis.session_count)));
    t.line("");
    t.line("Unique folders:");
    t.line(RULE);
    for entry in &analysis.entries {
        t.line(&format!("  {}", format_inventory_row(&entry.name, entry.count)));
    }
    t.line(RULE);
    t.line(&format!(
        "Total unique folders: {}",
        format_count(analysis.unique_count() as u64)
    ));
    t.line("");
}

/// Count the folders, files and extensions under `root` and print the
/// breakdown.
pub fn directory_stats(root: &Path, t: &dyn Transcript) -> Result<DirectoryStats> {
    t.line(&format!("[>] Scanning directory: {}...", root.display()));
    t.line("");

    let stats = report_err(t, analysis::directory_stats(root))?;
    write_directory_stats(&stats, t);
    Ok(stats)
}

/// Print directory statistics as a boxed report.
pub fn write_directory_stats(stats: &DirectoryStats, t: &dyn Transcript) {
    let heavy = "=".repeat(STATS_RULE_WIDTH);
    t.line(&heavy);
    t.line(&format!("REPORT FOR: {}", stats.root.display()));
    t.line(&heavy);
    t.line(&format!("Total Folders Found: {}", format_count(stats.folder_count)));
    t.line(&format!("Total Files Found:   {}", format_count(stats.file_count)));
    t.line(&"-".repeat(STATS_RULE_WIDTH));
    t.line("File Formats Breakdown:");
    if stats.extensions.is_empty() {
        t.line("  (No files found)");
    }
    for entry in &stats.extensions {
        t.line(&format!("  {:<15} : {}", entry.label(), format_count(entry.count)));
    }
    t.line(&heavy);
    t.line("");
}

/// Sort `dir` into extension folders and summarise what happened.
pub fn sort_folder(dir: &Path, opts: &SortOptions, t: &dyn Transcript) -> Result<SortReport> {
    t.line(&format!("[>] Sorting files in {}...", dir.display()));

    let plan = report_err(t, sorter::plan_sort(dir, opts))?;
    if plan.is_empty() {
        t.line("No files to sort.");
        t.line("");
        return Ok(SortReport {
            copied: opts.copy,
            dry_run: opts.dry_run,
            ..Default::default()
        });
    }

    if opts.dry_run {
        let verb = if opts.copy { "copy" } else { "move" };
        for mv in &plan.moves {
            t.line(&format!(
                "[DRY-RUN] {verb}: '{}' -> '{}'",
                mv.from.display(),
                mv.to.display()
            ));
        }
    }

    let report = report_err(t, sorter::apply_plan(&plan, opts))?;
    for (folder, count) in &report.folders {
        t.line(&format!("  {folder}: {count}"));
    }
    let verb = match (report.dry_run, report.copied) {
        (true, _) => "Would sort",
        (false, true) => "Copied",
        (false, false) => "Sorted",
    };
    t.line(&format!(
        "[+] {verb} {} file(s) ({})",
        format_count(report.files as u64),
        format_size(report.bytes)
    ));
    t.line("");
    Ok(report)
}

/// Undo the last journalled sort in `dir`.
pub fn undo_sort(dir: &Path, t: &dyn Transcript) -> Result<usize> {
    t.line(&format!("[>] Restoring files in {}...", dir.display()));
    let restored = report_err(t, sorter::undo_sort(dir))?;
    t.line(&format!("[+] Restored {restored} file(s)"));
    t.line("");
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::MemoryTranscript;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn scan_lists_each_folder() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("only")).unwrap();
        let log = tmp.path().join("list.txt");
        let t = MemoryTranscript::new();

        let summary = scan_folders(tmp.path(), &log, &t).unwrap();
        assert_eq!(summary.folder_count(), 1);
        let lines = t.lines();
        assert!(lines[0].starts_with("[>] Scanning folders in "));
        assert_eq!(lines[1], "    - only");
        assert!(lines[2].starts_with("[+] Saved 1 folders to "));
        assert_eq!(lines[3], "");
    }

    #[test]
    fn scan_error_is_written_and_returned() {
        let tmp = TempDir::new().unwrap();
        let t = MemoryTranscript::new();
        let result = scan_folders(&tmp.path().join("missing"), &tmp.path().join("list.txt"), &t);
        assert!(result.is_err());
        assert!(t.lines().last().unwrap().starts_with("[!] Error: cannot read directory"));
    }

    #[test]
    fn analyze_prints_table() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("list.txt");
        fs::write(&log, "===========================\nphotos\n").unwrap();
        let t = MemoryTranscript::new();

        let analysis = analyze_list(&log, &t).unwrap();
        assert_eq!(analysis.session_count, 1);
        let text = t.text();
        assert!(text.contains("Sessions: 1"));
        assert!(text.contains(&format!("  {}", format_inventory_row("photos", 1))));
        assert!(text.contains("Total unique folders: 1"));
    }

    #[test]
    fn analyze_missing_log_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let t = MemoryTranscript::new();
        assert!(analyze_list(&tmp.path().join("list.txt"), &t).is_err());
        assert!(t.text().contains("[!] Error: log"));
    }

    #[test]
    fn stats_prints_breakdown() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/a.txt"), b"x").unwrap();
        fs::write(tmp.path().join("b.TXT"), b"x").unwrap();
        fs::write(tmp.path().join("Makefile"), b"x").unwrap();
        let t = MemoryTranscript::new();

        let stats = directory_stats(tmp.path(), &t).unwrap();
        assert_eq!(stats.file_count, 3);
        let lines = t.lines();
        assert!(lines[0].starts_with("[>] Scanning directory: "));
        assert!(lines.contains(&"Total Folders Found: 1".to_owned()));
        assert!(lines.contains(&"Total Files Found:   3".to_owned()));
        assert!(lines.contains(&format!("  {:<15} : 2", ".txt")));
        assert!(lines.contains(&format!("  {:<15} : 1", "[No Extension]")));
    }

    #[test]
    fn stats_of_empty_directory_says_so() {
        let tmp = TempDir::new().unwrap();
        let t = MemoryTranscript::new();
        directory_stats(tmp.path(), &t).unwrap();
        assert!(t.text().contains("  (No files found)"));
    }

    #[test]
    fn sort_with_nothing_to_do() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        let t = MemoryTranscript::new();

        let report = sort_folder(tmp.path(), &SortOptions::default(), &t).unwrap();
        assert_eq!(report.files, 0);
        assert!(t.text().contains("No files to sort."));
    }

    #[test]
    fn dry_run_sort_lists_planned_moves() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.png"), b"x").unwrap();
        let opts = SortOptions {
            dry_run: true,
            ..Default::default()
        };
        let t = MemoryTranscript::new();

        sort_folder(tmp.path(), &opts, &t).unwrap();
        let text = t.text();
        assert!(text.contains("[DRY-RUN] move: '"));
        assert!(text.contains("[+] Would sort 1 file(s) (1 B)"));
    }

    #[test]
    fn undo_without_journal_fails() {
        let tmp = TempDir::new().unwrap();
        let t = MemoryTranscript::new();
        assert!(undo_sort(tmp.path(), &t).is_err());
        assert!(t.text().contains("nothing to undo"));
    }
}
