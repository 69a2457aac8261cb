/// Directory statistics: folder and file totals plus a per-extension
/// breakdown for a whole tree.
///
/// Extensions are compared lowercase and exclude the dot. A leading dot
/// does not start an extension, so `.bashrc` counts as having none.
use crate::error::{Error, Result};
use compact_str::CompactString;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Display label for files without an extension.
pub const NO_EXTENSION_LABEL: &str = "[No Extension]";

/// Number of files sharing one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionCount {
    /// Lowercase extension without the dot; empty for files without one.
    pub extension: CompactString,
    pub count: u64,
}

impl ExtensionCount {
    /// `.txt`, or [`NO_EXTENSION_LABEL`].
    pub fn label(&self) -> String {
        if self.extension.is_empty() {
            NO_EXTENSION_LABEL.to_owned()
        } else {
            format!(".{}", self.extension)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub root: PathBuf,
    /// Directories below the root (the root itself is not counted).
    pub folder_count: u64,
    /// Every non-directory entry, symlinks included.
    pub file_count: u64,
    /// Most common extension first; ties in extension order.
    pub extensions: Vec<ExtensionCount>,
}

/// Walk `root` recursively and count its folders, files and extensions.
///
/// Symlinks are not followed. Entries that cannot be read are logged and
/// skipped; only an unreadable or non-directory root is an error.
pub fn directory_stats(root: &Path) -> Result<DirectoryStats> {
    let unreadable = |source| Error::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    };
    let meta = fs::metadata(root).map_err(unreadable)?;
    if !meta.is_dir() {
        return Err(unreadable(std::io::Error::other("not a directory")));
    }
    fs::read_dir(root).map_err(unreadable)?;

    let start = Instant::now();
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    let mut stats = DirectoryStats {
        root: root.to_path_buf(),
        ..Default::default()
    };
    let mut tally: HashMap<CompactString, u64> = HashMap::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if entry.file_type().is_dir() {
            stats.folder_count += 1;
            continue;
        }
        stats.file_count += 1;
        let ext = Path::new(entry.file_name())
            .extension()
            .map(|e| CompactString::new(e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        *tally.entry(ext).or_insert(0) += 1;
    }

    stats.extensions = tally
        .into_iter()
        .map(|(extension, count)| ExtensionCount { extension, count })
        .collect();
    stats
        .extensions
        .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));

    info!(
        "Counted {} folders and {} files under {} in {:?}",
        stats.folder_count,
        stats.file_count,
        root.display(),
        start.elapsed()
    );
    Ok(stats)
}

#[derive(Serialize)]
struct JsonStats<'a> {
    generated_at: String,
    root: String,
    folder_count: u64,
    file_count: u64,
    extensions: &'a [ExtensionCount],
}

/// Write the statistics as pretty-printed JSON.
pub fn write_json<W: Write>(stats: &DirectoryStats, mut writer: W) -> std::io::Result<()> {
    let report = JsonStats {
        generated_at: chrono::Local::now().to_rfc3339(),
        root: stats.root.to_string_lossy().into_owned(),
        folder_count: stats.folder_count,
        file_count: stats.file_count,
        extensions: &stats.extensions,
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Write the extension breakdown as CSV with an `extension,count` header.
pub fn write_csv<W: Write>(stats: &DirectoryStats, writer: W) -> std::io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in &stats.extensions {
        csv.serialize(entry)?;
    }
    if stats.extensions.is_empty() {
        csv.write_record(["extension", "count"])?;
    }
    csv.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.txt"));
        touch(&tmp.path().join("B.TXT"));
        touch(&tmp.path().join("docs/c.txt"));
        touch(&tmp.path().join("docs/d.md"));
        touch(&tmp.path().join("docs/deep/Makefile"));
        touch(&tmp.path().join(".bashrc"));
        touch(&tmp.path().join("pics/e.JPG"));
        fs::create_dir(tmp.path().join("empty")).unwrap();
        tmp
    }

    #[test]
    fn counts_folders_files_and_extensions() {
        let tmp = sample_tree();
        let stats = directory_stats(tmp.path()).unwrap();

        assert_eq!(stats.folder_count, 4);
        assert_eq!(stats.file_count, 7);
        let rows: Vec<(String, u64)> = stats
            .extensions
            .iter()
            .map(|e| (e.label(), e.count))
            .collect();
        assert_eq!(
            rows,
            vec![
                (".txt".to_owned(), 3),
                (NO_EXTENSION_LABEL.to_owned(), 2),
                (".jpg".to_owned(), 1),
                (".md".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn empty_directory_has_no_extensions() {
        let tmp = TempDir::new().unwrap();
        let stats = directory_stats(tmp.path()).unwrap();
        assert_eq!(stats.folder_count, 0);
        assert_eq!(stats.file_count, 0);
        assert!(stats.extensions.is_empty());
    }

    #[test]
    fn missing_or_file_root_fails() {
        let tmp = TempDir::new().unwrap();
        let err = directory_stats(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::DirectoryUnreadable { .. }));

        let file = tmp.path().join("plain.txt");
        touch(&file);
        let err = directory_stats(&file).unwrap_err();
        assert!(matches!(err, Error::DirectoryUnreadable { .. }));
    }

    #[test]
    fn csv_lists_extensions_in_order() {
        let tmp = sample_tree();
        let stats = directory_stats(tmp.path()).unwrap();
        let mut out = Vec::new();
        write_csv(&stats, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "extension,count\ntxt,3\n,2\njpg,1\nmd,1\n"
        );
    }

    #[test]
    fn json_carries_totals() {
        let tmp = sample_tree();
        let stats = directory_stats(tmp.path()).unwrap();
        let mut out = Vec::new();
        write_json(&stats, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["folder_count"], 4);
        assert_eq!(value["file_count"], 7);
        assert_eq!(value["extensions"][0]["extension"], "txt");
        assert_eq!(value["extensions"][0]["count"], 3);
    }
}
