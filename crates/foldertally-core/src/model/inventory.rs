/// Inventory tally built from a log.
///
/// Entries keep first-seen order. A side index maps each name to its
/// position so repeated observations are O(1) instead of a linear search.
use compact_str::CompactString;
use serde::Serialize;
use std::collections::HashMap;

/// A folder name and the number of log lines that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub name: CompactString,
    /// Line occurrences across the whole log. For logs written by the
    /// scanner this equals the number of sessions containing the name.
    pub count: u64,
}

/// Result of analysing a log.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Number of separator lines seen.
    pub session_count: u64,
    /// Distinct names in first-seen order.
    pub entries: Vec<InventoryEntry>,
    index: HashMap<CompactString, usize>,
}

impl PartialEq for Analysis {
    fn eq(&self, other: &Self) -> bool {
        self.session_count == other.session_count && self.entries == other.entries
    }
}

impl Eq for Analysis {}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one session boundary.
    pub fn record_separator(&mut self) {
        self.session_count += 1;
    }

    /// Count one occurrence of `name`, creating the entry on first sight.
    pub fn observe(&mut self, name: &str) {
        if let Some(&pos) = self.index.get(name) {
            self.entries[pos].count += 1;
            return;
        }
        let name = CompactString::new(name);
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(InventoryEntry { name, count: 1 });
    }

    /// Number of distinct folder names.
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts, i.e. the number of folder-name lines in the log.
    pub fn total_observations(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Look up the count for one name.
    pub fn count_of(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&pos| self.entries[pos].count)
    }
}
