/// Formatting utilities for terminal output: byte counts, counts with
/// thousand separators, and fixed-width name columns.

/// Human-readable byte count in binary units (1 KB = 1024 B).
///
/// Bytes print whole, KB and MB with one decimal, larger units with two.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(&str, usize); 4] = [("KB", 1), ("MB", 1), ("GB", 2), ("TB", 2)];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let (label, decimals) = UNITS[unit];
    format!("{value:.decimals$} {label}")
}

/// Decimal count grouped in threes with commas: `1234567` -> `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.char_indices() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Width of the name column in inventory tables.
pub const NAME_COLUMN_WIDTH: usize = 40;

/// Render one inventory row: the name left-aligned in a 40-character
/// column, then the count and an `x`. Longer names are not truncated.
pub fn format_inventory_row(name: &str, count: u64) -> String {
    format!("{name:<width$} {count} x", width = NAME_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pick_the_largest_fitting_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
        assert_eq!(format_size(3 * 1024u64.pow(4)), "3.00 TB");
        assert_eq!(format_size(2048 * 1024u64.pow(4)), "2048.00 TB");
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(123_456), "123,456");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn inventory_row_pads_name_to_column() {
        let row = format_inventory_row("alpha", 3);
        assert_eq!(row.len(), NAME_COLUMN_WIDTH + " 3 x".len());
        assert!(row.starts_with("alpha "));
        assert!(row.ends_with(" 3 x"));
    }

    #[test]
    fn inventory_row_keeps_long_names_whole() {
        let long = "n".repeat(50);
        assert_eq!(format_inventory_row(&long, 1), format!("{long} 1 x"));
    }
}
