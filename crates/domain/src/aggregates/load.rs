//! Carried load.
//!
//! Standard gear has one checkbox per unit of load (`item_armor_1`,
//! `item_armor_2`). Playbook items live in the `items` repeating section with
//! two load checkboxes each; rows flagged `special` are carried for free.

use crate::fields::{Section, LOAD_MAX, LOAD_SELECTOR, LOAD_TOTAL};
use crate::ids::RowId;
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// Standard item catalogue: base field name and how many load boxes it has.
pub const STANDARD_ITEMS: [(&str, u8); 16] = [
    ("item_knife", 1),
    ("item_large_weapon", 2),
    ("item_reload", 1),
    ("item_unusual_weapon", 1),
    ("item_datapad", 1),
    ("item_armor", 2),
    ("item_heavy", 1),
    ("item_infiltration", 1),
    ("item_hacking", 2),
    ("item_climbing", 2),
    ("item_demolition", 2),
    ("item_tampering", 1),
    ("item_subterfuge", 1),
    ("item_documents", 1),
    ("item_flashlight", 1),
    ("item_modification", 1),
];

/// Load checkbox suffixes on an `items` row.
pub const ROW_LOAD_SUFFIXES: [&str; 2] = ["load_1", "load_2"];

/// Suffix of the "carried for free" flag on an `items` row.
pub const SPECIAL_SUFFIX: &str = "special";

/// Capacity when the load selector (3/5/6) is empty: normal load.
pub const DEFAULT_CAPACITY: i32 = 5;

/// Every standard item load checkbox, `item_<name>_<n>`.
pub fn standard_load_fields() -> Vec<String> {
    STANDARD_ITEMS
        .iter()
        .flat_map(|(item, load)| (1..=*load).map(move |n| format!("{item}_{n}")))
        .collect()
}

/// Whether `name` is one of the standard item load checkboxes.
pub fn is_standard_load_field(name: &str) -> bool {
    STANDARD_ITEMS.iter().any(|(item, load)| {
        name.strip_prefix(item)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|n| n.parse::<u8>().ok())
            .is_some_and(|n| (1..=*load).contains(&n))
    })
}

/// Whether a row suffix in the `items` section affects load.
pub fn is_row_load_suffix(suffix: &str) -> bool {
    suffix == SPECIAL_SUFFIX || ROW_LOAD_SUFFIXES.contains(&suffix)
}

/// Fields the load aggregator reads for the given item rows.
pub fn dependencies(rows: &[RowId]) -> Vec<String> {
    let mut fields = standard_load_fields();
    for row in rows {
        for suffix in ROW_LOAD_SUFFIXES.iter().chain(std::iter::once(&SPECIAL_SUFFIX)) {
            fields.push(Section::Items.field(row, suffix));
        }
    }
    fields.extend([LOAD_SELECTOR, LOAD_TOTAL, LOAD_MAX].map(String::from));
    fields
}

/// Computed load totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub total: i32,
    pub capacity: i32,
}

pub fn summarize(snapshot: &FieldSnapshot, rows: &[RowId]) -> LoadSummary {
    let standard = standard_load_fields()
        .iter()
        .filter(|field| snapshot.flag(field))
        .count();

    let carried: usize = rows
        .iter()
        .filter(|row| !snapshot.flag(&Section::Items.field(row, SPECIAL_SUFFIX)))
        .map(|row| {
            ROW_LOAD_SUFFIXES
                .iter()
                .filter(|suffix| snapshot.flag(&Section::Items.field(row, suffix)))
                .count()
        })
        .sum();

    LoadSummary {
        total: (standard + carried) as i32,
        capacity: snapshot.int(LOAD_SELECTOR, DEFAULT_CAPACITY),
    }
}

/// Write-suppressed patch for `load_total` and `load_max`.
pub fn recompute(snapshot: &FieldSnapshot, rows: &[RowId]) -> FieldPatch {
    let summary = summarize(snapshot, rows);
    FieldPatch::computed()
        .with(LOAD_TOTAL, summary.total)
        .with(LOAD_MAX, summary.capacity)
        .suppress_unchanged(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> RowId {
        RowId::new(id)
    }

    #[test]
    fn standard_fields_follow_item_load() {
        let fields = standard_load_fields();
        assert_eq!(fields.len(), 21);
        assert!(fields.contains(&"item_armor_2".to_string()));
        assert!(!fields.contains(&"item_knife_2".to_string()));
        assert!(is_standard_load_field("item_hacking_2"));
        assert!(!is_standard_load_field("item_hacking_3"));
        assert!(!is_standard_load_field("item_knife"));
    }

    #[test]
    fn counts_standard_and_row_boxes() {
        let rows = [row("-a"), row("-b")];
        let snapshot = FieldSnapshot::new()
            .with("item_knife_1", "1")
            .with("item_armor_1", "1")
            .with("item_armor_2", "on")
            .with("repeating_items_-a_load_1", "1")
            .with("repeating_items_-a_load_2", "1")
            .with("repeating_items_-b_load_1", "1");

        let summary = summarize(&snapshot, &rows);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.capacity, 5);
    }

    #[test]
    fn special_rows_are_free() {
        let rows = [row("-a")];
        let snapshot = FieldSnapshot::new()
            .with("repeating_items_-a_load_1", "1")
            .with("repeating_items_-a_load_2", "1")
            .with("repeating_items_-a_special", "1");
        assert_eq!(summarize(&snapshot, &rows).total, 0);
    }

    #[test]
    fn capacity_comes_from_selector() {
        let snapshot = FieldSnapshot::new().with(LOAD_SELECTOR, "6");
        assert_eq!(summarize(&snapshot, &[]).capacity, 6);

        let garbled = FieldSnapshot::new().with(LOAD_SELECTOR, "heavy-ish");
        assert_eq!(summarize(&garbled, &[]).capacity, 5);
    }

    #[test]
    fn recompute_suppresses_unchanged_values() {
        let snapshot = FieldSnapshot::new()
            .with("item_knife_1", "1")
            .with(LOAD_TOTAL, "1")
            .with(LOAD_MAX, "5");
        assert!(recompute(&snapshot, &[]).is_empty());

        let patch = recompute(&snapshot.with("item_reload_1", "1"), &[]);
        assert_eq!(patch.get(LOAD_TOTAL), Some("2"));
        assert_eq!(patch.len(), 1);
    }

    #[test]
    fn dependencies_cover_rows() {
        let deps = dependencies(&[row("-a")]);
        assert!(deps.contains(&"repeating_items_-a_special".to_string()));
        assert!(deps.contains(&LOAD_SELECTOR.to_string()));
        assert!(is_row_load_suffix("load_2"));
        assert!(!is_row_load_suffix("name"));
    }
}
