//! Augment maintenance.
//!
//! Installed augments cost their tier in maintenance ticks; every four ticks
//! is one clock owed.

use crate::fields::{Section, MAINTENANCE_CLOCKS, MAINTENANCE_PAID, MAINTENANCE_TICKS};
use crate::ids::RowId;
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// Ticks per maintenance clock.
pub const CLOCK_SIZE: i32 = 4;

/// Tier assumed for an augment row with no tier set.
pub const DEFAULT_TIER: i32 = 2;

pub const INSTALLED_SUFFIX: &str = "installed";
pub const TIER_SUFFIX: &str = "tier";

/// Fields the maintenance aggregator reads for the given augment rows.
pub fn dependencies(rows: &[RowId]) -> Vec<String> {
    let mut fields: Vec<String> = rows
        .iter()
        .flat_map(|row| {
            [
                Section::Augments.field(row, INSTALLED_SUFFIX),
                Section::Augments.field(row, TIER_SUFFIX),
            ]
        })
        .collect();
    fields.push(MAINTENANCE_TICKS.to_string());
    fields.push(MAINTENANCE_CLOCKS.to_string());
    fields
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceSummary {
    pub ticks: i32,
    pub clocks: i32,
}

pub fn summarize(snapshot: &FieldSnapshot, rows: &[RowId]) -> MaintenanceSummary {
    let ticks = rows
        .iter()
        .filter(|row| snapshot.flag(&Section::Augments.field(row, INSTALLED_SUFFIX)))
        .map(|row| snapshot.int(&Section::Augments.field(row, TIER_SUFFIX), DEFAULT_TIER))
        .fold(0i32, i32::saturating_add)
        .max(0);

    MaintenanceSummary {
        ticks,
        clocks: ticks / CLOCK_SIZE,
    }
}

/// Write-suppressed patch for `maintenance_ticks` and `maintenance_clocks`.
pub fn recompute(snapshot: &FieldSnapshot, rows: &[RowId]) -> FieldPatch {
    let summary = summarize(snapshot, rows);
    FieldPatch::computed()
        .with(MAINTENANCE_TICKS, summary.ticks)
        .with(MAINTENANCE_CLOCKS, summary.clocks)
        .suppress_unchanged(snapshot)
}

/// Clocks owed that have not been paid off; the maintenance roll's pool.
pub fn unpaid_clocks(snapshot: &FieldSnapshot) -> i32 {
    snapshot
        .int(MAINTENANCE_CLOCKS, 0)
        .saturating_sub(snapshot.int(MAINTENANCE_PAID, 0))
        .max(0)
}
