//! Claim map accessibility.
//!
//! Claims sit on a 5×3 grid numbered 1..=15 left to right, top to bottom,
//! with the lair at position 8. A connection between two neighbours is stored
//! once, on the lower-numbered cell (`conn_right` / `conn_bottom`), but links
//! both ways. A claim is accessible when it is held and a chain of held,
//! connected claims leads back to the lair.

use std::collections::VecDeque;

use crate::value_objects::{FieldPatch, FieldSnapshot};

pub const COLUMNS: usize = 5;
pub const ROWS: usize = 3;
pub const POSITIONS: usize = COLUMNS * ROWS;

/// The crew's lair; always accessible, never a claim.
pub const HOME: usize = 8;

pub const HELD_SUFFIX: &str = "held";
pub const CONN_RIGHT_SUFFIX: &str = "conn_right";
pub const CONN_BOTTOM_SUFFIX: &str = "conn_bottom";
pub const ACCESS_SUFFIX: &str = "access";
pub const NAME_SUFFIX: &str = "name";

/// Field name for `suffix` on claim `position`, e.g. `claim_3_held`.
pub fn field(position: usize, suffix: &str) -> String {
    format!("claim_{position}_{suffix}")
}

/// Whether `name` is a held or connection flag on the grid.
pub fn is_source_field(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("claim_") else {
        return false;
    };
    let Some((position, suffix)) = rest.split_once('_') else {
        return false;
    };
    let in_grid = position
        .parse::<usize>()
        .is_ok_and(|p| (1..=POSITIONS).contains(&p));
    in_grid && [HELD_SUFFIX, CONN_RIGHT_SUFFIX, CONN_BOTTOM_SUFFIX].contains(&suffix)
}

/// Right-hand neighbour of `position`, if it has one.
pub fn right_of(position: usize) -> Option<usize> {
    if !(1..=POSITIONS).contains(&position) {
        return None;
    }
    ((position - 1) % COLUMNS < COLUMNS - 1).then_some(position + 1)
}

/// Neighbour below `position`, if it has one.
pub fn below(position: usize) -> Option<usize> {
    if !(1..=POSITIONS).contains(&position) {
        return None;
    }
    ((position - 1) / COLUMNS < ROWS - 1).then_some(position + COLUMNS)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cell {
    held: bool,
    conn_right: bool,
    conn_bottom: bool,
}

/// Held and connection state of the whole map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimGrid {
    cells: [Cell; POSITIONS],
}

impl ClaimGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &FieldSnapshot) -> Self {
        let mut grid = Self::new();
        for position in 1..=POSITIONS {
            grid.cells[position - 1] = Cell {
                held: position != HOME && snapshot.flag(&field(position, HELD_SUFFIX)),
                conn_right: snapshot.flag(&field(position, CONN_RIGHT_SUFFIX)),
                conn_bottom: snapshot.flag(&field(position, CONN_BOTTOM_SUFFIX)),
            };
        }
        grid
    }

    pub fn is_held(&self, position: usize) -> bool {
        self.cells.get(position.wrapping_sub(1)).is_some_and(|c| c.held)
    }

    /// Neighbours joined to `position` by a connection stored on either end.
    fn linked(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = self.cells[position - 1];
        let right = right_of(position).filter(|_| cell.conn_right);
        let down = below(position).filter(|_| cell.conn_bottom);
        let left = (position > 1)
            .then(|| position - 1)
            .filter(|&l| right_of(l) == Some(position) && self.cells[l - 1].conn_right);
        let up = (position > COLUMNS)
            .then(|| position - COLUMNS)
            .filter(|&u| self.cells[u - 1].conn_bottom);
        [right, down, left, up].into_iter().flatten()
    }

    /// Accessibility of positions 1..=15 (index 0 is position 1).
    pub fn accessibility(&self) -> [bool; POSITIONS] {
        let mut reached = [false; POSITIONS];
        reached[HOME - 1] = true;
        let mut queue = VecDeque::from([HOME]);

        while let Some(position) = queue.pop_front() {
            for next in self.linked(position) {
                if !reached[next - 1] && self.is_held(next) {
                    reached[next - 1] = true;
                    queue.push_back(next);
                }
            }
        }
        reached
    }
}

/// Every flag the calculator reads plus its outputs.
pub fn dependencies() -> Vec<String> {
    (1..=POSITIONS)
        .flat_map(|position| {
            [HELD_SUFFIX, CONN_RIGHT_SUFFIX, CONN_BOTTOM_SUFFIX, ACCESS_SUFFIX]
                .into_iter()
                .map(move |suffix| field(position, suffix))
        })
        .collect()
}

/// Write-suppressed patch of `claim_<n>_access` flags.
pub fn recompute(snapshot: &FieldSnapshot) -> FieldPatch {
    let access = ClaimGrid::from_snapshot(snapshot).accessibility();
    let mut patch = FieldPatch::computed();
    for (index, accessible) in access.iter().enumerate() {
        patch.set(field(index + 1, ACCESS_SUFFIX), u8::from(*accessible));
    }
    patch.suppress_unchanged(snapshot)
}
