//! Population plans built from catalogue entries.
//!
//! Selecting a playbook or crew type writes flat fields (titles, slots,
//! upgrades, claim layout) and regenerates the rows of the related repeating
//! sections. The plans here are pure; the engine runs them against the store.

use crate::aggregates::claims::{
    self, CONN_BOTTOM_SUFFIX, CONN_RIGHT_SUFFIX, HOME, NAME_SUFFIX, POSITIONS,
};
use crate::aggregates::Action;
use crate::entities::{Catalogue, ClaimConnection, ClaimEdge, CrewType, Playbook};
use crate::fields::{
    Section, CONTACT_PREFIX, CREW_TITLE, CREW_XP_TRIGGER, FRIEND_PREFIX, PLAYBOOK_TITLE,
    SPECIAL_UPGRADE_PREFIX, XP_TRIGGER,
};
use crate::repeating::{fill_slots, RowTemplate};
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// Type-specific upgrade slots on the crew sheet.
pub const SPECIAL_UPGRADE_SLOTS: usize = 2;

/// Name written on the home cell of the claim grid.
pub const LAIR_NAME: &str = "Lair";

/// Rows to generate for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTargets {
    pub section: Section,
    pub rows: Vec<RowTemplate>,
}

/// Flat writes plus section regeneration for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationPlan {
    pub patch: FieldPatch,
    pub sections: Vec<SectionTargets>,
}

/// Fields a playbook plan compares against.
pub fn playbook_dependencies() -> Vec<String> {
    Action::ALL.iter().map(|a| a.as_str().to_string()).collect()
}

/// Plan for selecting `playbook`. Starting action dots only ever raise the
/// current rating.
pub fn playbook_plan(
    playbook: &Playbook,
    snapshot: &FieldSnapshot,
    friend_slots: usize,
) -> PopulationPlan {
    let mut patch = FieldPatch::computed()
        .with(PLAYBOOK_TITLE, &playbook.title)
        .with(XP_TRIGGER, &playbook.xp_trigger);

    for (action, dots) in playbook.starting_actions() {
        if action.rating(snapshot) < dots {
            patch.set(action.as_str(), dots);
        }
    }

    patch.extend(fill_slots(FRIEND_PREFIX, friend_slots, &playbook.friends));

    PopulationPlan {
        patch,
        sections: vec![
            SectionTargets {
                section: Section::Items,
                rows: item_rows(playbook),
            },
            SectionTargets {
                section: Section::Augments,
                rows: augment_rows(playbook),
            },
        ],
    }
}

fn item_rows(playbook: &Playbook) -> Vec<RowTemplate> {
    playbook
        .items
        .iter()
        .map(|item| {
            RowTemplate::new()
                .with("name", &item.name)
                .with("load", item.load)
                .with("load_1", 0)
                .with("load_2", 0)
                .with("special", u8::from(item.special))
        })
        .collect()
}

fn augment_rows(playbook: &Playbook) -> Vec<RowTemplate> {
    playbook
        .augments
        .iter()
        .map(|augment| {
            RowTemplate::new()
                .with("name", &augment.name)
                .with("description", &augment.description)
                .with("tier", augment.tier)
                .with("installed", 0)
        })
        .collect()
}

/// Plan for selecting `crew`.
pub fn crew_plan(crew: &CrewType, contact_slots: usize) -> PopulationPlan {
    let mut patch = FieldPatch::computed()
        .with(CREW_TITLE, &crew.title)
        .with(CREW_XP_TRIGGER, &crew.xp_trigger);

    for field in crew.upgrades.checked_fields() {
        patch.set(field, 1);
    }
    patch.extend(fill_slots(
        SPECIAL_UPGRADE_PREFIX,
        SPECIAL_UPGRADE_SLOTS,
        &crew.special_upgrades,
    ));
    patch.extend(fill_slots(CONTACT_PREFIX, contact_slots, &crew.contacts));
    patch.extend(claim_layout(crew));

    let abilities = crew
        .abilities
        .iter()
        .map(|ability| {
            RowTemplate::new()
                .with("name", &ability.name)
                .with("description", &ability.description)
        })
        .collect();
    let cohorts = crew
        .cohorts
        .iter()
        .map(|cohort| {
            RowTemplate::new()
                .with("name", &cohort.name)
                .with("type", cohort.kind.as_str())
                .with("tags", &cohort.tags)
                .with("edges", &cohort.edges)
                .with("flaws", &cohort.flaws)
                .with("elite", 0)
                .with("harm", 0)
        })
        .collect();

    PopulationPlan {
        patch,
        sections: vec![
            SectionTargets {
                section: Section::CrewAbilities,
                rows: abilities,
            },
            SectionTargets {
                section: Section::Cohorts,
                rows: cohorts,
            },
        ],
    }
}

/// Claim names and connection flags. Unlisted names and edges are cleared.
fn claim_layout(crew: &CrewType) -> FieldPatch {
    let mut patch = FieldPatch::computed();
    for position in 1..=POSITIONS {
        let name = if position == HOME { LAIR_NAME } else { "" };
        patch.set(claims::field(position, NAME_SUFFIX), name);

        for (edge, suffix) in [
            (ClaimEdge::Right, CONN_RIGHT_SUFFIX),
            (ClaimEdge::Bottom, CONN_BOTTOM_SUFFIX),
        ] {
            let connection = ClaimConnection { position, edge };
            if connection.target().is_some() {
                let listed = crew.connections.contains(&connection);
                patch.set(claims::field(position, suffix), u8::from(listed));
            }
        }
    }
    for (position, name) in crew.claim_positions() {
        patch.set(claims::field(position, NAME_SUFFIX), name);
    }
    patch
}

/// One generated row per catalogue faction.
pub fn faction_rows(catalogue: &Catalogue) -> Vec<RowTemplate> {
    catalogue
        .all_factions()
        .map(|faction| {
            RowTemplate::new()
                .with("name", &faction.name)
                .with("tier", faction.tier)
                .with("tier_display", faction.tier_display())
                .with("description", &faction.description)
                .with("category", &faction.category)
        })
        .collect()
}
