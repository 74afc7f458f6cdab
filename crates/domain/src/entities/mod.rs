//! Domain entities - read-only catalogue data injected at startup

mod catalogue;

pub use catalogue::{
    roman_numeral, Augment, Catalogue, ClaimConnection, ClaimEdge, CohortTemplate, CrewAbility,
    CrewType, Faction, FactionCategory, Playbook, StartingItem, Upgrades, MAX_FACTION_TIER,
};
