//! Game catalogue - read-only reference data for playbooks, crews and factions
//!
//! The catalogue is injected into the engine at startup and never mutated.
//! Selection fields on the sheet (`playbook`, `crew_type`) hold catalogue
//! keys; an unknown key simply finds nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregates::claims::{self, HOME, POSITIONS};
use crate::aggregates::Action;
use crate::error::DomainError;
use crate::game_systems::CohortKind;

/// Highest faction tier.
pub const MAX_FACTION_TIER: u8 = 6;

/// Complete reference data for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub playbooks: BTreeMap<String, Playbook>,
    #[serde(default)]
    pub crews: BTreeMap<String, CrewType>,
    #[serde(default)]
    pub factions: Vec<FactionCategory>,
}

impl Catalogue {
    pub fn playbook(&self, key: &str) -> Option<&Playbook> {
        self.playbooks.get(key.trim())
    }

    pub fn crew(&self, key: &str) -> Option<&CrewType> {
        self.crews.get(key.trim())
    }

    /// Every faction in category order.
    pub fn all_factions(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter().flat_map(|category| category.factions.iter())
    }

    /// Checks invariants the sheet relies on.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (key, playbook) in &self.playbooks {
            playbook
                .validate()
                .map_err(|e| DomainError::validation(format!("playbook '{key}': {e}")))?;
        }
        for (key, crew) in &self.crews {
            crew.validate()
                .map_err(|e| DomainError::validation(format!("crew '{key}': {e}")))?;
        }
        for faction in self.all_factions() {
            if !(1..=MAX_FACTION_TIER).contains(&faction.tier) {
                return Err(DomainError::validation(format!(
                    "faction '{}' has tier {}, expected 1-{}",
                    faction.name, faction.tier, MAX_FACTION_TIER
                )));
            }
        }
        Ok(())
    }
}

/// A character playbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playbook {
    pub title: String,
    #[serde(default)]
    pub xp_trigger: String,
    /// Starting action dots, keyed by action name
    #[serde(default)]
    pub actions: BTreeMap<String, i32>,
    #[serde(default)]
    pub items: Vec<StartingItem>,
    #[serde(default)]
    pub augments: Vec<Augment>,
    #[serde(default)]
    pub friends: Vec<String>,
}

impl Playbook {
    /// Starting dots for the actions this playbook names. Unknown action
    /// names are skipped.
    pub fn starting_actions(&self) -> Vec<(Action, i32)> {
        self.actions
            .iter()
            .filter_map(|(name, dots)| name.parse::<Action>().ok().map(|a| (a, *dots)))
            .collect()
    }

    fn validate(&self) -> Result<(), DomainError> {
        for name in self.actions.keys() {
            name.parse::<Action>()?;
        }
        for augment in &self.augments {
            if augment.tier < 1 {
                return Err(DomainError::validation(format!(
                    "augment '{}' has tier {}",
                    augment.name, augment.tier
                )));
            }
        }
        for item in &self.items {
            if !(1..=2).contains(&item.load) {
                return Err(DomainError::validation(format!(
                    "item '{}' has load {}, expected 1 or 2",
                    item.name, item.load
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingItem {
    pub name: String,
    #[serde(default = "default_item_load")]
    pub load: i32,
    /// Special items do not count toward load
    #[serde(default)]
    pub special: bool,
}

fn default_item_load() -> i32 {
    1
}

/// Cybernetic augment; its tier drives maintenance once installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augment {
    pub tier: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A crew type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewType {
    pub title: String,
    #[serde(default)]
    pub xp_trigger: String,
    #[serde(default)]
    pub abilities: Vec<CrewAbility>,
    #[serde(default)]
    pub cohorts: Vec<CohortTemplate>,
    #[serde(default)]
    pub upgrades: Upgrades,
    /// Names for the type-specific upgrade slots
    #[serde(default)]
    pub special_upgrades: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<String>,
    /// Names of the non-home claims in grid order, home skipped
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(default)]
    pub connections: Vec<ClaimConnection>,
}

impl CrewType {
    fn validate(&self) -> Result<(), DomainError> {
        if self.claims.len() > POSITIONS - 1 {
            return Err(DomainError::validation(format!(
                "{} claims listed, at most {} fit around the lair",
                self.claims.len(),
                POSITIONS - 1
            )));
        }
        for connection in &self.connections {
            if connection.target().is_none() {
                return Err(DomainError::validation(format!(
                    "connection {:?} leaves the claim grid",
                    connection
                )));
            }
        }
        Ok(())
    }

    /// Grid position and name of each listed claim. Home is skipped.
    pub fn claim_positions(&self) -> impl Iterator<Item = (usize, &str)> {
        (1..=POSITIONS)
            .filter(|p| *p != HOME)
            .zip(self.claims.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewAbility {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Starting cohort granted by a crew type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortTemplate {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CohortKind,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub edges: String,
    #[serde(default)]
    pub flaws: String,
}

/// Lair and training upgrades a crew type starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    /// Single-box upgrades, set to checked
    #[serde(default)]
    pub checkboxes: Vec<String>,
    /// Multi-box upgrades: base name to number of boxes checked
    #[serde(default)]
    pub leveled: BTreeMap<String, u32>,
}

impl Upgrades {
    /// Every checkbox field these upgrades turn on.
    pub fn checked_fields(&self) -> Vec<String> {
        let mut fields = self.checkboxes.clone();
        for (base, level) in &self.leveled {
            fields.extend((1..=*level).map(|n| format!("{base}_{n}")));
        }
        fields
    }
}

/// Which stored edge of a claim cell a connection sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimEdge {
    Right,
    Bottom,
}

/// A connection stored on its lower-indexed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimConnection {
    pub position: usize,
    pub edge: ClaimEdge,
}

impl ClaimConnection {
    /// The cell on the other end, if it is on the grid.
    pub fn target(&self) -> Option<usize> {
        match self.edge {
            ClaimEdge::Right => claims::right_of(self.position),
            ClaimEdge::Bottom => claims::below(self.position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCategory {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub factions: Vec<Faction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
    pub tier: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

impl Faction {
    pub fn tier_display(&self) -> String {
        roman_numeral(self.tier)
    }
}

/// Roman numeral for small positive numbers; zero renders empty.
pub fn roman_numeral(value: u8) -> String {
    const NUMERALS: [(u8, &str); 9] = [
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut remaining = value;
    let mut out = String::new();
    for (amount, numeral) in NUMERALS {
        while remaining >= amount {
            out.push_str(numeral);
            remaining -= amount;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face() -> Playbook {
        Playbook {
            title: "Face".into(),
            xp_trigger: "You addressed a challenge with deception or influence".into(),
            actions: BTreeMap::from([("sway".to_string(), 2), ("consort".to_string(), 1)]),
            items: vec![StartingItem {
                name: "Fine Disguise Kit".into(),
                load: 1,
                special: false,
            }],
            augments: vec![Augment {
                tier: 2,
                name: "Kodama Command Link".into(),
                description: String::new(),
            }],
            friends: vec![],
        }
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman_numeral(1), "I");
        assert_eq!(roman_numeral(4), "IV");
        assert_eq!(roman_numeral(6), "VI");
        assert_eq!(roman_numeral(0), "");
    }

    #[test]
    fn lookups_are_silent_on_unknown_keys() {
        let mut catalogue = Catalogue::default();
        catalogue.playbooks.insert("face".into(), face());
        assert!(catalogue.playbook("face").is_some());
        assert!(catalogue.playbook("wizard").is_none());
        assert!(catalogue.crew("").is_none());
    }

    #[test]
    fn starting_actions_resolve_names() {
        let actions = face().starting_actions();
        assert!(actions.contains(&(Action::Sway, 2)));
        assert!(actions.contains(&(Action::Consort, 1)));
    }

    #[test]
    fn validation_rejects_bad_faction_tier() {
        let catalogue = Catalogue {
            factions: vec![FactionCategory {
                name: "Corps".into(),
                key: "corps".into(),
                factions: vec![Faction {
                    name: "The Council".into(),
                    tier: 7,
                    description: String::new(),
                    category: "corps".into(),
                }],
            }],
            ..Default::default()
        };
        assert!(matches!(catalogue.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validation_rejects_zero_tier_augment() {
        let mut playbook = face();
        playbook.augments[0].tier = 0;
        let mut catalogue = Catalogue::default();
        catalogue.playbooks.insert("face".into(), playbook);
        assert!(catalogue.validate().is_err());
    }

    #[test]
    fn validation_rejects_too_many_claims() {
        let crew = CrewType {
            title: "Runners".into(),
            claims: (0..15).map(|n| format!("Claim {n}")).collect(),
            ..Default::default()
        };
        let mut catalogue = Catalogue::default();
        catalogue.crews.insert("runners".into(), crew);
        assert!(catalogue.validate().is_err());
    }

    #[test]
    fn claim_positions_skip_home() {
        let crew = CrewType {
            claims: (0..14).map(|n| format!("Claim {n}")).collect(),
            ..Default::default()
        };
        let positions: Vec<usize> = crew.claim_positions().map(|(p, _)| p).collect();
        assert_eq!(positions.len(), 14);
        assert!(!positions.contains(&HOME));
        assert_eq!(positions[7], 9);
        assert_eq!(positions[13], 15);
    }

    #[test]
    fn connection_targets() {
        let right = ClaimConnection { position: 3, edge: ClaimEdge::Right };
        assert_eq!(right.target(), Some(4));
        let off_grid = ClaimConnection { position: 5, edge: ClaimEdge::Right };
        assert_eq!(off_grid.target(), None);
        let bottom = ClaimConnection { position: 12, edge: ClaimEdge::Bottom };
        assert_eq!(bottom.target(), None);
        let outside = ClaimConnection { position: 0, edge: ClaimEdge::Bottom };
        assert_eq!(outside.target(), None);
    }

    #[test]
    fn leveled_upgrades_expand_to_boxes() {
        let upgrades = Upgrades {
            checkboxes: vec!["train_resolve".into()],
            leveled: BTreeMap::from([("lair_secure".to_string(), 2)]),
        };
        assert_eq!(
            upgrades.checked_fields(),
            vec!["train_resolve", "lair_secure_1", "lair_secure_2"]
        );
    }

    #[test]
    fn deserializes_cohort_type() {
        let json = r#"{"name":"Rooks","type":"expert","tags":"Thugs"}"#;
        let cohort: CohortTemplate = serde_json::from_str(json).expect("valid cohort");
        assert_eq!(cohort.kind, CohortKind::Expert);
        assert_eq!(cohort.edges, "");
    }
}
