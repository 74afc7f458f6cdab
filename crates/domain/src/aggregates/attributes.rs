//! Actions and the attribute ratings derived from them.
//!
//! Each attribute owns four actions; its rating is the number of those
//! actions with at least one dot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// The twelve actions a character rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Hack,
    Recon,
    Scrutinize,
    Tamper,
    Brawl,
    Hunt,
    Skulk,
    Vandalize,
    Consort,
    Dominate,
    Finesse,
    Sway,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::Hack,
        Action::Recon,
        Action::Scrutinize,
        Action::Tamper,
        Action::Brawl,
        Action::Hunt,
        Action::Skulk,
        Action::Vandalize,
        Action::Consort,
        Action::Dominate,
        Action::Finesse,
        Action::Sway,
    ];

    /// Field name holding the action's rating (also its display key).
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Hack => "hack",
            Action::Recon => "recon",
            Action::Scrutinize => "scrutinize",
            Action::Tamper => "tamper",
            Action::Brawl => "brawl",
            Action::Hunt => "hunt",
            Action::Skulk => "skulk",
            Action::Vandalize => "vandalize",
            Action::Consort => "consort",
            Action::Dominate => "dominate",
            Action::Finesse => "finesse",
            Action::Sway => "sway",
        }
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            Action::Hack | Action::Recon | Action::Scrutinize | Action::Tamper => {
                Attribute::Acuity
            }
            Action::Brawl | Action::Hunt | Action::Skulk | Action::Vandalize => Attribute::Grit,
            Action::Consort | Action::Dominate | Action::Finesse | Action::Sway => {
                Attribute::Resolve
            }
        }
    }

    pub fn rating(&self, snapshot: &FieldSnapshot) -> i32 {
        snapshot.int(self.as_str(), 0)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown action: {}", s)))
    }
}

/// Attributes used for resistance rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Acuity,
    Grit,
    Resolve,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Acuity, Attribute::Grit, Attribute::Resolve];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Acuity => "acuity",
            Attribute::Grit => "grit",
            Attribute::Resolve => "resolve",
        }
    }

    pub fn actions(&self) -> [Action; 4] {
        match self {
            Attribute::Acuity => [Action::Hack, Action::Recon, Action::Scrutinize, Action::Tamper],
            Attribute::Grit => [Action::Brawl, Action::Hunt, Action::Skulk, Action::Vandalize],
            Attribute::Resolve => [
                Action::Consort,
                Action::Dominate,
                Action::Finesse,
                Action::Sway,
            ],
        }
    }

    /// Field the derived rating is written to, e.g. `acuity_rating`.
    pub fn rating_field(&self) -> String {
        format!("{}_rating", self.as_str())
    }

    /// Number of this attribute's actions with a rating above zero (0..=4).
    pub fn rating(&self, snapshot: &FieldSnapshot) -> i32 {
        self.actions()
            .iter()
            .filter(|action| action.rating(snapshot) > 0)
            .count() as i32
    }

    /// Fields the aggregator has to read: the four actions and its own output.
    pub fn dependencies(&self) -> Vec<String> {
        self.actions()
            .iter()
            .map(|action| action.as_str().to_string())
            .chain(std::iter::once(self.rating_field()))
            .collect()
    }

    /// Write-suppressed patch for this attribute's rating.
    pub fn recompute(&self, snapshot: &FieldSnapshot) -> FieldPatch {
        FieldPatch::computed()
            .with(self.rating_field(), self.rating(snapshot))
            .suppress_unchanged(snapshot)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown attribute: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_belongs_to_exactly_one_attribute() {
        for action in Action::ALL {
            let owners: Vec<_> = Attribute::ALL
                .iter()
                .filter(|attribute| attribute.actions().contains(&action))
                .collect();
            assert_eq!(owners, vec![&action.attribute()]);
        }
    }

    #[test]
    fn rating_counts_actions_with_dots() {
        let snapshot = FieldSnapshot::new()
            .with("hack", "2")
            .with("recon", "0")
            .with("scrutinize", "1")
            .with("tamper", "");
        assert_eq!(Attribute::Acuity.rating(&snapshot), 2);

        let full = FieldSnapshot::new()
            .with("brawl", "4")
            .with("hunt", "1")
            .with("skulk", "3")
            .with("vandalize", "1");
        assert_eq!(Attribute::Grit.rating(&full), 4);
    }

    #[test]
    fn unrelated_actions_do_not_change_rating() {
        let base = FieldSnapshot::new().with("consort", "1");
        let noisy = base.clone().with("hack", "3").with("brawl", "2");
        assert_eq!(
            Attribute::Resolve.rating(&base),
            Attribute::Resolve.rating(&noisy)
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let snapshot = FieldSnapshot::new().with("sway", "2").with("finesse", "1");
        let patch = Attribute::Resolve.recompute(&snapshot);
        assert_eq!(patch.get("resolve_rating"), Some("2"));

        let settled = snapshot.with("resolve_rating", "2");
        assert!(Attribute::Resolve.recompute(&settled).is_empty());
    }

    #[test]
    fn dependencies_include_output() {
        let deps = Attribute::Grit.dependencies();
        assert_eq!(deps.len(), 5);
        assert!(deps.contains(&"grit_rating".to_string()));
        assert!(deps.contains(&"vandalize".to_string()));
    }

    #[test]
    fn parse_names() {
        assert_eq!("tamper".parse::<Action>(), Ok(Action::Tamper));
        assert_eq!("grit".parse::<Attribute>(), Ok(Attribute::Grit));
        assert!("study".parse::<Action>().is_err());
    }
}
