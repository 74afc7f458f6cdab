//! In-memory host adapters.
//!
//! `InMemorySheet` stands in for the virtual tabletop's attribute store and
//! `ScriptedRoller` for its roll engine. They back the replay binary and the
//! dispatcher tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use babel_domain::{
    DiceOutcome, FieldPatch, FieldSnapshot, RepeatingField, RollId, RowId, Section,
};
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ports::{PortError, RollPort, RollRequest, RollResult, SheetStore};

/// Field store for one sheet.
#[derive(Debug, Default)]
pub struct InMemorySheet {
    fields: DashMap<String, String>,
    rows: DashMap<Section, Vec<RowId>>,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet preloaded with `fields`; repeating rows are discovered from the
    /// field names in sorted order.
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        let sheet = Self::new();
        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        for name in names {
            sheet.track_row(name);
        }
        for (name, value) in fields {
            sheet.fields.insert(name, value);
        }
        sheet
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|v| v.value().clone())
    }

    /// Every field, sorted by name.
    pub fn fields(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn track_row(&self, name: &str) {
        if let Some(field) = RepeatingField::parse(name) {
            let mut rows = self.rows.entry(field.section).or_default();
            if !rows.contains(&field.row_id) {
                rows.push(field.row_id);
            }
        }
    }
}

#[async_trait]
impl SheetStore for InMemorySheet {
    async fn read_fields(&self, names: &[String]) -> Result<FieldSnapshot, PortError> {
        Ok(names
            .iter()
            .filter_map(|name| self.get(name).map(|value| (name.clone(), value)))
            .collect())
    }

    async fn write_fields(&self, patch: &FieldPatch) -> Result<(), PortError> {
        for (name, value) in patch.iter() {
            self.track_row(name);
            self.fields.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn list_rows(&self, section: Section) -> Result<Vec<RowId>, PortError> {
        Ok(self
            .rows
            .get(&section)
            .map(|rows| rows.value().clone())
            .unwrap_or_default())
    }

    async fn delete_row(&self, section: Section, row_id: &RowId) -> Result<(), PortError> {
        {
            let mut rows = self
                .rows
                .get_mut(&section)
                .ok_or_else(|| PortError::row_not_found(section, row_id))?;
            let before = rows.len();
            rows.retain(|row| row != row_id);
            if rows.len() == before {
                return Err(PortError::row_not_found(section, row_id));
            }
        }
        self.fields.retain(|name, _| {
            !matches!(
                RepeatingField::parse(name),
                Some(field) if field.section == section && &field.row_id == row_id
            )
        });
        Ok(())
    }

    fn new_row_id(&self) -> RowId {
        RowId::new(Uuid::new_v4().simple().to_string())
    }
}

/// Roll engine replaying pre-scripted dice.
#[derive(Debug, Default)]
pub struct ScriptedRoller {
    script: Mutex<VecDeque<Vec<u8>>>,
    requests: Mutex<Vec<RollRequest>>,
    completions: Mutex<Vec<(RollId, BTreeMap<String, String>)>>,
    next_id: AtomicU64,
}

impl ScriptedRoller {
    /// Each entry is the raw dice of one roll, consumed in order.
    pub fn new(script: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    pub async fn requests(&self) -> Vec<RollRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn completions(&self) -> Vec<(RollId, BTreeMap<String, String>)> {
        self.completions.lock().await.clone()
    }
}

#[async_trait]
impl RollPort for ScriptedRoller {
    async fn request_roll(&self, request: &RollRequest) -> Result<RollResult, PortError> {
        let roll_id = RollId::new(format!(
            "roll-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        ));
        self.requests.lock().await.push(request.clone());

        let Some(formula) = request.formula else {
            return Ok(RollResult {
                roll_id,
                dice: None,
            });
        };
        let dice = self
            .script
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| PortError::roll("scripted dice exhausted"))?;
        let result = formula
            .kept(&dice)
            .ok_or_else(|| PortError::roll("scripted roll has no dice"))?;

        Ok(RollResult {
            roll_id,
            dice: Some(DiceOutcome::new(result, dice)),
        })
    }

    async fn complete_roll(
        &self,
        roll_id: &RollId,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), PortError> {
        self.completions
            .lock()
            .await
            .push((roll_id.clone(), fields.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_only_present_fields() {
        let sheet = InMemorySheet::from_fields(HashMap::from([("heat".to_string(), "3".to_string())]));
        let snapshot = sheet
            .read_fields(&["heat".to_string(), "heat_dice".to_string()])
            .await
            .expect("read succeeds");
        assert_eq!(snapshot.get("heat"), Some("3"));
        assert_eq!(snapshot.get("heat_dice"), None);
    }

    #[tokio::test]
    async fn rows_follow_writes_and_deletes() {
        let sheet = InMemorySheet::from_fields(HashMap::from([(
            "repeating_items_b_name".to_string(),
            "Knife".to_string(),
        )]));
        sheet
            .write_fields(&FieldPatch::computed().with("repeating_items_a_name", "Rope"))
            .await
            .expect("write succeeds");

        let rows = sheet.list_rows(Section::Items).await.expect("list succeeds");
        assert_eq!(rows, vec![RowId::new("b"), RowId::new("a")]);

        sheet
            .delete_row(Section::Items, &RowId::new("b"))
            .await
            .expect("delete succeeds");
        assert_eq!(sheet.get("repeating_items_b_name"), None);
        assert_eq!(sheet.list_rows(Section::Items).await.expect("list"), vec![RowId::new("a")]);

        let err = sheet
            .delete_row(Section::Items, &RowId::new("b"))
            .await
            .expect_err("row already gone");
        assert!(matches!(err, PortError::RowNotFound { .. }));
    }

    #[tokio::test]
    async fn deleting_a_row_leaves_rows_sharing_its_prefix() {
        let sheet = InMemorySheet::from_fields(HashMap::from([
            ("repeating_items_-Mx_name".to_string(), "Rope".to_string()),
            ("repeating_items_-Mx_9z_name".to_string(), "Knife".to_string()),
        ]));
        sheet
            .delete_row(Section::Items, &RowId::new("-Mx"))
            .await
            .expect("delete succeeds");

        assert_eq!(sheet.get("repeating_items_-Mx_name"), None);
        assert_eq!(sheet.get("repeating_items_-Mx_9z_name").as_deref(), Some("Knife"));
        assert_eq!(
            sheet.list_rows(Section::Items).await.expect("list"),
            vec![RowId::new("-Mx_9z")]
        );
    }

    #[test]
    fn fresh_row_ids_are_unique() {
        let sheet = InMemorySheet::new();
        assert_ne!(sheet.new_row_id(), sheet.new_row_id());
    }

    #[tokio::test]
    async fn scripted_roller_keeps_per_formula() {
        let roller = ScriptedRoller::new([vec![2, 5, 3], vec![4, 1]]);
        let high = roller
            .request_roll(&RollRequest::new(
                babel_domain::RollKind::Action,
                "Hack",
                babel_domain::RollFormula::for_pool(3),
            ))
            .await
            .expect("roll succeeds");
        assert_eq!(high.dice.map(|d| d.result), Some(5));

        let low = roller
            .request_roll(&RollRequest::new(
                babel_domain::RollKind::Action,
                "Sway",
                babel_domain::RollFormula::for_pool(0),
            ))
            .await
            .expect("roll succeeds");
        assert_eq!(low.dice.map(|d| d.result), Some(1));
        assert_ne!(high.roll_id, low.roll_id);

        let exhausted = roller
            .request_roll(&RollRequest::new(
                babel_domain::RollKind::Fortune,
                "Fortune",
                babel_domain::RollFormula::for_pool(1),
            ))
            .await;
        assert!(exhausted.is_err());
    }
}
