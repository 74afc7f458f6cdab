//! Sheet events and their routing.

use babel_domain::aggregates::{claims, load};
use babel_domain::fields::{CREW_TYPE, HEAT, LOAD_SELECTOR, PLAYBOOK};
use babel_domain::{Action, Attribute, RepeatingField, RowId, Section};
use serde::{Deserialize, Serialize};

/// An event raised by the host sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SheetEvent {
    /// A field changed, by the player or by a cascading computed write.
    FieldChanged {
        source_field: String,
        #[serde(default)]
        previous_value: Option<String>,
        #[serde(default)]
        new_value: Option<String>,
    },
    RowRemoved {
        section: Section,
        row_id: RowId,
    },
    /// A button was pressed; repeating buttons carry their row.
    Clicked {
        control: String,
        #[serde(default)]
        row_id: Option<RowId>,
    },
    SheetOpened,
}

impl SheetEvent {
    pub fn field_changed(source_field: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self::FieldChanged {
            source_field: source_field.into(),
            previous_value: None,
            new_value: Some(new_value.into()),
        }
    }

    pub fn clicked(control: impl Into<String>) -> Self {
        Self::Clicked {
            control: control.into(),
            row_id: None,
        }
    }

    /// The handler this event triggers, if any.
    pub fn route(&self) -> Option<Route> {
        match self {
            SheetEvent::FieldChanged { source_field, .. } => route_field(source_field),
            SheetEvent::RowRemoved { section, .. } => match section {
                Section::Items => Some(Route::Load),
                Section::Augments => Some(Route::Maintenance),
                _ => None,
            },
            SheetEvent::Clicked { control, row_id } => route_click(control, row_id.as_ref()),
            SheetEvent::SheetOpened => Some(Route::SheetOpened),
        }
    }
}

/// Handlers the dispatcher can run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Attribute(Attribute),
    Load,
    Maintenance,
    Heat,
    Claims,
    SelectPlaybook,
    SelectCrew,
    RollAction(Action),
    RollResistance(Attribute),
    RollFortune,
    RollVice,
    RollDisengage,
    RollEngagement,
    RollMaintenance,
    RollCohort(RowId),
    ResetPlaybook,
    ResetCrew,
    ResetFactions,
    SheetOpened,
}

fn route_field(name: &str) -> Option<Route> {
    if let Ok(action) = name.parse::<Action>() {
        return Some(Route::Attribute(action.attribute()));
    }
    match name {
        LOAD_SELECTOR => return Some(Route::Load),
        HEAT => return Some(Route::Heat),
        PLAYBOOK => return Some(Route::SelectPlaybook),
        CREW_TYPE => return Some(Route::SelectCrew),
        _ => {}
    }
    if load::is_standard_load_field(name) {
        return Some(Route::Load);
    }
    if claims::is_source_field(name) {
        return Some(Route::Claims);
    }
    let field = RepeatingField::parse(name)?;
    match field.section {
        Section::Items if load::is_row_load_suffix(&field.suffix) => Some(Route::Load),
        Section::Augments => Some(Route::Maintenance),
        _ => None,
    }
}

fn route_click(control: &str, row_id: Option<&RowId>) -> Option<Route> {
    if let Some(field) = RepeatingField::parse(control) {
        return (field.section == Section::Cohorts && field.suffix == "roll")
            .then_some(Route::RollCohort(field.row_id));
    }
    match control {
        "roll_fortune" => return Some(Route::RollFortune),
        "roll_vice" => return Some(Route::RollVice),
        "roll_disengage" => return Some(Route::RollDisengage),
        "roll_engagement" => return Some(Route::RollEngagement),
        "roll_maintenance" => return Some(Route::RollMaintenance),
        "roll_cohort" => return row_id.cloned().map(Route::RollCohort),
        "reset_playbook" => return Some(Route::ResetPlaybook),
        "reset_crew" => return Some(Route::ResetCrew),
        "reset_factions" => return Some(Route::ResetFactions),
        _ => {}
    }
    let name = control.strip_prefix("roll_")?;
    if let Some(attribute) = name.strip_suffix("_resist") {
        return attribute.parse().ok().map(Route::RollResistance);
    }
    name.parse().ok().map(Route::RollAction)
}
