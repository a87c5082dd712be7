//! Editing state of the action & parameters step.
//!
//! The wizard owns the form values; this state only tracks which row has
//! focus, the raw text of free-text fields, and the option cursor of
//! multiselect fields. Every edit is pushed straight into the wizard so
//! field errors stay current.

use std::collections::HashMap;

use indexmap::IndexMap;
use scriptdeck_engine::{WizardError, WizardState, WizardStep, parse_input};
use scriptdeck_types::{Parameter, ParameterKind};
use serde_json::Value;

use crate::ui::components::common::TextInputState;

/// One focusable line of the action form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRow {
    Action,
    Field(String),
    Team,
    Project,
    Submit,
}

#[derive(Debug, Default)]
pub struct ActionFormState {
    focused: usize,
    buffers: IndexMap<String, TextInputState>,
    option_cursor: HashMap<String, usize>,
}

fn takes_text(kind: ParameterKind) -> bool {
    matches!(kind, ParameterKind::Text | ParameterKind::Textarea | ParameterKind::Number)
}

fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Cycles through `[none, items...]`, wrapping at both ends.
fn cycle<'a>(items: &'a [String], current: Option<&str>, forward: bool) -> Option<&'a String> {
    let slots = items.len() + 1;
    let position = current
        .and_then(|current| items.iter().position(|item| item == current))
        .map_or(0, |index| index + 1);
    let next = if forward { (position + 1) % slots } else { (position + slots - 1) % slots };
    next.checked_sub(1).and_then(|index| items.get(index))
}

impl ActionFormState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rows for the wizard's current action, top to bottom.
    pub fn rows(wizard: &WizardState) -> Vec<FormRow> {
        let mut rows = vec![FormRow::Action];
        if let Some(action) = wizard.action() {
            rows.extend(action.parameters.iter().map(|parameter| FormRow::Field(parameter.id.clone())));
        }
        if wizard.requires_context() {
            rows.push(FormRow::Team);
            rows.push(FormRow::Project);
        }
        rows.push(FormRow::Submit);
        rows
    }

    pub fn focused_row(&self, wizard: &WizardState) -> FormRow {
        let rows = Self::rows(wizard);
        let index = self.focused.min(rows.len() - 1);
        rows[index].clone()
    }

    pub fn focus_next(&mut self, wizard: &WizardState) {
        let last = Self::rows(wizard).len() - 1;
        self.focused = (self.focused + 1).min(last);
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.saturating_sub(1);
    }

    pub fn buffer(&self, field: &str) -> Option<&TextInputState> {
        self.buffers.get(field)
    }

    pub fn option_cursor(&self, field: &str) -> usize {
        self.option_cursor.get(field).copied().unwrap_or_default()
    }

    /// Whether typed characters should go to the focused row.
    pub fn accepts_text(&self, wizard: &WizardState) -> bool {
        match self.focused_row(wizard) {
            FormRow::Field(id) => focused_parameter(wizard, &id).is_some_and(|parameter| takes_text(parameter.kind)),
            _ => false,
        }
    }

    /// Selects the previous/next action of the script and rebuilds the
    /// text buffers from the new defaults.
    pub fn cycle_action(&mut self, wizard: &mut WizardState, forward: bool) -> Result<(), WizardError> {
        let Some(script) = wizard.script() else {
            return Err(WizardError::NoScriptSelected);
        };
        let ids: Vec<String> = script.actions.iter().map(|action| action.id.clone()).collect();
        let current = wizard.action().map(|action| action.id.as_str());
        let next = match cycle(&ids, current, forward) {
            Some(next) => next.clone(),
            // Skip the empty slot; an action cannot be deselected.
            None => match cycle(&ids, None, forward) {
                Some(next) => next.clone(),
                None => return Ok(()),
            },
        };
        self.select_action(wizard, &next)
    }

    pub fn select_action(&mut self, wizard: &mut WizardState, action_id: &str) -> Result<(), WizardError> {
        wizard.select_action(action_id)?;
        self.buffers.clear();
        self.option_cursor.clear();
        if let Some(action) = wizard.action() {
            for parameter in action.parameters.iter().filter(|parameter| takes_text(parameter.kind)) {
                let text = display_text(wizard.field(&parameter.id));
                self.buffers.insert(parameter.id.clone(), TextInputState::with_text(text));
            }
        }
        Ok(())
    }

    pub fn insert_char(&mut self, wizard: &mut WizardState, character: char) -> Result<(), WizardError> {
        self.edit_buffer(wizard, |buffer| buffer.insert_char(character))
    }

    pub fn backspace(&mut self, wizard: &mut WizardState) -> Result<(), WizardError> {
        self.edit_buffer(wizard, TextInputState::backspace)
    }

    pub fn move_cursor(&mut self, wizard: &WizardState, forward: bool) {
        if let FormRow::Field(id) = self.focused_row(wizard)
            && let Some(buffer) = self.buffers.get_mut(&id)
        {
            if forward {
                buffer.move_right();
            } else {
                buffer.move_left();
            }
        }
    }

    fn edit_buffer(&mut self, wizard: &mut WizardState, edit: impl FnOnce(&mut TextInputState)) -> Result<(), WizardError> {
        let FormRow::Field(id) = self.focused_row(wizard) else {
            return Ok(());
        };
        let Some(kind) = focused_parameter(wizard, &id).map(|parameter| parameter.kind) else {
            return Ok(());
        };
        let Some(buffer) = self.buffers.get_mut(&id) else {
            return Ok(());
        };
        edit(buffer);
        wizard.set_field(&id, parse_input(kind, buffer.input()))
    }

    /// Space on the focused row: flips a checkbox or toggles the
    /// multiselect option under the cursor.
    pub fn toggle(&mut self, wizard: &mut WizardState) -> Result<(), WizardError> {
        let FormRow::Field(id) = self.focused_row(wizard) else {
            return Ok(());
        };
        let Some(parameter) = focused_parameter(wizard, &id).cloned() else {
            return Ok(());
        };
        match parameter.kind {
            ParameterKind::Boolean => {
                let checked = wizard.field(&id).and_then(Value::as_bool).unwrap_or(false);
                wizard.set_field(&id, Value::Bool(!checked))
            }
            ParameterKind::Multiselect => {
                let Some(option) = parameter.options.get(self.option_cursor(&id)) else {
                    return Ok(());
                };
                let mut chosen: Vec<String> = wizard
                    .field(&id)
                    .and_then(Value::as_array)
                    .map(|values| values.iter().filter_map(Value::as_str).map(str::to_string).collect())
                    .unwrap_or_default();
                if let Some(index) = chosen.iter().position(|value| *value == option.value) {
                    chosen.remove(index);
                } else {
                    chosen.push(option.value.clone());
                }
                // Keep the declared option order.
                let ordered: Vec<Value> = parameter
                    .options
                    .iter()
                    .filter(|candidate| chosen.contains(&candidate.value))
                    .map(|candidate| Value::String(candidate.value.clone()))
                    .collect();
                wizard.set_field(&id, Value::Array(ordered))
            }
            _ => Ok(()),
        }
    }

    /// Left/Right on the focused row.
    pub fn cycle_option(&mut self, wizard: &mut WizardState, teams: &[String], projects: &[String], forward: bool) -> Result<(), WizardError> {
        match self.focused_row(wizard) {
            FormRow::Action => self.cycle_action(wizard, forward),
            FormRow::Team => {
                let next = cycle(teams, wizard.team(), forward).cloned();
                wizard.set_team(next);
                Ok(())
            }
            FormRow::Project => {
                let next = cycle(projects, wizard.project(), forward).cloned();
                wizard.set_project(next);
                Ok(())
            }
            FormRow::Field(id) => {
                let Some(parameter) = focused_parameter(wizard, &id).cloned() else {
                    return Ok(());
                };
                match parameter.kind {
                    ParameterKind::Select => {
                        let values: Vec<String> = parameter.options.iter().map(|option| option.value.clone()).collect();
                        let next = cycle(&values, wizard.field(&id).and_then(Value::as_str), forward);
                        wizard.set_field(&id, next.map_or(Value::Null, |value| Value::String(value.clone())))
                    }
                    ParameterKind::Multiselect if !parameter.options.is_empty() => {
                        let count = parameter.options.len();
                        let cursor = self.option_cursor(&id);
                        let next = if forward { (cursor + 1) % count } else { (cursor + count - 1) % count };
                        self.option_cursor.insert(id, next);
                        Ok(())
                    }
                    ParameterKind::Boolean => self.toggle(wizard),
                    _ => {
                        self.move_cursor(wizard, forward);
                        Ok(())
                    }
                }
            }
            FormRow::Submit => Ok(()),
        }
    }

    /// Enter on the focused row. Returns `true` when the form was submitted
    /// and the wizard moved on to the confirm step.
    pub fn activate(&mut self, wizard: &mut WizardState) -> Result<bool, WizardError> {
        match self.focused_row(wizard) {
            FormRow::Submit => {
                wizard.submit()?;
                Ok(wizard.step() == WizardStep::Confirm)
            }
            FormRow::Field(id) if focused_parameter(wizard, &id).is_some_and(|parameter| parameter.kind == ParameterKind::Boolean) => {
                self.toggle(wizard)?;
                Ok(false)
            }
            _ => {
                self.focus_next(wizard);
                Ok(false)
            }
        }
    }
}

fn focused_parameter<'a>(wizard: &'a WizardState, id: &str) -> Option<&'a Parameter> {
    wizard.action().and_then(|action| action.parameter(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::{CatalogMeta, HttpMethod, ParameterOption, Script, ScriptAction};

    fn option(value: &str) -> ParameterOption {
        ParameterOption {
            label: value.to_uppercase(),
            value: value.into(),
        }
    }

    fn action(id: &str, parameters: Vec<Parameter>) -> ScriptAction {
        ScriptAction {
            id: id.into(),
            name: id.into(),
            endpoint: format!("/api/{id}"),
            method: HttpMethod::Post,
            description: format!("Execute {id} command"),
            parameters,
            action_type: None,
        }
    }

    fn wizard(require_context: bool) -> WizardState {
        let mut level = Parameter::new("level", ParameterKind::Select, true);
        level.options = vec![option("low"), option("high")];
        let mut targets = Parameter::new("targets", ParameterKind::Multiselect, false);
        targets.options = vec![option("logs"), option("tmp"), option("cache")];
        let script = Script {
            id: "disk-cleanup".into(),
            name: "disk-cleanup".into(),
            description: String::new(),
            category: "maintenance".into(),
            path: "system/maintenance".into(),
            meta: CatalogMeta::default(),
            actions: vec![
                action(
                    "cleanup",
                    vec![
                        Parameter::new("hostname", ParameterKind::Text, true),
                        Parameter::new("timeout", ParameterKind::Number, false),
                        Parameter::new("dry_run", ParameterKind::Boolean, false),
                        level,
                        targets,
                    ],
                ),
                action("analyze", Vec::new()),
            ],
        };
        let mut wizard = WizardState::new(require_context);
        wizard.select_script(script);
        wizard.next().expect("info -> action");
        wizard
    }

    fn focus(form: &mut ActionFormState, wizard: &WizardState, row: FormRow) {
        form.focused = ActionFormState::rows(wizard)
            .iter()
            .position(|candidate| *candidate == row)
            .expect("row exists");
    }

    #[test]
    fn action_cycling_never_lands_on_empty_slot() {
        let mut wizard = wizard(false);
        let mut form = ActionFormState::default();
        form.cycle_action(&mut wizard, true).expect("first action");
        assert_eq!(wizard.action().map(|action| action.id.as_str()), Some("cleanup"));
        form.cycle_action(&mut wizard, true).expect("second action");
        assert_eq!(wizard.action().map(|action| action.id.as_str()), Some("analyze"));
        form.cycle_action(&mut wizard, true).expect("wraps");
        assert_eq!(wizard.action().map(|action| action.id.as_str()), Some("cleanup"));
    }

    #[test]
    fn rows_follow_parameters_and_context() {
        let mut wizard = wizard(true);
        let mut form = ActionFormState::default();
        form.select_action(&mut wizard, "cleanup").expect("select");
        let rows = ActionFormState::rows(&wizard);
        assert_eq!(rows.first(), Some(&FormRow::Action));
        assert_eq!(rows[1], FormRow::Field("hostname".into()));
        assert_eq!(&rows[rows.len() - 3..], [FormRow::Team, FormRow::Project, FormRow::Submit]);
    }

    #[test]
    fn typing_updates_values_and_errors() {
        let mut wizard = wizard(false);
        let mut form = ActionFormState::default();
        form.select_action(&mut wizard, "cleanup").expect("select");

        focus(&mut form, &wizard, FormRow::Field("timeout".into()));
        assert!(form.accepts_text(&wizard));
        form.insert_char(&mut wizard, '3').expect("edit");
        form.insert_char(&mut wizard, '0').expect("edit");
        assert_eq!(wizard.field("timeout"), Some(&Value::from(30)));
        assert_eq!(form.buffer("timeout").map(TextInputState::input), Some("30"));

        focus(&mut form, &wizard, FormRow::Field("hostname".into()));
        form.insert_char(&mut wizard, 'x').expect("edit");
        form.backspace(&mut wizard).expect("edit");
        assert_eq!(wizard.errors().get("hostname"), Some("This field is required"));
    }

    #[test]
    fn checkbox_select_and_multiselect_editors() {
        let mut wizard = wizard(false);
        let mut form = ActionFormState::default();
        form.select_action(&mut wizard, "cleanup").expect("select");

        focus(&mut form, &wizard, FormRow::Field("dry_run".into()));
        form.toggle(&mut wizard).expect("toggle");
        assert_eq!(wizard.field("dry_run"), Some(&Value::Bool(true)));

        focus(&mut form, &wizard, FormRow::Field("level".into()));
        form.cycle_option(&mut wizard, &[], &[], true).expect("cycle");
        assert_eq!(wizard.field("level"), Some(&Value::from("low")));
        form.cycle_option(&mut wizard, &[], &[], false).expect("cycle back");
        assert_eq!(wizard.field("level"), Some(&Value::Null));
        assert_eq!(wizard.errors().get("level"), Some("Please select an option"));

        focus(&mut form, &wizard, FormRow::Field("targets".into()));
        form.cycle_option(&mut wizard, &[], &[], true).expect("cursor");
        form.cycle_option(&mut wizard, &[], &[], true).expect("cursor");
        form.toggle(&mut wizard).expect("toggle cache");
        form.cycle_option(&mut wizard, &[], &[], false).expect("cursor");
        form.cycle_option(&mut wizard, &[], &[], false).expect("cursor");
        form.toggle(&mut wizard).expect("toggle logs");
        assert_eq!(wizard.field("targets"), Some(&serde_json::json!(["logs", "cache"])));
    }

    #[test]
    fn context_pickers_cycle_through_known_values() {
        let mut wizard = wizard(true);
        let mut form = ActionFormState::default();
        form.select_action(&mut wizard, "analyze").expect("select");
        let teams = vec!["ops".to_string(), "sre".to_string()];
        let projects = vec!["infra".to_string()];

        focus(&mut form, &wizard, FormRow::Team);
        form.cycle_option(&mut wizard, &teams, &projects, false).expect("team");
        assert_eq!(wizard.team(), Some("sre"));

        focus(&mut form, &wizard, FormRow::Submit);
        assert_eq!(form.activate(&mut wizard), Err(WizardError::MissingContext));

        focus(&mut form, &wizard, FormRow::Project);
        form.cycle_option(&mut wizard, &teams, &projects, true).expect("project");
        focus(&mut form, &wizard, FormRow::Submit);
        assert_eq!(form.activate(&mut wizard), Ok(true));
        assert_eq!(wizard.step(), WizardStep::Confirm);
    }
}
