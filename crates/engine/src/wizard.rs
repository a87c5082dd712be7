//! Three-step wizard state: script information → action and parameters →
//! confirm and execute, plus the transient output overlay.
//!
//! All selection state lives in [`WizardState`]; nothing is ambient. The
//! explicit reset points are:
//!
//! - selecting a different script or category clears the action and form,
//! - closing the output overlay returns to [`WizardStep::Info`] with an
//!   empty form.

use std::fmt;

use scriptdeck_types::{ExecutionRequest, ExecutionResponse, Script, ScriptAction};
use scriptdeck_util::format_param_value;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    executor::ExecutionError,
    form::{FormValues, default_values},
    schema::{ValidationErrors, ValidationSchema},
};

pub const MISSING_ACTION_MESSAGE: &str = "Please select an action before proceeding";
pub const MISSING_CONTEXT_MESSAGE: &str = "Please select a team and project";

/// Wizard step, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Info,
    Action,
    Confirm,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Info, WizardStep::Action, WizardStep::Confirm];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "1. Script Information",
            Self::Action => "2. Action & Parameters",
            Self::Confirm => "3. Confirm & Execute",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Info => 0,
            Self::Action => 1,
            Self::Confirm => 2,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Rejected wizard transitions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    #[error("no script selected")]
    NoScriptSelected,
    #[error("Please select an action before proceeding")]
    NoActionSelected,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("unknown parameter '{0}'")]
    UnknownField(String),
    #[error("not available during '{actual}' (requires '{expected}')")]
    WrongStep { expected: WizardStep, actual: WizardStep },
    #[error("form has errors: {0}")]
    Invalid(ValidationErrors),
    #[error("Please select a team and project")]
    MissingContext,
    #[error("an execution is already in progress")]
    ExecutionPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One-shot user notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Explicit wizard and selection state.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    step: WizardStep,
    category: Option<String>,
    script: Option<Script>,
    action: Option<ScriptAction>,
    schema: Option<ValidationSchema>,
    form: FormValues,
    errors: ValidationErrors,
    submitted: Option<FormValues>,
    team: Option<String>,
    project: Option<String>,
    require_context: bool,
    pending: bool,
    /// The pending run belongs to a selection that has since been replaced.
    abandoned: bool,
    output: Option<ExecutionResponse>,
    notice: Option<Notice>,
}

impl WizardState {
    pub fn new(require_context: bool) -> Self {
        Self {
            require_context,
            ..Self::default()
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn action(&self) -> Option<&ScriptAction> {
        self.action.as_ref()
    }

    pub fn schema(&self) -> Option<&ValidationSchema> {
        self.schema.as_ref()
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn requires_context(&self) -> bool {
        self.require_context
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Response shown in the output overlay; `Some` while it is open.
    pub fn output(&self) -> Option<&ExecutionResponse> {
        self.output.as_ref()
    }

    pub fn is_output_open(&self) -> bool {
        self.output.is_some()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Selects a category, dropping any script, action and form data.
    pub fn select_category(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(category = %id, "category selected");
        self.category = Some(id);
        self.script = None;
        self.abandon_pending();
        self.clear_action();
        self.step = WizardStep::Info;
    }

    /// Selects a script and restarts the flow at the information step.
    pub fn select_script(&mut self, script: Script) {
        debug!(script = %script.id, path = %script.path, "script selected");
        self.category = Some(script.path.clone());
        self.script = Some(script);
        self.abandon_pending();
        self.clear_action();
        self.step = WizardStep::Info;
    }

    /// Info → Action.
    pub fn next(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Info)?;
        if self.script.is_none() {
            return Err(WizardError::NoScriptSelected);
        }
        self.step = WizardStep::Action;
        Ok(())
    }

    /// Chooses the action to configure; regenerates the schema and resets
    /// the form to the action's declared defaults.
    pub fn select_action(&mut self, action_id: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Action)?;
        let script = self.script.as_ref().ok_or(WizardError::NoScriptSelected)?;
        let action = script
            .action(action_id)
            .cloned()
            .ok_or_else(|| WizardError::UnknownAction(action_id.to_string()))?;

        debug!(action = %action.id, parameters = action.parameters.len(), "action selected");
        self.schema = Some(ValidationSchema::for_action(&action));
        self.form = default_values(&action.parameters);
        self.errors = ValidationErrors::new();
        self.submitted = None;
        self.action = Some(action);
        Ok(())
    }

    /// Sets one form value and re-validates that field.
    pub fn set_field(&mut self, field: &str, value: Value) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Action)?;
        let action = self.action.as_ref().ok_or(WizardError::NoActionSelected)?;
        if action.parameter(field).is_none() {
            return Err(WizardError::UnknownField(field.to_string()));
        }
        self.form.insert(field.to_string(), value);
        self.revalidate_field(field);
        Ok(())
    }

    pub fn field(&self, field: &str) -> Option<&Value> {
        self.form.get(field)
    }

    pub fn set_team(&mut self, team: Option<String>) {
        self.team = team.filter(|team| !team.trim().is_empty());
    }

    pub fn set_project(&mut self, project: Option<String>) {
        self.project = project.filter(|project| !project.trim().is_empty());
    }

    fn context_complete(&self) -> bool {
        !self.require_context || (self.team.is_some() && self.project.is_some())
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Action
            && self.context_complete()
            && self.schema.as_ref().is_some_and(|schema| schema.validate(&self.form).is_ok())
    }

    /// Action → Confirm after validating the whole form.
    ///
    /// Field errors are kept on the state for inline display.
    pub fn submit(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Action)?;
        let schema = self.schema.as_ref().ok_or(WizardError::NoActionSelected)?;
        if let Err(errors) = schema.validate(&self.form) {
            self.errors = errors.clone();
            return Err(WizardError::Invalid(errors));
        }
        self.errors = ValidationErrors::new();
        if !self.context_complete() {
            return Err(WizardError::MissingContext);
        }

        self.submitted = Some(self.form.clone());
        self.step = WizardStep::Confirm;
        debug!(fields = self.form.len(), "form submitted");
        Ok(())
    }

    /// Confirm → Action, keeping the entered values.
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        self.step = WizardStep::Action;
        Ok(())
    }

    /// Label/value rows for the confirmation summary, in parameter order.
    pub fn confirmation_rows(&self) -> Vec<(String, String)> {
        let (Some(action), Some(values)) = (self.action.as_ref(), self.submitted.as_ref()) else {
            return Vec::new();
        };
        action
            .parameters
            .iter()
            .map(|parameter| {
                let label = if parameter.label.is_empty() { parameter.id.clone() } else { parameter.label.clone() };
                (label, format_param_value(values.get(&parameter.id)))
            })
            .collect()
    }

    /// Marks an execution as pending and returns the request to run.
    ///
    /// A second call before [`WizardState::finish_execution`] is rejected.
    pub fn begin_execution(&mut self) -> Result<ExecutionRequest, WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        if self.pending {
            return Err(WizardError::ExecutionPending);
        }
        let action = self.action.as_ref().ok_or(WizardError::NoActionSelected)?;
        let payload = self.submitted.clone().unwrap_or_default();
        let request = ExecutionRequest::new(action.endpoint.clone(), action.method, payload);

        info!(
            endpoint = %request.endpoint,
            action = %action.id,
            team = self.team.as_deref().unwrap_or_default(),
            project = self.project.as_deref().unwrap_or_default(),
            "execution requested"
        );
        self.pending = true;
        Ok(request)
    }

    /// Starts over with an empty selection, keeping an in-flight run
    /// pending so no second execution can begin before it answers.
    pub fn restart(&mut self, require_context: bool) {
        let pending = self.pending;
        *self = Self::new(require_context);
        self.pending = pending;
        self.abandoned = pending;
    }

    /// Records the collaborator's answer.
    ///
    /// Any response, successful or not, opens the output overlay; a failed
    /// response also raises a notice. A collaborator error only raises a
    /// notice and leaves the wizard on the confirm step. The answer to a
    /// run whose selection was replaced meanwhile only clears the pending
    /// flag.
    pub fn finish_execution(&mut self, result: Result<ExecutionResponse, ExecutionError>) {
        self.pending = false;
        if std::mem::take(&mut self.abandoned) {
            debug!(success = ?result.as_ref().map(|response| response.success).ok(), "discarding result of abandoned execution");
            return;
        }
        match result {
            Ok(response) => {
                self.notice = Some(if response.success {
                    Notice {
                        level: NoticeLevel::Success,
                        message: "Script executed successfully".to_string(),
                    }
                } else {
                    warn!(error = ?response.error, "script execution failed");
                    Notice {
                        level: NoticeLevel::Error,
                        message: "Script execution failed".to_string(),
                    }
                });
                self.output = Some(response);
            }
            Err(err) => {
                warn!(error = %err, "execution collaborator error");
                self.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    message: format!("Script execution failed: {err}"),
                });
            }
        }
    }

    /// Closes the overlay and resets the flow to the information step.
    pub fn close_output(&mut self) {
        self.output = None;
        self.clear_action();
        self.step = WizardStep::Info;
    }

    fn abandon_pending(&mut self) {
        if self.pending {
            debug!("selection changed while an execution is pending");
            self.abandoned = true;
        }
    }

    fn clear_action(&mut self) {
        self.action = None;
        self.schema = None;
        self.form.clear();
        self.submitted = None;
        self.errors = ValidationErrors::new();
    }

    fn revalidate_field(&mut self, field: &str) {
        let Some(schema) = self.schema.as_ref() else {
            return;
        };
        match schema.validate_field(field, self.form.get(field)) {
            Ok(()) => {
                let mut errors = ValidationErrors::new();
                for (name, message) in self.errors.iter().filter(|(name, _)| *name != field) {
                    errors.insert(name, message);
                }
                self.errors = errors;
            }
            Err(message) => self.errors.insert(field, message),
        }
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::{CatalogMeta, HttpMethod, Parameter, ParameterKind};
    use serde_json::json;

    fn cleanup_script() -> Script {
        let mut older_than = Parameter::new("older_than", ParameterKind::Number, false);
        older_than.default = Some(json!(30));
        Script {
            id: "disk-cleanup".into(),
            name: "disk-cleanup".into(),
            description: "Clean old files".into(),
            category: "unix".into(),
            path: "system/maintenance".into(),
            meta: CatalogMeta::default(),
            actions: vec![
                ScriptAction {
                    id: "cleanup".into(),
                    name: "cleanup".into(),
                    endpoint: "/api/system/disk/cleanup".into(),
                    method: HttpMethod::Post,
                    description: "Execute cleanup command".into(),
                    parameters: vec![
                        Parameter::new("hostname", ParameterKind::Text, true),
                        Parameter::new("dry_run", ParameterKind::Boolean, false),
                        older_than,
                    ],
                    action_type: None,
                },
                ScriptAction {
                    id: "analyze".into(),
                    name: "analyze".into(),
                    endpoint: "/api/system/disk/analyze".into(),
                    method: HttpMethod::Post,
                    description: "Execute analyze command".into(),
                    parameters: vec![Parameter::new("path", ParameterKind::Text, true)],
                    action_type: None,
                },
            ],
        }
    }

    fn at_action(require_context: bool) -> WizardState {
        let mut wizard = WizardState::new(require_context);
        wizard.select_script(cleanup_script());
        wizard.next().expect("info -> action");
        wizard.select_action("cleanup").expect("select cleanup");
        wizard
    }

    #[test]
    fn next_requires_a_script() {
        let mut wizard = WizardState::new(false);
        assert_eq!(wizard.next(), Err(WizardError::NoScriptSelected));
        wizard.select_script(cleanup_script());
        assert_eq!(wizard.selected_category(), Some("system/maintenance"));
        wizard.next().expect("info -> action");
        assert_eq!(wizard.step(), WizardStep::Action);
    }

    #[test]
    fn selecting_an_action_seeds_defaults_and_schema() {
        let wizard = at_action(false);
        assert_eq!(wizard.form().get("older_than"), Some(&json!(30)));
        assert_eq!(wizard.schema().map(|schema| schema.action_id.as_str()), Some("cleanup"));
        assert!(!wizard.can_submit(), "hostname still missing");
    }

    #[test]
    fn submit_is_blocked_by_validation() {
        let mut wizard = at_action(false);
        let Err(WizardError::Invalid(errors)) = wizard.submit() else {
            panic!("empty hostname must block submission");
        };
        assert_eq!(errors.get("hostname"), Some("This field is required"));
        assert_eq!(wizard.errors().get("hostname"), Some("This field is required"));
        assert_eq!(wizard.step(), WizardStep::Action);
    }

    #[test]
    fn field_edits_update_inline_errors() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("")).expect("set hostname");
        assert_eq!(wizard.errors().get("hostname"), Some("This field is required"));
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        assert!(wizard.errors().is_empty());
        assert!(wizard.can_submit());
        assert_eq!(
            wizard.set_field("nope", json!(1)),
            Err(WizardError::UnknownField("nope".to_string()))
        );
    }

    #[test]
    fn context_is_required_when_configured() {
        let mut wizard = at_action(true);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        assert!(!wizard.can_submit());
        assert_eq!(wizard.submit(), Err(WizardError::MissingContext));

        wizard.set_team(Some("sre".into()));
        wizard.set_project(Some("  ".into()));
        assert_eq!(wizard.submit(), Err(WizardError::MissingContext));

        wizard.set_project(Some("infra".into()));
        assert!(wizard.can_submit());
        wizard.submit().expect("submit with context");
        assert_eq!(wizard.step(), WizardStep::Confirm);
    }

    #[test]
    fn back_keeps_values_and_confirm_rows_follow_parameter_order() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.set_field("dry_run", json!(true)).expect("set dry_run");
        wizard.submit().expect("submit");

        assert_eq!(
            wizard.confirmation_rows(),
            [
                ("hostname".to_string(), "web-1".to_string()),
                ("dry_run".to_string(), "Yes".to_string()),
                ("older_than".to_string(), "30".to_string()),
            ]
        );

        wizard.back().expect("confirm -> action");
        assert_eq!(wizard.step(), WizardStep::Action);
        assert_eq!(wizard.field("hostname"), Some(&json!("web-1")));
    }

    #[test]
    fn execution_is_single_shot_and_overlay_close_resets() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.submit().expect("submit");

        let request = wizard.begin_execution().expect("begin");
        assert_eq!(request.endpoint, "/api/system/disk/cleanup");
        assert_eq!(request.payload.get("hostname"), Some(&json!("web-1")));
        assert!(wizard.is_pending());
        assert_eq!(wizard.begin_execution(), Err(WizardError::ExecutionPending));

        wizard.finish_execution(Ok(ExecutionResponse::succeeded(json!({}), "[SUCCESS] done\n".into())));
        assert!(!wizard.is_pending());
        assert!(wizard.is_output_open());
        assert_eq!(wizard.take_notice().map(|notice| notice.level), Some(NoticeLevel::Success));
        assert!(wizard.take_notice().is_none());

        wizard.close_output();
        assert!(!wizard.is_output_open());
        assert_eq!(wizard.step(), WizardStep::Info);
        assert!(wizard.form().is_empty());
        assert!(wizard.action().is_none());
        assert!(wizard.script().is_some(), "the selected script survives the reset");
    }

    #[test]
    fn failed_response_opens_overlay_with_error_notice() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.submit().expect("submit");
        wizard.begin_execution().expect("begin");

        wizard.finish_execution(Ok(ExecutionResponse::failed("Connection timeout", "[ERROR] boom\n".into())));
        assert!(wizard.is_output_open());
        assert_eq!(wizard.notice().map(|notice| notice.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn collaborator_error_keeps_confirm_step() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.submit().expect("submit");
        wizard.begin_execution().expect("begin");

        wizard.finish_execution(Err(ExecutionError::MissingEndpoint));
        assert!(!wizard.is_output_open());
        assert_eq!(wizard.step(), WizardStep::Confirm);
        assert!(wizard.begin_execution().is_ok(), "user may retry");
    }

    #[test]
    fn reselection_clears_stale_state() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");

        wizard.select_script(cleanup_script());
        assert_eq!(wizard.step(), WizardStep::Info);
        assert!(wizard.action().is_none());
        assert!(wizard.form().is_empty());

        let mut wizard = at_action(false);
        wizard.select_category("network");
        assert!(wizard.script().is_none());
        assert!(wizard.action().is_none());
        assert_eq!(wizard.selected_category(), Some("network"));
    }

    #[test]
    fn reselecting_during_a_run_keeps_it_pending_and_drops_its_result() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.submit().expect("submit");
        wizard.begin_execution().expect("begin");

        wizard.select_script(cleanup_script());
        assert!(wizard.is_pending());
        wizard.next().expect("info -> action");
        wizard.select_action("analyze").expect("select analyze");
        wizard.set_field("path", json!("/var")).expect("set path");
        wizard.submit().expect("submit");
        assert_eq!(wizard.begin_execution(), Err(WizardError::ExecutionPending));

        wizard.finish_execution(Ok(ExecutionResponse::succeeded(json!({}), "[SUCCESS] done\n".into())));
        assert!(!wizard.is_pending());
        assert!(!wizard.is_output_open());
        assert!(wizard.notice().is_none());
        assert_eq!(wizard.step(), WizardStep::Confirm);
        assert!(wizard.begin_execution().is_ok());
    }

    #[test]
    fn restart_carries_an_in_flight_run() {
        let mut wizard = at_action(true);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.set_team(Some("ops".into()));
        wizard.set_project(Some("infra".into()));
        wizard.submit().expect("submit");
        wizard.begin_execution().expect("begin");

        wizard.restart(true);
        assert!(wizard.script().is_none());
        assert!(wizard.team().is_none());
        assert!(wizard.requires_context());
        assert!(wizard.is_pending());

        wizard.finish_execution(Err(ExecutionError::Task("panicked".into())));
        assert!(!wizard.is_pending());
        assert!(wizard.notice().is_none());
    }

    #[test]
    fn switching_actions_regenerates_schema() {
        let mut wizard = at_action(false);
        wizard.set_field("hostname", json!("web-1")).expect("set hostname");
        wizard.select_action("analyze").expect("select analyze");
        assert!(wizard.form().is_empty());
        assert!(wizard.schema().and_then(|schema| schema.rule("path")).is_some());
        assert!(wizard.schema().and_then(|schema| schema.rule("hostname")).is_none());
        assert_eq!(
            wizard.select_action("restart"),
            Err(WizardError::UnknownAction("restart".to_string()))
        );
    }

    #[test]
    fn transitions_check_the_current_step() {
        let mut wizard = WizardState::new(false);
        assert_eq!(
            wizard.back(),
            Err(WizardError::WrongStep {
                expected: WizardStep::Confirm,
                actual: WizardStep::Info
            })
        );
        assert!(matches!(wizard.submit(), Err(WizardError::WrongStep { .. })));
    }
}
