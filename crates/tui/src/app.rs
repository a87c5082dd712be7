//! Application state for the ScriptDeck TUI.
//!
//! `App` ties the loaded registry to the wizard and the per-pane UI state.
//! Components translate keys into calls on `App`; anything that needs I/O
//! comes back out as an [`Effect`] for the runtime to run.

use scriptdeck_engine::{ExecutionError, Notice, NoticeLevel, WizardError, WizardState, WizardStep};
use scriptdeck_registry::ScriptRegistry;
use scriptdeck_types::{Effect, Msg};
use tracing::debug;

use crate::ui::{
    components::{
        catalog::{CatalogTreeState, TreeRowKind},
        wizard::ActionFormState,
    },
    theme::Theme,
};

/// Spinner frames shown while an execution is pending.
pub static FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tree,
    Wizard,
}

pub struct App {
    pub registry: ScriptRegistry,
    pub wizard: WizardState,
    pub tree: CatalogTreeState,
    pub form: ActionFormState,
    pub focus: Focus,
    pub theme: Box<dyn Theme>,
    /// Last notice shown in the hint bar.
    pub status: Option<Notice>,
    pub executing: bool,
    pub throbber_idx: usize,
    pub output_scroll: u16,
    teams: Vec<String>,
    projects: Vec<String>,
}

impl App {
    pub fn new(registry: ScriptRegistry, theme: Box<dyn Theme>) -> Self {
        let mut app = Self {
            wizard: WizardState::new(registry.config.require_context),
            tree: CatalogTreeState::new(&registry.catalog),
            form: ActionFormState::default(),
            focus: Focus::Tree,
            theme,
            status: None,
            executing: false,
            throbber_idx: 0,
            output_scroll: 0,
            teams: registry.teams(),
            projects: registry.projects(),
            registry,
        };
        app.status = app.registry.load_error.clone().map(|message| Notice {
            level: NoticeLevel::Error,
            message,
        });
        app
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn spinner(&self) -> &'static str {
        FRAMES[self.throbber_idx % FRAMES.len()]
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tree => Focus::Wizard,
            Focus::Wizard => Focus::Tree,
        };
    }

    /// Enter on the selected tree row.
    ///
    /// A category toggles open and becomes the selected category; a script
    /// is loaded into the wizard and focus moves to the wizard pane.
    pub fn activate_tree_row(&mut self) {
        let Some(row) = self.tree.selected().cloned() else {
            return;
        };
        match row.kind {
            TreeRowKind::Category { .. } => {
                self.tree.toggle_selected(&self.registry.catalog);
                self.wizard.select_category(row.key);
                self.form.reset();
            }
            TreeRowKind::Script => {
                let Some(script) = self.registry.find_script(&row.key).cloned() else {
                    debug!(key = %row.key, "tree row points at a missing script");
                    return;
                };
                self.wizard.select_script(script);
                self.form.reset();
                self.focus = Focus::Wizard;
            }
        }
    }

    /// Applies a wizard result, surfacing failures in the hint bar.
    pub fn report(&mut self, result: Result<(), WizardError>) {
        if let Err(err) = result {
            let message = match &err {
                // Field errors are already shown inline.
                WizardError::Invalid(errors) => format!("Please fix {} field error(s)", errors.len()),
                other => other.to_string(),
            };
            self.status = Some(Notice {
                level: NoticeLevel::Error,
                message,
            });
        }
    }

    /// Info → Action, preselecting the only action of single-action scripts.
    pub fn advance_to_action(&mut self) {
        let result = self.wizard.next();
        if result.is_ok()
            && let Some([only]) = self.wizard.script().map(|script| script.actions.as_slice())
        {
            let id = only.id.clone();
            let selected = self.form.select_action(&mut self.wizard, &id);
            self.report(selected);
            return;
        }
        self.report(result);
    }

    /// Starts the confirmed request unless one is already running.
    pub fn request_execution(&mut self) -> Vec<Effect> {
        if self.executing {
            self.report(Err(WizardError::ExecutionPending));
            return Vec::new();
        }
        match self.wizard.begin_execution() {
            Ok(request) => {
                self.executing = true;
                self.throbber_idx = 0;
                vec![Effect::ExecuteRequested(request)]
            }
            Err(err) => {
                self.report(Err(err));
                Vec::new()
            }
        }
    }

    /// Closes the output overlay and returns to the information step.
    pub fn close_output(&mut self) {
        self.wizard.close_output();
        self.form.reset();
        self.output_scroll = 0;
    }

    /// Asks for a catalog reload; refused while an execution is running.
    pub fn request_reload(&mut self) -> Vec<Effect> {
        if self.executing {
            self.status = Some(Notice {
                level: NoticeLevel::Error,
                message: "Wait for the running script before reloading".to_string(),
            });
            return Vec::new();
        }
        vec![Effect::ReloadCatalog]
    }

    /// Swaps in a freshly loaded registry and starts over.
    pub fn replace_registry(&mut self, registry: ScriptRegistry) {
        self.registry = registry;
        self.teams = self.registry.teams();
        self.projects = self.registry.projects();
        self.wizard.restart(self.registry.config.require_context);
        self.tree.reset(&self.registry.catalog);
        self.form.reset();
        self.focus = Focus::Tree;
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % FRAMES.len();
                }
            }
            Msg::Resize(..) => {}
            Msg::ExecCompleted(response) => {
                self.executing = false;
                self.output_scroll = 0;
                self.wizard.finish_execution(Ok(response.clone()));
                self.status = self.wizard.take_notice();
            }
            Msg::ExecAborted(reason) => {
                self.executing = false;
                self.wizard.finish_execution(Err(ExecutionError::Task(reason.clone())));
                self.status = self.wizard.take_notice();
            }
            Msg::CatalogReloaded => {
                self.status = Some(match self.registry.load_error.clone() {
                    Some(message) => Notice {
                        level: NoticeLevel::Error,
                        message,
                    },
                    None => Notice {
                        level: NoticeLevel::Success,
                        message: format!("Loaded {} scripts", self.registry.scripts().len()),
                    },
                });
            }
        }
        Vec::new()
    }

    /// Whether the confirm step's execute control is usable.
    pub fn can_execute(&self) -> bool {
        self.wizard.step() == WizardStep::Confirm && !self.wizard.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;
    use scriptdeck_registry::RegistryConfig;
    use scriptdeck_types::{CatalogItem, ExecutionResponse, LogTag};

    fn registry() -> ScriptRegistry {
        let items: Vec<CatalogItem> = serde_json::from_str(
            r#"[{
                "meta": { "name": "disk-cleanup", "path": "system/maintenance",
                          "Owner": { "team": ["ops"], "project": "infra" } },
                "options": [
                    { "action": { "type": "select", "required": "yes", "choices": ["cleanup"] } },
                    { "hostname": { "type": "str", "required": "yes", "define_action_arg": ["cleanup"] } }
                ],
                "commands": [{ "name": "cleanup", "command": "/api/system/disk/cleanup" }]
            }]"#,
        )
        .expect("fixture items");
        let config = RegistryConfig {
            require_context: false,
            ..RegistryConfig::default()
        };
        ScriptRegistry::from_items(config, items)
    }

    fn app() -> App {
        App::new(registry(), Box::new(DraculaTheme::new()))
    }

    fn open_script(app: &mut App) {
        app.tree.select_next();
        app.activate_tree_row();
        app.tree.select_next();
        app.activate_tree_row();
    }

    #[test]
    fn selecting_a_script_row_loads_the_wizard() {
        let mut app = app();
        open_script(&mut app);
        assert_eq!(app.focus, Focus::Wizard);
        assert_eq!(app.wizard.script().map(|script| script.id.as_str()), Some("disk-cleanup"));
        assert_eq!(app.wizard.selected_category(), Some("system/maintenance"));
        assert_eq!(app.teams(), ["ops"]);
    }

    #[test]
    fn single_action_scripts_preselect_their_action() {
        let mut app = app();
        open_script(&mut app);
        app.advance_to_action();
        assert_eq!(app.wizard.step(), WizardStep::Action);
        assert_eq!(app.wizard.action().map(|action| action.id.as_str()), Some("cleanup"));
    }

    #[test]
    fn execution_round_trip_opens_and_closes_output() {
        let mut app = app();
        open_script(&mut app);
        app.advance_to_action();
        let edited = app.wizard.set_field("hostname", serde_json::json!("web-1"));
        app.report(edited);
        let submitted = app.wizard.submit();
        app.report(submitted);

        let effects = app.request_execution();
        assert!(matches!(effects.as_slice(), [Effect::ExecuteRequested(request)] if request.payload["hostname"] == "web-1"));
        assert!(!app.can_execute());
        assert!(app.request_execution().is_empty());
        assert!(app.status.is_some());

        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 1);
        let response = ExecutionResponse::succeeded(serde_json::json!({}), LogTag::Success.line("done"));
        app.update(&Msg::ExecCompleted(response));
        assert!(app.wizard.is_output_open());
        assert_eq!(app.status.as_ref().map(|notice| notice.level), Some(NoticeLevel::Success));

        app.close_output();
        assert_eq!(app.wizard.step(), WizardStep::Info);
        assert!(app.wizard.action().is_none());
        assert!(app.wizard.script().is_some());
    }

    #[test]
    fn aborted_execution_stays_on_confirm() {
        let mut app = app();
        open_script(&mut app);
        app.advance_to_action();
        let edited = app.wizard.set_field("hostname", serde_json::json!("web-1"));
        app.report(edited);
        let submitted = app.wizard.submit();
        app.report(submitted);
        app.request_execution();

        app.update(&Msg::ExecAborted("panicked".into()));
        assert!(!app.executing);
        assert_eq!(app.wizard.step(), WizardStep::Confirm);
        assert!(app.can_execute());
        assert_eq!(app.status.as_ref().map(|notice| notice.level), Some(NoticeLevel::Error));
    }

    fn confirm_cleanup(app: &mut App) {
        app.advance_to_action();
        let edited = app.wizard.set_field("hostname", serde_json::json!("web-1"));
        app.report(edited);
        let submitted = app.wizard.submit();
        app.report(submitted);
    }

    #[test]
    fn reload_is_refused_while_a_script_runs() {
        let mut app = app();
        open_script(&mut app);
        confirm_cleanup(&mut app);
        assert_eq!(app.request_execution().len(), 1);

        assert!(app.request_reload().is_empty());
        assert_eq!(app.status.as_ref().map(|notice| notice.level), Some(NoticeLevel::Error));

        app.update(&Msg::ExecCompleted(ExecutionResponse::succeeded(serde_json::json!({}), "[SUCCESS] done".into())));
        assert_eq!(app.request_reload(), vec![Effect::ReloadCatalog]);
    }

    #[test]
    fn registry_swap_mid_run_blocks_a_second_execution() {
        let mut app = app();
        open_script(&mut app);
        confirm_cleanup(&mut app);
        assert_eq!(app.request_execution().len(), 1);

        app.replace_registry(registry());
        assert!(app.wizard.is_pending());
        open_script(&mut app);
        confirm_cleanup(&mut app);
        assert_eq!(app.wizard.step(), WizardStep::Confirm);
        assert!(app.request_execution().is_empty());

        let response = ExecutionResponse::succeeded(serde_json::json!({}), LogTag::Success.line("done"));
        app.update(&Msg::ExecCompleted(response));
        assert!(!app.executing);
        assert!(!app.wizard.is_output_open(), "the earlier run's output does not open over the new session");
        assert_eq!(app.request_execution().len(), 1);
    }

    #[test]
    fn switching_scripts_mid_run_drops_the_stale_output() {
        let mut app = app();
        open_script(&mut app);
        confirm_cleanup(&mut app);
        app.request_execution();

        app.activate_tree_row();
        app.advance_to_action();
        assert!(app.request_execution().is_empty());

        app.update(&Msg::ExecAborted("panicked".into()));
        assert!(!app.executing);
        assert!(!app.wizard.is_pending());
        assert!(app.status.is_none());
    }

    #[test]
    fn invalid_submit_reports_error_count() {
        let mut app = app();
        open_script(&mut app);
        app.advance_to_action();
        let submitted = app.wizard.submit();
        app.report(submitted);
        assert_eq!(app.status.as_ref().map(|notice| notice.message.as_str()), Some("Please fix 1 field error(s)"));
        assert_eq!(app.wizard.errors().get("hostname"), Some("This field is required"));
    }
}
