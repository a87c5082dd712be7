//! Right pane: the three-step script wizard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use scriptdeck_engine::{WizardState, WizardStep};
use scriptdeck_types::{Effect, Parameter, ParameterKind};
use scriptdeck_util::format_param_value;
use serde_json::Value;

use super::state::FormRow;
use crate::{
    app::{App, Focus},
    ui::{
        components::component::Component,
        theme::{Theme, theme_helpers as th},
    },
};

#[derive(Debug, Default)]
pub struct WizardComponent;

impl WizardComponent {
    fn handle_info_key(&mut self, app: &mut App, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Right | KeyCode::Char('n')) {
            app.advance_to_action();
        }
    }

    fn handle_action_key(&mut self, app: &mut App, key: KeyEvent) {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let submitted = app.wizard.submit();
            app.report(submitted);
            return;
        }

        let accepts_text = app.form.accepts_text(&app.wizard);
        let result = match key.code {
            KeyCode::Up => {
                app.form.focus_prev();
                Ok(())
            }
            KeyCode::Down => {
                app.form.focus_next(&app.wizard);
                Ok(())
            }
            KeyCode::Char(character) if accepts_text => app.form.insert_char(&mut app.wizard, character),
            KeyCode::Backspace if accepts_text => app.form.backspace(&mut app.wizard),
            KeyCode::Char(' ') => app.form.toggle(&mut app.wizard),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                let (teams, projects) = (app.teams().to_vec(), app.projects().to_vec());
                app.form.cycle_option(&mut app.wizard, &teams, &projects, forward)
            }
            KeyCode::Enter => app.form.activate(&mut app.wizard).map(|_| ()),
            KeyCode::Esc => {
                app.focus = Focus::Tree;
                Ok(())
            }
            _ => Ok(()),
        };
        app.report(result);
    }

    fn handle_confirm_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('x') if app.can_execute() => app.request_execution(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') if !app.wizard.is_pending() => {
                let result = app.wizard.back();
                app.report(result);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render_placeholder(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let mut lines = Vec::new();
        match app.wizard.selected_category().and_then(|id| app.registry.find_category(id)) {
            Some(category) => {
                lines.push(Line::styled(category.id.clone(), theme.accent_style()));
                lines.push(Line::from(format!(
                    "{} script(s), {} subcategory(ies)",
                    category.scripts.len(),
                    category.children.len()
                )));
                lines.push(Line::default());
                lines.push(Line::styled("Select a script to continue.", theme.muted_style()));
            }
            None => lines.push(Line::styled("Select a script from the catalog.", theme.muted_style())),
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_info(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let Some(script) = app.wizard.script() else {
            return self.render_placeholder(frame, area, app);
        };
        let heading = |text: &'static str| Line::styled(text, theme.label_style().add_modifier(Modifier::BOLD));
        let mut lines = vec![
            Line::styled(script.name.clone(), theme.accent_style()),
            Line::default(),
            heading("Description"),
            Line::from(script.description.clone()),
            Line::default(),
            heading("Category"),
            Line::from(script.category.clone()),
            Line::default(),
            heading("Available Actions"),
        ];
        lines.extend(script.actions.iter().map(|action| {
            let mut spans = vec![Span::raw("  • "), Span::raw(action.name.clone())];
            if action.is_destructive() {
                spans.push(Span::styled("  (destructive)", theme.warning_style()));
            }
            Line::from(spans)
        }));
        if let Some(owner) = script.meta.owner.as_ref() {
            lines.push(Line::default());
            lines.push(heading("Owner"));
            lines.push(Line::from(format!("{} / {}", owner.team.join(", "), owner.project)));
        }
        if !script.meta.platforms.is_empty() {
            lines.push(Line::default());
            lines.push(heading("Platforms"));
            lines.push(Line::from(script.meta.platforms.join(", ")));
        }
        lines.push(Line::default());
        lines.push(Line::styled("Press Enter to choose an action.", theme.muted_style()));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_action(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let wizard = &app.wizard;
        let focused_row = app.form.focused_row(wizard);
        let mut lines: Vec<Line> = Vec::new();
        let mut focused_line = 0;

        for row in super::state::ActionFormState::rows(wizard) {
            let is_focused = row == focused_row && app.focus == Focus::Wizard;
            if is_focused {
                focused_line = lines.len();
            }
            let marker = Span::styled(if is_focused { "› " } else { "  " }, theme.accent_style());
            match &row {
                FormRow::Action => {
                    let name = wizard.action().map_or("select an action", |action| action.name.as_str());
                    lines.push(Line::from(vec![
                        marker,
                        Span::styled("Action: ", theme.label_style()),
                        Span::styled(format!("‹ {name} ›"), th::input_style(theme, true, is_focused)),
                    ]));
                    if let Some(action) = wizard.action() {
                        lines.push(Line::styled(format!("  {}", action.description), theme.muted_style()));
                    }
                    lines.push(Line::default());
                }
                FormRow::Field(id) => {
                    let Some(parameter) = wizard.action().and_then(|action| action.parameter(id)) else {
                        continue;
                    };
                    let error = wizard.errors().get(id);
                    let mut label = parameter.label.clone();
                    if parameter.required && parameter.kind != ParameterKind::Boolean {
                        label.push_str(" *");
                    }
                    let mut spans = vec![marker, Span::styled(format!("{label}: "), theme.label_style())];
                    spans.extend(field_editor(app, parameter, is_focused, error.is_none()));
                    lines.push(Line::from(spans));
                    if let Some(error) = error {
                        lines.push(Line::styled(format!("    {error}"), theme.error_style()));
                    }
                }
                FormRow::Team | FormRow::Project => {
                    let (label, value) = if row == FormRow::Team {
                        ("Team", wizard.team())
                    } else {
                        ("Project", wizard.project())
                    };
                    lines.push(Line::from(vec![
                        marker,
                        Span::styled(format!("{label} *: "), theme.label_style()),
                        Span::styled(
                            format!("‹ {} ›", value.unwrap_or("not selected")),
                            th::input_style(theme, value.is_some(), is_focused),
                        ),
                    ]));
                }
                FormRow::Submit => {
                    lines.push(Line::default());
                    lines.push(Line::from(vec![
                        marker,
                        Span::styled(" Submit ", th::button_primary_style(theme, wizard.can_submit())),
                    ]));
                }
            }
        }

        if wizard.requires_context() && (wizard.team().is_none() || wizard.project().is_none()) {
            lines.push(Line::styled("  Please select a team and project", theme.warning_style()));
        }

        let visible = area.height.saturating_sub(1) as usize;
        let offset = focused_line.saturating_sub(visible.saturating_sub(2)) as u16;
        frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let wizard = &app.wizard;
        let Some(action) = wizard.action() else {
            return;
        };
        let [summary_area, buttons_area] = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let mut lines = vec![
            Line::styled(format!("Action: {}", action.name), theme.accent_style()),
            Line::styled(format!("Endpoint: {} {}", action.method, action.endpoint), theme.muted_style()),
        ];
        if action.is_destructive() {
            lines.push(Line::styled("This action is destructive.", theme.warning_style()));
        }
        if let (Some(team), Some(project)) = (wizard.team(), wizard.project()) {
            lines.push(Line::from(format!("Team: {team}   Project: {project}")));
        }
        lines.push(Line::default());
        lines.push(Line::styled("Parameters:", theme.label_style().add_modifier(Modifier::BOLD)));
        let rows = wizard.confirmation_rows();
        if rows.is_empty() {
            lines.push(Line::styled("  (none)", theme.muted_style()));
        }
        lines.extend(rows.into_iter().map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("  {label}: "), theme.label_style()),
                Span::styled(value, theme.text_style()),
            ])
        }));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), summary_area);

        let [back_area, execute_area, _] =
            Layout::horizontal([Constraint::Length(12), Constraint::Length(18), Constraint::Min(0)])
                .spacing(2)
                .areas(buttons_area);
        let pending = wizard.is_pending();
        th::render_button(frame, back_area, "Back", !pending, false, theme);
        let label = if pending { format!("{} Executing", app.spinner()) } else { "Execute".to_string() };
        th::render_button(frame, execute_area, &label, app.can_execute(), app.focus == Focus::Wizard, theme);
    }
}

/// Inline editor spans for one parameter, by kind.
fn field_editor<'a>(app: &'a App, parameter: &'a Parameter, focused: bool, valid: bool) -> Vec<Span<'a>> {
    let theme: &dyn Theme = &*app.theme;
    let wizard: &WizardState = &app.wizard;
    let style = th::input_style(theme, valid, focused);
    let value = wizard.field(&parameter.id);
    match parameter.kind {
        ParameterKind::Text | ParameterKind::Textarea | ParameterKind::Number => {
            let text = app
                .form
                .buffer(&parameter.id)
                .map(|buffer| buffer.input().to_string())
                .unwrap_or_else(|| format_param_value(value));
            let shown = if text.is_empty() { "…".to_string() } else { text };
            vec![Span::styled(format!("[{shown}]"), style)]
        }
        ParameterKind::Boolean => {
            let checked = value.and_then(Value::as_bool).unwrap_or(false);
            vec![Span::styled(if checked { "[x]" } else { "[ ]" }, style)]
        }
        ParameterKind::Select => {
            let selected = value.and_then(Value::as_str);
            let label = parameter
                .options
                .iter()
                .find(|option| Some(option.value.as_str()) == selected)
                .map_or("none", |option| option.label.as_str());
            vec![Span::styled(format!("‹ {label} ›"), style)]
        }
        ParameterKind::Multiselect => {
            let chosen: Vec<&str> = value
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let cursor = app.form.option_cursor(&parameter.id);
            parameter
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let mark = if chosen.contains(&option.value.as_str()) { "[x]" } else { "[ ]" };
                    let mut option_style: Style = style;
                    if focused && index == cursor {
                        option_style = option_style.add_modifier(Modifier::UNDERLINED);
                    }
                    Span::styled(format!("{mark} {}  ", option.label), option_style)
                })
                .collect()
        }
    }
}

impl Component for WizardComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.wizard.step() {
            WizardStep::Info => {
                self.handle_info_key(app, key);
                Vec::new()
            }
            WizardStep::Action => {
                self.handle_action_key(app, key);
                Vec::new()
            }
            WizardStep::Confirm => self.handle_confirm_key(app, key),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let focused = app.focus == Focus::Wizard;
        let title = app.wizard.script().map(|script| script.name.clone());
        let block = th::block(&*app.theme, title.as_deref().or(Some("Script")), focused);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [tabs_area, _, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)]).areas(inner);
        let titles = WizardStep::ALL.iter().map(|step| Span::raw(step.title())).collect();
        frame.render_widget(th::tabs(&*app.theme, titles, app.wizard.step().index()), tabs_area);

        match app.wizard.step() {
            _ if app.wizard.script().is_none() => self.render_placeholder(frame, body_area, app),
            WizardStep::Info => self.render_info(frame, body_area, app),
            WizardStep::Action => self.render_action(frame, body_area, app),
            WizardStep::Confirm => self.render_confirm(frame, body_area, app),
        }
    }
}
