//! Root view: lays out the panes and routes input to the focused one.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Style,
    widgets::Block,
};
use scriptdeck_types::{Effect, Msg};

use super::{
    components::{CatalogComponent, HintBarComponent, OutputComponent, WizardComponent, component::Component},
    theme::Theme,
};
use crate::app::{App, Focus};

#[derive(Debug, Default)]
pub struct MainView {
    catalog: CatalogComponent,
    wizard: WizardComponent,
    output: OutputComponent,
    hint_bar: HintBarComponent,
    /// Catalog pane area as last rendered.
    catalog_area: Rect,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether typed characters currently belong to a text field.
    fn capturing_text(app: &App) -> bool {
        match app.focus {
            Focus::Tree => app.tree.is_filtering(),
            Focus::Wizard => app.form.accepts_text(&app.wizard),
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        app.update(msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.wizard.is_output_open() {
            return self.output.handle_key_events(app, key);
        }
        // Any key acknowledges the last notice.
        app.status = None;

        if !Self::capturing_text(app) {
            match key.code {
                KeyCode::Char('q') => return vec![Effect::Quit],
                KeyCode::Char('r') if app.focus == Focus::Tree => return app.request_reload(),
                _ => {}
            }
        }
        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            app.toggle_focus();
            return Vec::new();
        }
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return app.request_reload();
        }

        match app.focus {
            Focus::Tree => self.catalog.handle_key_events(app, key),
            Focus::Wizard => self.wizard.handle_key_events(app, key),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if app.wizard.is_output_open() {
            return self.output.handle_mouse_events(app, mouse);
        }
        if self.catalog_area.contains(Position::new(mouse.column, mouse.row)) {
            return self.catalog.handle_mouse_events(app, mouse);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        frame.render_widget(Block::default().style(Style::default().bg(app.theme.roles().background)), rect);

        let [body, hints] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(rect);
        let [catalog_area, wizard_area] =
            Layout::horizontal([Constraint::Percentage(32), Constraint::Percentage(68)]).areas(body);
        self.catalog_area = catalog_area;

        self.catalog.render(frame, catalog_area, app);
        self.wizard.render(frame, wizard_area, app);
        self.hint_bar.render(frame, hints, app);

        if app.wizard.is_output_open() {
            self.output.render(frame, body, app);
        }
    }
}
