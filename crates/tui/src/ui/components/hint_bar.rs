//! Single-line strip with the latest notice or the contextual key hints.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use scriptdeck_engine::WizardStep;

use crate::{
    app::{App, Focus},
    ui::{components::component::Component, theme::Theme},
};

#[derive(Debug, Default)]
pub struct HintBarComponent;

fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.wizard.is_output_open() {
        return &[("Esc", "close"), ("↑/↓", "scroll")];
    }
    if app.tree.is_filtering() {
        return &[("type", "filter"), ("Enter", "keep"), ("Esc", "clear")];
    }
    match (app.focus, app.wizard.step()) {
        (Focus::Tree, _) => &[("↑/↓", "move"), ("Enter", "open"), ("/", "filter"), ("Tab", "wizard"), ("r", "reload"), ("q", "quit")],
        (Focus::Wizard, WizardStep::Info) => &[("Enter", "next"), ("Tab", "catalog"), ("q", "quit")],
        (Focus::Wizard, WizardStep::Action) => &[("↑/↓", "field"), ("←/→", "choose"), ("Space", "toggle"), ("Ctrl+S", "submit"), ("Esc", "catalog")],
        (Focus::Wizard, WizardStep::Confirm) => &[("Enter", "execute"), ("Esc", "back"), ("Tab", "catalog")],
    }
}

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let mut spans = Vec::new();
        if let Some(notice) = app.status.as_ref() {
            spans.push(Span::styled(notice.message.clone(), theme.notice_style(notice.level)));
            spans.push(Span::raw("  "));
        }
        for (key, action) in hints(app) {
            spans.push(Span::styled(*key, theme.accent_style()));
            spans.push(Span::styled(format!(" {action}  "), theme.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.muted_style()), rect);
    }
}
