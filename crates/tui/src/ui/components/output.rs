//! Modal overlay showing the tagged output of the last execution.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use scriptdeck_types::{Effect, classify_output};

use crate::{
    app::App,
    ui::{
        components::component::Component,
        theme::{Theme, theme_helpers as th},
    },
};

const PAGE: u16 = 10;

#[derive(Debug, Default)]
pub struct OutputComponent;

fn line_count(app: &App) -> u16 {
    app.wizard
        .output()
        .and_then(|response| response.output.as_deref())
        .map_or(0, |output| output.lines().count().min(u16::MAX as usize) as u16)
}

impl Component for OutputComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let max_scroll = line_count(app).saturating_sub(1);
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_output(),
            KeyCode::Up | KeyCode::Char('k') => app.output_scroll = app.output_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => app.output_scroll = (app.output_scroll + 1).min(max_scroll),
            KeyCode::PageUp => app.output_scroll = app.output_scroll.saturating_sub(PAGE),
            KeyCode::PageDown => app.output_scroll = app.output_scroll.saturating_add(PAGE).min(max_scroll),
            KeyCode::Home => app.output_scroll = 0,
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let max_scroll = line_count(app).saturating_sub(1);
        match mouse.kind {
            MouseEventKind::ScrollUp => app.output_scroll = app.output_scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => app.output_scroll = (app.output_scroll + 1).min(max_scroll),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(response) = app.wizard.output() else {
            return;
        };
        let theme = &*app.theme;
        frame.render_widget(Paragraph::new("").style(theme.overlay_style()), rect);

        let area = th::centered_rect(rect, rect.width * 4 / 5, rect.height * 4 / 5);
        frame.render_widget(Clear, area);
        let title = if response.success { "Script Output" } else { "Script Output (failed)" };
        let block = th::block(theme, Some(title), true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body_area, footer_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        let text = response.output.as_deref().unwrap_or_default();
        let mut lines: Vec<Line> = classify_output(text)
            .into_iter()
            .map(|(tag, line)| Line::styled(line.to_string(), theme.log_style(tag)))
            .collect();
        if let Some(error) = response.error.as_deref()
            && !text.contains(error)
        {
            lines.push(Line::styled(error.to_string(), theme.error_style()));
        }
        frame.render_widget(Paragraph::new(lines).scroll((app.output_scroll, 0)), body_area);

        let footer = Line::from(vec![
            Span::styled("Esc", theme.accent_style()),
            Span::styled(" close  ", theme.muted_style()),
            Span::styled("↑/↓", theme.accent_style()),
            Span::styled(" scroll", theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(footer), footer_area);
    }
}
