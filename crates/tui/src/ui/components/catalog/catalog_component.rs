//! Left pane: the collapsible category tree with its `/` filter.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};
use scriptdeck_types::Effect;
use scriptdeck_util::truncate_to_width;

use super::state::{TreeRow, TreeRowKind};
use crate::{
    app::{App, Focus},
    ui::{
        components::component::Component,
        theme::{Theme, theme_helpers as th},
    },
};

#[derive(Debug, Default)]
pub struct CatalogComponent {
    list_state: ListState,
    /// Area of the list as last rendered, for mouse hit testing.
    list_area: Rect,
}

impl CatalogComponent {
    fn handle_filter_key(&mut self, app: &mut App, key: KeyEvent) {
        let catalog = &app.registry.catalog;
        match key.code {
            KeyCode::Esc => app.tree.clear_filter(catalog),
            KeyCode::Enter | KeyCode::Down => app.tree.end_filter(),
            KeyCode::Backspace => app.tree.filter_backspace(catalog),
            KeyCode::Char(character) => app.tree.filter_insert(catalog, character),
            _ => {}
        }
    }

    fn row_line<'a>(&self, app: &App, row: &'a TreeRow, width: u16) -> Line<'a> {
        let theme = &*app.theme;
        let indent = "  ".repeat(row.depth);
        let (marker, style) = match row.kind {
            TreeRowKind::Category { expanded, has_children } => {
                let marker = match (has_children, expanded) {
                    (false, _) => "  ",
                    (true, true) => "▾ ",
                    (true, false) => "▸ ",
                };
                let mut style = theme.label_style().add_modifier(Modifier::BOLD);
                if app.wizard.selected_category() == Some(row.key.as_str()) && app.wizard.script().is_none() {
                    style = theme.accent_style();
                }
                (marker, style)
            }
            TreeRowKind::Script => {
                let selected = app
                    .wizard
                    .script()
                    .is_some_and(|script| super::state::script_key(script) == row.key);
                let style = if selected { theme.accent_style() } else { theme.text_style() };
                ("• ", style)
            }
        };
        let budget = (width as usize).saturating_sub(indent.len() + 2);
        Line::from(vec![
            Span::raw(indent),
            Span::styled(marker, theme.muted_style()),
            Span::styled(truncate_to_width(&row.label, budget), style),
        ])
    }
}

impl Component for CatalogComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.tree.is_filtering() {
            self.handle_filter_key(app, key);
            return Vec::new();
        }
        let catalog = &app.registry.catalog;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.tree.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.tree.select_next(),
            KeyCode::Left | KeyCode::Char('h') => app.tree.set_selected_expanded(catalog, false),
            KeyCode::Right | KeyCode::Char('l') => app.tree.set_selected_expanded(catalog, true),
            KeyCode::Char('/') => app.tree.start_filter(),
            KeyCode::Esc if !app.tree.filter_text().is_empty() => app.tree.clear_filter(catalog),
            KeyCode::Enter | KeyCode::Char(' ') => app.activate_tree_row(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(crossterm::event::MouseButton::Left)
            || !self.list_area.contains(Position::new(mouse.column, mouse.row))
        {
            return Vec::new();
        }
        let clicked = self.list_state.offset() + usize::from(mouse.row - self.list_area.y);
        if clicked < app.tree.rows().len() {
            while app.tree.selected_index() < clicked {
                app.tree.select_next();
            }
            while app.tree.selected_index() > clicked {
                app.tree.select_prev();
            }
            app.focus = Focus::Tree;
            app.activate_tree_row();
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let focused = app.focus == Focus::Tree;
        let block = th::block(&*app.theme, Some("Script Catalog"), focused);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let show_filter = app.tree.is_filtering() || !app.tree.filter_text().is_empty();
        let [filter_area, list_area] =
            Layout::vertical([Constraint::Length(u16::from(show_filter)), Constraint::Min(1)]).areas(inner);
        self.list_area = list_area;

        if show_filter {
            let theme = &*app.theme;
            let line = Line::from(vec![
                Span::styled("/", theme.accent_style()),
                Span::styled(app.tree.filter_text().to_string(), th::input_style(theme, true, app.tree.is_filtering())),
            ]);
            frame.render_widget(Paragraph::new(line), filter_area);
            if app.tree.is_filtering() {
                let column = filter_area.x + 1 + app.tree.filter_text().chars().count() as u16;
                frame.set_cursor_position((column.min(filter_area.right().saturating_sub(1)), filter_area.y));
            }
        }

        if app.tree.rows().is_empty() {
            let message = if show_filter { "No matching scripts" } else { "No scripts loaded" };
            frame.render_widget(Paragraph::new(message).style(app.theme.muted_style()), list_area);
            return;
        }

        let items: Vec<ListItem> = app
            .tree
            .rows()
            .iter()
            .map(|row| ListItem::new(self.row_line(app, row, list_area.width)))
            .collect();
        let list = List::new(items).highlight_style(app.theme.highlight_style());
        self.list_state.select(Some(app.tree.selected_index()));
        frame.render_stateful_widget(list, list_area, &mut self.list_state);
    }
}
