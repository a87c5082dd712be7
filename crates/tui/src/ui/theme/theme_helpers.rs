use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Tabs},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(title) = title {
        block = block.title(Span::styled(title, theme.label_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { panel, text, .. } = *theme.roles();
    Style::default().bg(panel).fg(text)
}

/// Build the wizard step tabs with active/inactive styles.
pub fn tabs<'a, T: Theme + ?Sized>(theme: &T, titles: Vec<Span<'a>>, index: usize) -> Tabs<'a> {
    Tabs::new(titles)
        .select(index)
        .highlight_style(
            theme
                .text_style()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        )
        .style(theme.label_style())
}

/// Style for input fields; the caller sets the border from focus.
pub fn input_style<T: Theme + ?Sized>(theme: &T, valid: bool, focused: bool) -> Style {
    let ThemeRoles { panel, text, error, .. } = *theme.roles();
    let mut style = Style::default().bg(panel).fg(text);
    if !valid {
        style = style.fg(error);
    }
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    let ThemeRoles {
        accent,
        text,
        highlight,
        muted,
        ..
    } = *theme.roles();
    if enabled {
        Style::default().bg(accent).fg(text).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(highlight).fg(muted)
    }
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.muted_style();
    }
    let ThemeRoles { focus, highlight, .. } = *theme.roles();
    let style = Style::default().fg(focus);
    if selected { style.bg(highlight) } else { style }
}

/// Renders a bordered button; disabled buttons are drawn muted.
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, is_enabled: bool, is_focused: bool, theme: &T) {
    let border_style = if is_enabled { theme.border_style(is_focused) } else { theme.muted_style() };
    let button_style = if is_focused && is_enabled {
        button_primary_style(theme, true)
    } else {
        button_secondary_style(theme, is_enabled, false)
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(Block::bordered().border_style(border_style).padding(Padding::uniform(0)))
            .style(button_style),
        area,
    );
}

/// Centers a `width` x `height` rectangle inside `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
