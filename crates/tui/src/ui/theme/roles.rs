use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};
use scriptdeck_engine::NoticeLevel;
use scriptdeck_types::LogTag;

/// Colors of the catalog pane, the wizard forms and the output overlay.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    /// Fill of panels and input fields.
    pub panel: Color,
    pub border: Color,
    /// Border of the focused pane and the secondary button label.
    pub focus: Color,

    pub text: Color,
    /// Field labels, headings and inactive tabs.
    pub label: Color,
    pub muted: Color,
    /// Script names, key hints and the primary button.
    pub accent: Color,
    /// Selected tree row and disabled buttons.
    pub highlight: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    /// Backdrop behind the output overlay.
    pub overlay: Color,
}

pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn label_style(&self) -> Style {
        Style::default().fg(self.roles().label)
    }
    fn muted_style(&self) -> Style {
        Style::default().fg(self.roles().muted)
    }
    fn accent_style(&self) -> Style {
        Style::default().fg(self.roles().accent).add_modifier(Modifier::BOLD)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.focus } else { roles.border })
    }

    fn highlight_style(&self) -> Style {
        Style::default().fg(self.roles().text).bg(self.roles().highlight)
    }

    fn overlay_style(&self) -> Style {
        Style::default().bg(self.roles().overlay)
    }

    /// Destructive actions and missing team/project warnings.
    fn warning_style(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    /// Inline field errors.
    fn error_style(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn notice_style(&self, level: NoticeLevel) -> Style {
        let roles = self.roles();
        Style::default().fg(match level {
            NoticeLevel::Success => roles.success,
            NoticeLevel::Error => roles.error,
        })
    }

    /// Color for one line of execution output.
    fn log_style(&self, tag: LogTag) -> Style {
        let roles = self.roles();
        let color = match tag {
            LogTag::Success => roles.success,
            LogTag::Error => roles.error,
            LogTag::Warning => roles.warning,
            LogTag::Info => roles.info,
            LogTag::Plain => roles.text,
        };
        Style::default().fg(color)
    }
}
