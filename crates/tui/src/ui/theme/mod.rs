//! Theme styling for the ScriptDeck TUI.
//!
//! Semantic roles decouple components from concrete colors; the Dracula
//! palette is the only shipped palette, with a high-contrast variant for
//! low-quality displays. Prefer the helpers in [`theme_helpers`] over
//! hard-coding colors.

use std::env;

use tracing::debug;

pub mod dracula;
pub mod roles;
pub mod theme_helpers;

pub use dracula::{DraculaTheme, DraculaThemeHighContrast};
pub use roles::Theme;

/// Environment variable selecting the palette variant.
pub const THEME_ENV: &str = "SCRIPTDECK_THEME";

/// Selects the theme named by `SCRIPTDECK_THEME`, defaulting to Dracula.
pub fn load_from_env() -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV).unwrap_or_default();
    resolve(requested.trim())
}

fn resolve(name: &str) -> Box<dyn Theme> {
    match name.to_ascii_lowercase().as_str() {
        "dracula-hc" | "dracula-high-contrast" | "high-contrast" => Box::new(DraculaThemeHighContrast::new()),
        "" | "dracula" => Box::new(DraculaTheme::new()),
        other => {
            debug!(theme = other, "unknown theme requested; using dracula");
            Box::new(DraculaTheme::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_dracula() {
        assert_eq!(resolve("solarized").roles().background, dracula::BG);
        assert_eq!(resolve("high-contrast").roles().border, dracula::PURPLE);
    }
}
