//! Component abstraction shared by every pane of the TUI.
//!
//! Components own only local UI behavior. They read and mutate [`App`],
//! and report side effects back as [`Effect`]s instead of performing I/O.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};
use scriptdeck_types::{Effect, Msg};

use crate::app::App;

pub(crate) trait Component {
    /// Respond to an application-level message.
    fn handle_message(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle a key press while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
