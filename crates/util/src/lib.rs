//! Small helpers shared by the registry, engine, CLI, and TUI.

pub mod display;
pub mod path_processing;
pub mod text_processing;

pub use display::{format_param_value, truncate_to_width};
pub use path_processing::expand_tilde;
pub use text_processing::{fuzzy_score, is_sensitive_key, redact_payload};
