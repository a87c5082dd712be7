//! # ScriptDeck TUI
//!
//! Terminal front end for browsing the script catalog and running scripts
//! through the three-step wizard.
//!
//! ## Layout
//!
//! - Left: the collapsible category tree, filterable with `/`.
//! - Right: the wizard tabs (information, action & parameters, confirm).
//! - Bottom: notices and key hints.
//! - Overlay: the tagged output of the last execution.
//!
//! Components mutate [`app::App`] and return effects; the runtime in
//! `ui::runtime` performs them and feeds results back as messages.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use scriptdeck_engine::ScriptExecutor;
use scriptdeck_registry::ScriptRegistry;

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Fails when the terminal cannot be put into (or restored from) raw mode
/// or drawn to.
///
/// ```no_run
/// use std::sync::Arc;
/// use scriptdeck_engine::MockExecutor;
/// use scriptdeck_registry::{RegistryConfig, ScriptRegistry};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let registry = ScriptRegistry::load(RegistryConfig::load()).await;
///     scriptdeck_tui::run(registry, Arc::new(MockExecutor::default())).await
/// }
/// ```
pub async fn run(registry: ScriptRegistry, executor: Arc<dyn ScriptExecutor>) -> Result<()> {
    ui::runtime::run_app(registry, executor).await
}
