//! Shared type definitions for ScriptDeck.
//!
//! - [`catalog`]: the loosely typed external catalog format.
//! - [`model`]: the normalized category/script/action/parameter graph.
//! - [`execution`]: the execution collaborator contract and output tags.
//!
//! The UI message and effect enums live here too so the engine and the TUI
//! can exchange them without depending on each other.

pub mod catalog;
pub mod execution;
pub mod model;

pub use catalog::{
    ActionSelector, CatalogFormatError, CatalogItem, CatalogMeta, CatalogOwner, CommandActionType, CommandRecord, FieldDescriptor,
    OptionDescriptor,
};
pub use execution::{ExecutionRequest, ExecutionResponse, LogTag, ROUTING_KEYS, classify_output};
pub use model::{Catalog, Category, HttpMethod, Parameter, ParameterKind, ParameterOption, ParameterValidation, Script, ScriptAction};

/// Messages that can be sent to update the application state.
///
/// This enum defines the user actions and system events that can trigger
/// state changes in the terminal UI.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (spinner while an execution is pending)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with the collaborator's response
    ExecCompleted(ExecutionResponse),
    /// Background execution task failed before producing a response
    ExecAborted(String),
    /// Catalog finished (re)loading
    CatalogReloaded,
}

/// Side effects that can be triggered by state changes.
///
/// Components report effects rather than performing I/O themselves; the
/// runtime executes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the request against the execution collaborator
    ExecuteRequested(ExecutionRequest),
    /// Fetch and reassemble the catalog from its source
    ReloadCatalog,
    /// Leave the application
    Quit,
}
