//! Catalog registry for ScriptDeck.
//!
//! Turns the loosely typed external catalog document into the normalized
//! category → script → action → parameter tree the wizard renders:
//!
//! - [`field_type`] maps raw type tokens to parameter kinds.
//! - [`parameters`] picks the fields that apply to one action choice.
//! - [`actions`] resolves each choice against the command records.
//! - [`tree`] is the path-keyed category arena.
//! - [`assemble`] drives the above across the whole item list.
//!
//! Loading ([`loader`]), configuration ([`config`]), and search live here too.

pub mod actions;
pub mod assemble;
pub mod config;
pub mod field_type;
pub mod loader;
pub mod models;
pub mod parameters;
pub mod search;
pub mod tree;

pub use actions::{DEFAULT_ENDPOINT, build_action};
pub use assemble::{assemble, build_script};
pub use config::{ExecutorConfig, RegistryConfig, default_config_path};
pub use field_type::map_field_type;
pub use loader::{CatalogLoadError, CatalogSource, fetch_catalog_items};
pub use models::ScriptRegistry;
pub use parameters::extract_parameters;
pub use search::{SearchResult, search_scripts};
pub use tree::CategoryTree;
