mod catalog_component;
mod state;

pub use catalog_component::CatalogComponent;
pub use state::{CatalogTreeState, TreeRow, TreeRowKind, script_key};
