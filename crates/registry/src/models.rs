use std::collections::BTreeSet;

use scriptdeck_types::{Catalog, CatalogItem, Category, Script};
use tracing::{error, info};

use crate::{
    RegistryConfig,
    assemble::assemble,
    loader::{CatalogSource, fetch_catalog_items},
};

/// The loaded script catalog together with the config it was loaded from.
///
/// The assembled [`Catalog`] is rebuilt from scratch on every (re)load and
/// never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    /// Config used to locate the catalog
    pub config: RegistryConfig,
    /// Raw items as decoded from the catalog source
    pub items: Vec<CatalogItem>,
    /// Assembled category tree
    pub catalog: Catalog,
    /// Flat list of every script, in tree order
    scripts: Vec<Script>,
    /// User-facing message describing the last load failure
    pub load_error: Option<String>,
}

impl ScriptRegistry {
    /// Builds a registry from already decoded items.
    pub fn from_items(config: RegistryConfig, items: Vec<CatalogItem>) -> Self {
        let catalog = assemble(&items);
        let scripts = catalog.scripts().into_iter().map(|(_, script)| script.clone()).collect();
        Self {
            config,
            items,
            catalog,
            scripts,
            load_error: None,
        }
    }

    /// Loads the catalog named by `config.catalog_source`.
    ///
    /// A failed fetch never errors: the registry comes back empty with
    /// [`ScriptRegistry::load_error`] set, and the detail is logged.
    pub async fn load(config: RegistryConfig) -> Self {
        let source = CatalogSource::parse(&config.catalog_source);
        match fetch_catalog_items(&source).await {
            Ok(items) => {
                let registry = Self::from_items(config, items);
                info!(source = %source, scripts = registry.scripts.len(), "loaded script catalog");
                registry
            }
            Err(err) => {
                error!(source = %source, error = %err, "failed to load catalog");
                Self {
                    load_error: Some(format!("Failed to load script catalog: {err}")),
                    ..Self::from_items(config, Vec::new())
                }
            }
        }
    }

    /// Re-fetches the catalog and rebuilds everything from scratch.
    pub async fn reload(&mut self) {
        *self = Self::load(self.config.clone()).await;
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Finds a script by id, or by `path/id` when ids are ambiguous.
    pub fn find_script(&self, id: &str) -> Option<&Script> {
        self.scripts
            .iter()
            .find(|script| script.id == id)
            .or_else(|| self.scripts.iter().find(|script| format!("{}/{}", script.path, script.id) == id))
    }

    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.catalog.category(id)
    }

    /// Sorted distinct team names across all owners.
    pub fn teams(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.meta.owner.as_ref())
            .flat_map(|owner| owner.team.iter())
            .map(|team| team.trim())
            .filter(|team| !team.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct project names across all owners.
    pub fn projects(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.meta.owner.as_ref())
            .map(|owner| owner.project.trim())
            .filter(|project| !project.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
