//! Catalog assembly: raw items → category tree of scripts and actions.

use scriptdeck_types::{Catalog, CatalogItem, Script};
use tracing::debug;

use crate::actions::build_action;
use crate::tree::{CategoryTree, normalize_path};

/// Builds the [`Script`] for one catalog item, with one action per declared
/// choice in declaration order.
pub fn build_script(item: &CatalogItem) -> Script {
    let actions = item
        .choices()
        .iter()
        .map(|choice| build_action(choice, &item.options, &item.commands))
        .collect();

    Script {
        id: item.meta.name.clone(),
        name: item.meta.name.clone(),
        description: item.meta.description.clone(),
        category: item.meta.category.clone(),
        path: normalize_path(&item.meta.path),
        meta: item.meta.clone(),
        actions,
    }
}

/// Assembles the catalog in a single left-to-right pass over `items`.
///
/// Items sharing a path are appended as siblings under one category. Only
/// root categories are returned; an empty input yields an empty catalog.
pub fn assemble(items: &[CatalogItem]) -> Catalog {
    let mut tree = CategoryTree::new();
    for item in items {
        let script = build_script(item);
        let path = script.path.clone();
        tree.attach_script(&path, script);
    }
    debug!(items = items.len(), categories = tree.len(), "assembled catalog");
    Catalog {
        categories: tree.into_roots(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::CatalogMeta;

    fn item(name: &str, path: &str) -> CatalogItem {
        CatalogItem {
            meta: CatalogMeta {
                name: name.into(),
                path: path.into(),
                ..Default::default()
            },
            options: Vec::new(),
            commands: Vec::new(),
        }
    }

    #[test]
    fn empty_input_is_empty_catalog() {
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn item_without_selector_has_no_actions() {
        let catalog = assemble(&[item("orphan", "misc")]);
        let (_, script) = catalog.scripts()[0];
        assert_eq!(script.id, "orphan");
        assert!(script.actions.is_empty());
    }

    #[test]
    fn blank_path_lands_in_uncategorized() {
        let catalog = assemble(&[item("loose", "")]);
        assert_eq!(catalog.categories[0].id, crate::tree::UNCATEGORIZED);
        assert_eq!(catalog.categories[0].scripts[0].path, crate::tree::UNCATEGORIZED);
    }

    #[test]
    fn category_ids_keep_the_item_path_verbatim() {
        let catalog = assemble(&[item("scan", "network/ wifi")]);
        let wifi = catalog.category("network/ wifi").expect("padded segment kept");
        assert_eq!(wifi.name, " wifi");
        assert_eq!(wifi.scripts[0].path, "network/ wifi");
        assert!(catalog.category("network/wifi").is_none());
    }
}
