//! Flattened, filterable view of the category tree.

use std::collections::HashSet;

use scriptdeck_types::{Catalog, Category, Script};
use scriptdeck_util::fuzzy_score;

use crate::ui::components::common::TextInputState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRowKind {
    Category { expanded: bool, has_children: bool },
    Script,
}

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub kind: TreeRowKind,
    /// Category path, or `path/id` for a script.
    pub key: String,
    pub label: String,
    pub depth: usize,
}

impl TreeRow {
    pub fn is_category(&self) -> bool {
        matches!(self.kind, TreeRowKind::Category { .. })
    }
}

/// Selection, expansion and filter state of the catalog pane.
///
/// Rows are recomputed from the catalog after every structural change; the
/// catalog itself is never mutated here.
#[derive(Debug, Default)]
pub struct CatalogTreeState {
    expanded: HashSet<String>,
    rows: Vec<TreeRow>,
    selected: usize,
    filter: TextInputState,
    filtering: bool,
}

pub fn script_key(script: &Script) -> String {
    format!("{}/{}", script.path, script.id)
}

impl CatalogTreeState {
    pub fn new(catalog: &Catalog) -> Self {
        let mut state = Self::default();
        state.reset(catalog);
        state
    }

    /// Forgets all expansion and filter state; roots start expanded.
    pub fn reset(&mut self, catalog: &Catalog) {
        self.expanded = catalog.categories.iter().map(|category| category.id.clone()).collect();
        self.filter = TextInputState::new();
        self.filtering = false;
        self.selected = 0;
        self.rebuild(catalog);
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&TreeRow> {
        self.rows.get(self.selected)
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn filter_text(&self) -> &str {
        self.filter.input()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the selection onto the row with `key`, if visible.
    pub fn select_key(&mut self, key: &str) {
        if let Some(index) = self.rows.iter().position(|row| row.key == key) {
            self.selected = index;
        }
    }

    /// Flips the expansion of the selected category row.
    pub fn toggle_selected(&mut self, catalog: &Catalog) {
        let Some(row) = self.selected().filter(|row| row.is_category()) else {
            return;
        };
        let key = row.key.clone();
        if !self.expanded.remove(&key) {
            self.expanded.insert(key.clone());
        }
        self.rebuild(catalog);
        self.select_key(&key);
    }

    pub fn set_selected_expanded(&mut self, catalog: &Catalog, expanded: bool) {
        let Some(row) = self.selected().filter(|row| row.is_category()) else {
            return;
        };
        let key = row.key.clone();
        if expanded {
            self.expanded.insert(key.clone());
        } else {
            self.expanded.remove(&key);
        }
        self.rebuild(catalog);
        self.select_key(&key);
    }

    pub fn start_filter(&mut self) {
        self.filtering = true;
    }

    /// Stops editing the filter but keeps it applied.
    pub fn end_filter(&mut self) {
        self.filtering = false;
    }

    pub fn clear_filter(&mut self, catalog: &Catalog) {
        self.filter = TextInputState::new();
        self.filtering = false;
        self.rebuild(catalog);
    }

    pub fn filter_insert(&mut self, catalog: &Catalog, character: char) {
        self.filter.insert_char(character);
        self.selected = 0;
        self.rebuild(catalog);
    }

    pub fn filter_backspace(&mut self, catalog: &Catalog) {
        self.filter.backspace();
        self.selected = 0;
        self.rebuild(catalog);
    }

    /// Recomputes the visible rows.
    ///
    /// With an active filter only matching scripts are listed, together with
    /// their ancestor categories, all shown expanded.
    pub fn rebuild(&mut self, catalog: &Catalog) {
        let query = self.filter.input().trim().to_string();
        let mut rows = Vec::new();
        for category in &catalog.categories {
            if query.is_empty() {
                self.push_expanded(category, 0, &mut rows);
            } else {
                push_matching(category, 0, &query, &mut rows);
            }
        }
        self.rows = rows;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn push_expanded(&self, category: &Category, depth: usize, rows: &mut Vec<TreeRow>) {
        let expanded = self.expanded.contains(&category.id);
        rows.push(category_row(category, depth, expanded));
        if !expanded {
            return;
        }
        rows.extend(category.scripts.iter().map(|script| script_row(script, depth + 1)));
        for child in &category.children {
            self.push_expanded(child, depth + 1, rows);
        }
    }
}

fn push_matching(category: &Category, depth: usize, query: &str, rows: &mut Vec<TreeRow>) {
    let mut subtree = Vec::new();
    subtree.extend(
        category
            .scripts
            .iter()
            .filter(|script| script_matches(script, query))
            .map(|script| script_row(script, depth + 1)),
    );
    for child in &category.children {
        push_matching(child, depth + 1, query, &mut subtree);
    }
    if !subtree.is_empty() {
        rows.push(category_row(category, depth, true));
        rows.append(&mut subtree);
    }
}

fn script_matches(script: &Script, query: &str) -> bool {
    let haystack = format!("{} {} {}", script.path, script.name, script.description);
    fuzzy_score(&haystack, query).is_some()
}

fn category_row(category: &Category, depth: usize, expanded: bool) -> TreeRow {
    TreeRow {
        kind: TreeRowKind::Category {
            expanded,
            has_children: !category.is_empty(),
        },
        key: category.id.clone(),
        label: category.name.clone(),
        depth,
    }
}

fn script_row(script: &Script, depth: usize) -> TreeRow {
    TreeRow {
        kind: TreeRowKind::Script,
        key: script_key(script),
        label: script.name.clone(),
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::CatalogMeta;

    fn script(id: &str, path: &str) -> Script {
        Script {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            category: path.rsplit('/').next().unwrap_or_default().into(),
            path: path.into(),
            meta: CatalogMeta::default(),
            actions: Vec::new(),
        }
    }

    fn catalog() -> Catalog {
        let mut maintenance = Category::new("system/maintenance", "maintenance");
        maintenance.scripts.push(script("disk-cleanup", "system/maintenance"));
        maintenance.scripts.push(script("log-rotate", "system/maintenance"));
        let mut system = Category::new("system", "system");
        system.children.push(maintenance);
        let mut monitoring = Category::new("network/monitoring", "monitoring");
        monitoring.scripts.push(script("network-status", "network/monitoring"));
        let mut network = Category::new("network", "network");
        network.children.push(monitoring);
        Catalog {
            categories: vec![system, network],
        }
    }

    fn labels(state: &CatalogTreeState) -> Vec<&str> {
        state.rows().iter().map(|row| row.label.as_str()).collect()
    }

    #[test]
    fn roots_start_expanded_and_children_collapsed() {
        let state = CatalogTreeState::new(&catalog());
        assert_eq!(labels(&state), ["system", "maintenance", "network", "monitoring"]);
        assert_eq!(state.rows()[1].depth, 1);
    }

    #[test]
    fn toggling_lists_scripts_before_subcategories() {
        let catalog = catalog();
        let mut state = CatalogTreeState::new(&catalog);
        state.select_next();
        state.toggle_selected(&catalog);
        assert_eq!(
            labels(&state),
            ["system", "maintenance", "disk-cleanup", "log-rotate", "network", "monitoring"]
        );
        assert_eq!(state.selected().map(|row| row.key.as_str()), Some("system/maintenance"));
        assert_eq!(state.rows()[2].key, "system/maintenance/disk-cleanup");

        state.toggle_selected(&catalog);
        assert_eq!(labels(&state).len(), 4);
    }

    #[test]
    fn filter_keeps_matching_scripts_and_their_ancestors() {
        let catalog = catalog();
        let mut state = CatalogTreeState::new(&catalog);
        state.start_filter();
        for character in "rotate".chars() {
            state.filter_insert(&catalog, character);
        }
        assert_eq!(labels(&state), ["system", "maintenance", "log-rotate"]);

        state.clear_filter(&catalog);
        assert!(!state.is_filtering());
        assert_eq!(labels(&state).len(), 4);
    }

    #[test]
    fn selection_is_clamped_to_visible_rows() {
        let catalog = catalog();
        let mut state = CatalogTreeState::new(&catalog);
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected_index(), 3);
        state.start_filter();
        for character in "zzz".chars() {
            state.filter_insert(&catalog, character);
        }
        assert!(state.rows().is_empty());
        assert!(state.selected().is_none());
    }
}
