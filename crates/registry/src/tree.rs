//! Arena-backed category tree keyed by cumulative path.
//!
//! Every distinct path string maps to exactly one node index. Nodes refer to
//! their children by index, so building the tree never needs shared or
//! back-pointing references; the owned [`Category`] graph is produced once at
//! the end by [`CategoryTree::into_roots`].

use indexmap::IndexMap;
use scriptdeck_types::{Category, Script};

/// Category id used for items whose path has no usable segment.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug)]
struct Node {
    id: String,
    name: String,
    children: Vec<usize>,
    scripts: Vec<Script>,
}

/// Path→node index plus node storage.
#[derive(Debug, Default)]
pub struct CategoryTree {
    nodes: Vec<Node>,
    index: IndexMap<String, usize>,
}

/// Normalizes a raw slash-delimited path by dropping blank segments; the
/// others are kept verbatim. A path with no segments becomes
/// [`UNCATEGORIZED`].
pub fn normalize_path(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|segment| !segment.trim().is_empty()).collect();
    if segments.is_empty() { UNCATEGORIZED.to_string() } else { segments.join("/") }
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct category nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ensures a node exists for every prefix of `path` and returns the index
    /// of the node for the full (normalized) path.
    ///
    /// A node is linked under its immediate prefix only when it is created, so
    /// re-processing a path adds neither nodes nor links.
    pub fn ensure_path(&mut self, path: &str) -> usize {
        let path = normalize_path(path);
        let mut parent: Option<usize> = None;
        let mut cumulative = String::new();

        for segment in path.split('/') {
            if !cumulative.is_empty() {
                cumulative.push('/');
            }
            cumulative.push_str(segment);

            let index = match self.index.get(&cumulative) {
                Some(&existing) => existing,
                None => {
                    let created = self.nodes.len();
                    self.nodes.push(Node {
                        id: cumulative.clone(),
                        name: segment.to_string(),
                        children: Vec::new(),
                        scripts: Vec::new(),
                    });
                    self.index.insert(cumulative.clone(), created);
                    if let Some(parent) = parent {
                        self.nodes[parent].children.push(created);
                    }
                    created
                }
            };
            parent = Some(index);
        }

        // `path` always has at least one segment after normalization.
        parent.unwrap_or_default()
    }

    /// Appends `script` to the category at `path`, creating the path first.
    pub fn attach_script(&mut self, path: &str, script: Script) {
        let index = self.ensure_path(path);
        self.nodes[index].scripts.push(script);
    }

    /// Consumes the arena and returns the root categories, in first-seen
    /// order, each carrying its full subtree.
    pub fn into_roots(self) -> Vec<Category> {
        let root_ids: Vec<usize> = self
            .index
            .iter()
            .filter(|(id, _)| !id.contains('/'))
            .map(|(_, &index)| index)
            .collect();

        let mut slots: Vec<Option<Node>> = self.nodes.into_iter().map(Some).collect();
        root_ids.into_iter().filter_map(|index| take_subtree(&mut slots, index)).collect()
    }
}

fn take_subtree(slots: &mut [Option<Node>], index: usize) -> Option<Category> {
    let node = slots.get_mut(index)?.take()?;
    let children = node.children.iter().filter_map(|&child| take_subtree(slots, child)).collect();
    Some(Category {
        id: node.id,
        name: node.name,
        children,
        scripts: node.scripts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_one_node_per_prefix() {
        let mut tree = CategoryTree::new();
        tree.ensure_path("a/b/c");
        assert_eq!(tree.len(), 3);
        assert!(tree.contains("a") && tree.contains("a/b") && tree.contains("a/b/c"));

        let roots = tree.into_roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, "a");
        assert_eq!(roots[0].children[0].id, "a/b");
        assert_eq!(roots[0].children[0].name, "b");
        assert_eq!(roots[0].children[0].children[0].id, "a/b/c");
    }

    #[test]
    fn reprocessing_a_path_adds_nothing() {
        let mut tree = CategoryTree::new();
        let first = tree.ensure_path("system/maintenance");
        let second = tree.ensure_path("system/maintenance");
        assert_eq!(first, second);
        assert_eq!(tree.len(), 2);

        let roots = tree.into_roots();
        assert_eq!(roots[0].children.len(), 1);
    }

    #[test]
    fn children_keep_first_seen_order() {
        let mut tree = CategoryTree::new();
        tree.ensure_path("system/network");
        tree.ensure_path("security");
        tree.ensure_path("system/maintenance");
        tree.ensure_path("system/network/monitoring");

        let roots = tree.into_roots();
        let root_ids: Vec<&str> = roots.iter().map(|category| category.id.as_str()).collect();
        assert_eq!(root_ids, ["system", "security"]);
        let child_ids: Vec<&str> = roots[0].children.iter().map(|category| category.id.as_str()).collect();
        assert_eq!(child_ids, ["system/network", "system/maintenance"]);
    }

    #[test]
    fn normalizes_stray_separators() {
        assert_eq!(normalize_path("/system//maintenance/"), "system/maintenance");
        assert_eq!(normalize_path(" system / disk "), " system / disk ");
        assert_eq!(normalize_path("system/ /disk"), "system/disk");
        assert_eq!(normalize_path(""), UNCATEGORIZED);
        assert_eq!(normalize_path("///"), UNCATEGORIZED);
    }
}
