//! Normalized catalog model consumed by the wizard.
//!
//! The graph is rebuilt from scratch on every catalog load and treated as
//! immutable afterwards; selection state lives in the engine's wizard state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{CatalogMeta, CommandActionType};

/// Closed set of parameter kinds a form field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    #[default]
    Text,
    Number,
    Boolean,
    Select,
    Multiselect,
    Textarea,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Textarea => "textarea",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verb used when invoking an action's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label/value pair offered by select and multiselect parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOption {
    pub label: String,
    pub value: String,
}

/// Declarative constraints attached to a parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValidation {
    /// Regular expression a text value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Inclusive numeric lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive numeric upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Custom message reported when `pattern` does not match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A single form field of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub name: String,
    /// Display label. Catalog-sourced parameters reuse the field key.
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ParameterValidation>,
}

impl Parameter {
    /// Creates a parameter whose id, name and label are all `key`.
    pub fn new(key: impl Into<String>, kind: ParameterKind, required: bool) -> Self {
        let key = key.into();
        Self {
            id: key.clone(),
            name: key.clone(),
            label: key,
            kind,
            required,
            default: None,
            options: Vec::new(),
            validation: None,
        }
    }
}

/// One invocable action of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptAction {
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub description: String,
    pub parameters: Vec<Parameter>,
    /// Read/destructive tag copied from the matched command record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<CommandActionType>,
}

impl ScriptAction {
    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.id == id)
    }

    pub fn is_destructive(&self) -> bool {
        self.action_type == Some(CommandActionType::Destructive)
    }
}

/// A catalog script with its actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Full category path the script was attached to.
    pub path: String,
    /// Copy of the source metadata for the information step.
    pub meta: CatalogMeta,
    pub actions: Vec<ScriptAction>,
}

impl Script {
    pub fn action(&self, id: &str) -> Option<&ScriptAction> {
        self.actions.iter().find(|action| action.id == id)
    }
}

/// A node of the category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Cumulative path (for example `system/maintenance`).
    pub id: String,
    /// Last path segment.
    pub name: String,
    pub children: Vec<Category>,
    pub scripts: Vec<Script>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            scripts: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.scripts.is_empty()
    }

    /// Id of the parent category, or `None` for a root.
    pub fn parent_id(&self) -> Option<&str> {
        self.id.rsplit_once('/').map(|(parent, _)| parent)
    }
}

/// The assembled catalog: root categories only, each carrying its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Depth-first walk over every script, paired with its owning category.
    ///
    /// Scripts of a category come before the scripts of its children, which
    /// matches the order the tree view lists them.
    pub fn scripts(&self) -> Vec<(&Category, &Script)> {
        fn visit<'a>(category: &'a Category, out: &mut Vec<(&'a Category, &'a Script)>) {
            out.extend(category.scripts.iter().map(|script| (category, script)));
            for child in &category.children {
                visit(child, out);
            }
        }

        let mut out = Vec::new();
        for category in &self.categories {
            visit(category, &mut out);
        }
        out
    }

    /// Finds a category anywhere in the tree by its path id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        fn find<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
            categories
                .iter()
                .find_map(|category| if category.id == id { Some(category) } else { find(&category.children, id) })
        }
        find(&self.categories, id)
    }
}
