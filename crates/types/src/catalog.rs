//! Wire format of the external script catalog.
//!
//! A catalog document is a JSON array of [`CatalogItem`] records. Each record
//! mixes an action selector and arbitrary field descriptors inside one
//! heterogeneous `options` list, where every entry is an object keyed by the
//! field name. The list is parsed up front into the tagged
//! [`OptionDescriptor`] so downstream code never inspects raw keys.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Key that marks the action selector inside the `options` list.
pub const ACTION_SELECTOR_KEY: &str = "action";

/// Literal value of the `required` flag that marks a field as mandatory.
pub const REQUIRED_YES: &str = "yes";

/// Errors raised while decoding the loosely typed `options` entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogFormatError {
    /// An option entry was an empty object.
    #[error("option entry has no field key")]
    EmptyOption,
    /// The action selector body could not be decoded.
    #[error("invalid action selector: {0}")]
    InvalidActionSelector(String),
    /// A field descriptor body could not be decoded.
    #[error("invalid field descriptor '{field}': {message}")]
    InvalidField { field: String, message: String },
}

/// One script source record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Display and ownership metadata.
    pub meta: CatalogMeta,
    /// Action selector plus field descriptors, in source order.
    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
    /// Invocation targets keyed by action-choice name.
    #[serde(default)]
    pub commands: Vec<CommandRecord>,
}

impl CatalogItem {
    /// Returns the action selector declared by this item, if any.
    pub fn action_selector(&self) -> Option<&ActionSelector> {
        self.options.iter().find_map(|option| match option {
            OptionDescriptor::ActionSelector(selector) => Some(selector),
            OptionDescriptor::Field(_) => None,
        })
    }

    /// Returns the declared action choices, in declaration order.
    pub fn choices(&self) -> &[String] {
        self.action_selector().map(|selector| selector.choices.as_slice()).unwrap_or_default()
    }

    /// Iterates the field descriptors, skipping the action selector.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.options.iter().filter_map(|option| match option {
            OptionDescriptor::Field(field) => Some(field),
            OptionDescriptor::ActionSelector(_) => None,
        })
    }
}

/// Metadata block of a catalog item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogMeta {
    /// Script flavour (for example `python` or `shell`).
    #[serde(rename = "type", default)]
    pub script_type: String,
    /// Script name; becomes the script identifier.
    pub name: String,
    /// Free-form category label shown on the information step.
    #[serde(default)]
    pub category: String,
    /// Platforms the script supports.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Ownership information.
    #[serde(rename = "Owner", default)]
    pub owner: Option<CatalogOwner>,
    /// Slash-delimited category path (for example `system/maintenance`).
    #[serde(default)]
    pub path: String,
}

/// Ownership information attached to a catalog item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogOwner {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(rename = "teamID", default)]
    pub team_id: Option<i64>,
    #[serde(rename = "defineDgroupname", default)]
    pub group_name: Option<String>,
    #[serde(rename = "defineDgroupname2", default)]
    pub secondary_group_name: Option<String>,
}

/// Typed view over one entry of the raw `options` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>", into = "IndexMap<String, Value>")]
pub enum OptionDescriptor {
    /// The entry keyed by `action`, listing the available choices.
    ActionSelector(ActionSelector),
    /// Any other entry; the key is the field name.
    Field(FieldDescriptor),
}

/// The action selector descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionSelector {
    #[serde(rename = "type", default, deserialize_with = "lenient_token")]
    pub raw_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub required: Option<String>,
    /// Action choice names in declaration order.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub choices: Vec<String>,
}

/// A field descriptor. `name` comes from the entry key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Raw type token (`str`, `num`, `bool`, ...).
    pub raw_type: String,
    /// Raw required flag; only the literal `yes` means required.
    pub required: Option<String>,
    /// Action choices this field applies to.
    pub applies_to: Vec<String>,
}

impl FieldDescriptor {
    pub fn is_required(&self) -> bool {
        self.required.as_deref() == Some(REQUIRED_YES)
    }

    pub fn applies_to(&self, choice: &str) -> bool {
        self.applies_to.iter().any(|candidate| candidate == choice)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FieldDescriptorBody {
    #[serde(rename = "type", default, deserialize_with = "lenient_token")]
    raw_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    required: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    define_action_arg: Vec<String>,
}

// Catalog producers are loose about scalar types inside option bodies. A
// value of the wrong shape reads as absent instead of failing the item.

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Keeps the string elements of an array; anything else is an empty list.
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl TryFrom<IndexMap<String, Value>> for OptionDescriptor {
    type Error = CatalogFormatError;

    fn try_from(mut entry: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        if let Some(body) = entry.shift_remove(ACTION_SELECTOR_KEY) {
            let selector = serde_json::from_value::<ActionSelector>(body)
                .map_err(|error| CatalogFormatError::InvalidActionSelector(error.to_string()))?;
            return Ok(OptionDescriptor::ActionSelector(selector));
        }

        let (name, body) = entry.into_iter().next().ok_or(CatalogFormatError::EmptyOption)?;
        let body = serde_json::from_value::<FieldDescriptorBody>(body).map_err(|error| CatalogFormatError::InvalidField {
            field: name.clone(),
            message: error.to_string(),
        })?;
        Ok(OptionDescriptor::Field(FieldDescriptor {
            name,
            raw_type: body.raw_type,
            required: body.required,
            applies_to: body.define_action_arg,
        }))
    }
}

impl From<OptionDescriptor> for IndexMap<String, Value> {
    fn from(descriptor: OptionDescriptor) -> Self {
        let mut entry = IndexMap::with_capacity(1);
        match descriptor {
            OptionDescriptor::ActionSelector(selector) => {
                entry.insert(
                    ACTION_SELECTOR_KEY.to_string(),
                    serde_json::to_value(selector).unwrap_or(Value::Null),
                );
            }
            OptionDescriptor::Field(field) => {
                let body = FieldDescriptorBody {
                    raw_type: field.raw_type,
                    required: field.required,
                    define_action_arg: field.applies_to,
                };
                entry.insert(field.name, serde_json::to_value(body).unwrap_or(Value::Null));
            }
        }
        entry
    }
}

/// Read/destructive tag on a command record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandActionType {
    #[serde(rename = "r")]
    Read,
    #[serde(rename = "d")]
    Destructive,
}

/// Invocation target for one action choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandRecord {
    /// Action-choice name this record serves.
    pub name: String,
    /// Invocation target (endpoint path).
    #[serde(default)]
    pub command: String,
    /// Raw `actionT` tag (`r` or `d`).
    #[serde(rename = "actionT", default, deserialize_with = "lenient_string")]
    pub action_type: Option<String>,
}

impl CommandRecord {
    /// Decodes the raw `actionT` tag; unknown tags yield `None`.
    pub fn action_kind(&self) -> Option<CommandActionType> {
        match self.action_type.as_deref() {
            Some("r") => Some(CommandActionType::Read),
            Some("d") => Some(CommandActionType::Destructive),
            _ => None,
        }
    }
}
