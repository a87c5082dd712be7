//! Action-scoped validation schema.
//!
//! [`ValidationSchema::for_action`] turns an action's parameter list into one
//! [`FieldRule`] per parameter. Rules are checked in declaration order and a
//! field reports only its first failing constraint.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use scriptdeck_types::{Parameter, ParameterKind, ScriptAction};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::form::FormValues;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";
pub const SELECT_REQUIRED_MESSAGE: &str = "Please select an option";
pub const MULTISELECT_REQUIRED_MESSAGE: &str = "Please select at least one option";
pub const INVALID_OPTION_MESSAGE: &str = "Please select a valid option";

/// Shape a field value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    StringArray,
}

/// A single check applied to a field value.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Strings must be non-empty, arrays must have at least one element.
    NonEmpty { message: String },
    Pattern {
        pattern: String,
        #[serde(skip)]
        regex: Regex,
        message: String,
    },
    MinLength { length: usize, message: String },
    MaxLength { length: usize, message: String },
    Min { value: f64, message: String },
    Max { value: f64, message: String },
    /// Value (or every element) must be one of the declared option values.
    OneOf { values: Vec<String>, message: String },
}

/// Validation rule for one parameter.
#[derive(Debug, Clone, Serialize)]
pub struct FieldRule {
    pub field: String,
    pub value_type: ValueType,
    pub required: bool,
    pub constraints: Vec<Constraint>,
}

/// Ordered field → message map produced by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(IndexMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|(field, message)| format!("{field}: {message}")).collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Rules for every parameter of one action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSchema {
    pub action_id: String,
    pub fields: Vec<FieldRule>,
}

impl ValidationSchema {
    pub fn for_action(action: &ScriptAction) -> Self {
        Self {
            action_id: action.id.clone(),
            fields: action.parameters.iter().map(field_rule).collect(),
        }
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.field == field)
    }

    /// Validates `values`, collecting the first failure of each field.
    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for rule in &self.fields {
            if let Err(message) = rule.check(values.get(&rule.field)) {
                errors.insert(rule.field.clone(), message);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validates a single field, for inline feedback while editing.
    pub fn validate_field(&self, field: &str, value: Option<&Value>) -> Result<(), String> {
        self.rule(field).map_or(Ok(()), |rule| rule.check(value))
    }
}

fn field_rule(parameter: &Parameter) -> FieldRule {
    let mut constraints = Vec::new();
    let validation = parameter.validation.clone().unwrap_or_default();
    let option_values: Vec<String> = parameter.options.iter().map(|option| option.value.clone()).collect();

    let value_type = match parameter.kind {
        ParameterKind::Text | ParameterKind::Textarea => {
            if parameter.required {
                constraints.push(Constraint::NonEmpty {
                    message: REQUIRED_MESSAGE.to_string(),
                });
            }
            if let Some(pattern) = validation.pattern.as_deref() {
                match Regex::new(pattern) {
                    Ok(regex) => constraints.push(Constraint::Pattern {
                        pattern: pattern.to_string(),
                        regex,
                        message: validation.error_message.clone().unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string()),
                    }),
                    Err(err) => warn!(field = %parameter.id, pattern, error = %err, "ignoring invalid validation pattern"),
                }
            }
            if let Some(length) = validation.min_length {
                constraints.push(Constraint::MinLength {
                    length,
                    message: format!("Must be at least {length} characters"),
                });
            }
            if let Some(length) = validation.max_length {
                constraints.push(Constraint::MaxLength {
                    length,
                    message: format!("Must be at most {length} characters"),
                });
            }
            ValueType::String
        }
        ParameterKind::Number => {
            if let Some(value) = validation.min {
                constraints.push(Constraint::Min {
                    value,
                    message: format!("Must be at least {value}"),
                });
            }
            if let Some(value) = validation.max {
                constraints.push(Constraint::Max {
                    value,
                    message: format!("Must be at most {value}"),
                });
            }
            ValueType::Number
        }
        ParameterKind::Boolean => ValueType::Boolean,
        ParameterKind::Select => {
            if parameter.required {
                constraints.push(Constraint::NonEmpty {
                    message: SELECT_REQUIRED_MESSAGE.to_string(),
                });
            }
            ValueType::String
        }
        ParameterKind::Multiselect => {
            if parameter.required {
                constraints.push(Constraint::NonEmpty {
                    message: MULTISELECT_REQUIRED_MESSAGE.to_string(),
                });
            }
            ValueType::StringArray
        }
    };

    if matches!(parameter.kind, ParameterKind::Select | ParameterKind::Multiselect) && !option_values.is_empty() {
        constraints.push(Constraint::OneOf {
            values: option_values,
            message: INVALID_OPTION_MESSAGE.to_string(),
        });
    }

    FieldRule {
        field: parameter.id.clone(),
        value_type,
        // Booleans are always optional.
        required: parameter.required && parameter.kind != ParameterKind::Boolean,
        constraints,
    }
}

/// A value coerced to the rule's [`ValueType`].
enum Typed<'a> {
    Text(&'a str),
    Number(f64),
    Flag,
    List(Vec<&'a str>),
    Missing,
}

impl FieldRule {
    /// Checks one value, returning the first failing message.
    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        let typed = self.coerce(value)?;
        match typed {
            Typed::Missing if self.required => {
                let message = self.constraints.iter().find_map(|constraint| match constraint {
                    Constraint::NonEmpty { message } => Some(message.clone()),
                    _ => None,
                });
                Err(message.unwrap_or_else(|| REQUIRED_MESSAGE.to_string()))
            }
            Typed::Missing | Typed::Flag => Ok(()),
            typed => self.constraints.iter().try_for_each(|constraint| apply(constraint, &typed)),
        }
    }

    fn coerce<'a>(&self, value: Option<&'a Value>) -> Result<Typed<'a>, String> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Typed::Missing),
            Some(value) => value,
        };
        match (self.value_type, value) {
            (ValueType::String, Value::String(text)) if text.is_empty() => Ok(Typed::Missing),
            (ValueType::String, Value::String(text)) => Ok(Typed::Text(text)),
            (ValueType::String, _) => Err("Expected text".to_string()),
            (ValueType::Number, Value::Number(number)) => number.as_f64().map(Typed::Number).ok_or_else(|| "Expected a number".to_string()),
            (ValueType::Number, Value::String(text)) if text.trim().is_empty() => Ok(Typed::Missing),
            (ValueType::Number, Value::String(text)) => {
                text.trim().parse::<f64>().map(Typed::Number).map_err(|_| "Expected a number".to_string())
            }
            (ValueType::Number, _) => Err("Expected a number".to_string()),
            (ValueType::Boolean, Value::Bool(_)) => Ok(Typed::Flag),
            (ValueType::Boolean, _) => Err("Expected true or false".to_string()),
            (ValueType::StringArray, Value::Array(items)) if items.is_empty() => Ok(Typed::Missing),
            (ValueType::StringArray, Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(|| "Expected a list of options".to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map(Typed::List),
            (ValueType::StringArray, _) => Err("Expected a list of options".to_string()),
        }
    }
}

fn apply(constraint: &Constraint, typed: &Typed<'_>) -> Result<(), String> {
    let passes = match (constraint, typed) {
        (Constraint::NonEmpty { .. }, _) => true,
        (Constraint::Pattern { regex, .. }, Typed::Text(text)) => regex.is_match(text),
        (Constraint::MinLength { length, .. }, Typed::Text(text)) => text.chars().count() >= *length,
        (Constraint::MaxLength { length, .. }, Typed::Text(text)) => text.chars().count() <= *length,
        (Constraint::Min { value, .. }, Typed::Number(number)) => number >= value,
        (Constraint::Max { value, .. }, Typed::Number(number)) => number <= value,
        (Constraint::OneOf { values, .. }, Typed::Text(text)) => values.iter().any(|value| value == text),
        (Constraint::OneOf { values, .. }, Typed::List(items)) => items.iter().all(|item| values.iter().any(|value| value == item)),
        _ => true,
    };
    if passes { Ok(()) } else { Err(constraint.message().to_string()) }
}

impl Constraint {
    pub fn message(&self) -> &str {
        match self {
            Self::NonEmpty { message }
            | Self::Pattern { message, .. }
            | Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Min { message, .. }
            | Self::Max { message, .. }
            | Self::OneOf { message, .. } => message,
        }
    }
}
