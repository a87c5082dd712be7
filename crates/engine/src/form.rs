//! Form values and conversion of raw text input into typed JSON values.

use indexmap::IndexMap;
use scriptdeck_types::{Parameter, ParameterKind};
use serde_json::{Number, Value};

/// Field id → value, in the order fields were first set.
pub type FormValues = IndexMap<String, Value>;

/// Converts raw text typed by a user into the JSON shape a parameter kind
/// expects.
///
/// Numbers that do not parse stay strings so validation can report them;
/// booleans accept `true/false`, `yes/no`, `1/0`, and `on/off`; multiselect
/// input is split on commas. Blank input for a non-text kind is `Null`.
pub fn parse_input(kind: ParameterKind, raw: &str) -> Value {
    let trimmed = raw.trim();
    match kind {
        ParameterKind::Text | ParameterKind::Textarea | ParameterKind::Select => Value::String(raw.to_string()),
        _ if trimmed.is_empty() => Value::Null,
        ParameterKind::Number => parse_number(trimmed).unwrap_or_else(|| Value::String(trimmed.to_string())),
        ParameterKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Value::Bool(true),
            "false" | "no" | "n" | "0" | "off" => Value::Bool(false),
            _ => Value::String(trimmed.to_string()),
        },
        ParameterKind::Multiselect => Value::Array(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
    }
}

/// Parses a decimal string into a JSON number, preferring integers.
pub fn parse_number(text: &str) -> Option<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::Number(integer.into()));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
}

/// Initial form values for an action: every parameter that declares a
/// default starts with it.
pub fn default_values(parameters: &[Parameter]) -> FormValues {
    parameters
        .iter()
        .filter_map(|parameter| parameter.default.clone().map(|value| (parameter.id.clone(), value)))
        .collect()
}
