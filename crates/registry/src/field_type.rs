//! Raw field type token → [`ParameterKind`].

use scriptdeck_types::ParameterKind;

/// Maps a raw source-side type token to a parameter kind.
///
/// Matching is case-insensitive. `num`/`number`, `bool`/`boolean`, `select`,
/// `multiselect`, and `textarea` map to their kinds; every other token,
/// including `str` and anything unrecognized, maps to [`ParameterKind::Text`].
pub fn map_field_type(raw_type: &str) -> ParameterKind {
    match raw_type.to_lowercase().as_str() {
        "num" | "number" => ParameterKind::Number,
        "bool" | "boolean" => ParameterKind::Boolean,
        "select" => ParameterKind::Select,
        "multiselect" => ParameterKind::Multiselect,
        "textarea" => ParameterKind::Textarea,
        _ => ParameterKind::Text,
    }
}
