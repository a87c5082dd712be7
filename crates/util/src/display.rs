//! Display helpers for the confirmation step and narrow terminal columns.

use serde_json::Value;
use unicode_width::UnicodeWidthChar;

/// Renders a submitted parameter value for the confirmation summary.
///
/// Missing and null values read `Not provided`, booleans read `Yes`/`No`,
/// arrays are joined with `, `, and strings are shown verbatim.
pub fn format_param_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "Not provided".to_string(),
        Some(Value::Bool(flag)) => if *flag { "Yes" } else { "No" }.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Truncates `text` to at most `max_width` terminal columns, appending `…`
/// when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|character| character.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for character in text.chars() {
        let char_width = character.width().unwrap_or(0);
        if width + char_width > budget {
            break;
        }
        width += char_width;
        out.push(character);
    }
    out.push('…');
    out
}
