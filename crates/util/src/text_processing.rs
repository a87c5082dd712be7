//! # Text Processing Utilities
//!
//! Fuzzy matching used by catalog search and the tree filter, plus
//! redaction of sensitive payload values before they reach the logs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SENSITIVE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(password|passwd|secret|token|api[_-]?key|credential)").expect("valid sensitive key pattern"));

const REDACTED: &str = "[REDACTED]";

/// Scores how well `needle` fuzzily matches `hay`.
///
/// Returns `Some(score)` if all characters in each space-separated token of
/// `needle` appear in order within `hay`, otherwise `None`. Consecutive
/// matches, word-boundary matches, and prefix matches score higher; longer
/// candidates are slightly penalized.
///
/// ```rust
/// use scriptdeck_util::fuzzy_score;
///
/// assert!(fuzzy_score("system/maintenance disk-cleanup", "disk clean").is_some());
/// assert!(fuzzy_score("network", "xyz").is_none());
/// assert_eq!(fuzzy_score("anything", ""), Some(0));
/// ```
pub fn fuzzy_score(hay: &str, needle: &str) -> Option<i64> {
    let tokens: Vec<Vec<char>> = needle
        .split_whitespace()
        .map(|token| token.chars().flat_map(char::to_lowercase).collect())
        .collect();
    if tokens.is_empty() {
        return Some(0);
    }

    let hay_chars: Vec<char> = hay.chars().flat_map(char::to_lowercase).collect();
    if hay_chars.is_empty() {
        return None;
    }

    let mut cursor = 0;
    let mut total = 0;
    for token in &tokens {
        total += score_token(&hay_chars, token, &mut cursor)?;
    }
    Some(total - hay_chars.len() as i64 / 8)
}

fn score_token(hay: &[char], token: &[char], cursor: &mut usize) -> Option<i64> {
    let mut score = 0;
    let mut consecutive = 0;
    let mut previous: Option<usize> = None;
    let mut first: Option<usize> = None;

    for &needle_char in token {
        let offset = hay[*cursor..].iter().position(|&candidate| candidate == needle_char)?;
        let index = *cursor + offset;
        first.get_or_insert(index);

        match previous {
            Some(prev) if index == prev + 1 => consecutive += 1,
            Some(prev) => {
                consecutive = 1;
                score -= (index - prev - 1) as i64 / 2;
            }
            None => consecutive = 1,
        }
        score += 6 * consecutive;
        if is_word_boundary(hay, index) {
            score += 10;
        }

        previous = Some(index);
        *cursor = index + 1;
    }

    if hay.starts_with(token) {
        score += 30;
    }
    if let Some(start) = first {
        score += (20 - start as i64).max(0);
    }
    Some(score)
}

fn is_word_boundary(hay: &[char], index: usize) -> bool {
    index == 0
        || hay
            .get(index - 1)
            .is_some_and(|character| character.is_whitespace() || character.is_ascii_punctuation())
}

/// Whether a payload key names a value that must not be logged.
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEY.is_match(key)
}

/// Returns a copy of a JSON object with sensitive keys' values replaced.
///
/// Non-object values are returned unchanged.
pub fn redact_payload(payload: &Value) -> Value {
    match payload {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_key(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_payload(value)
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_match_outranks_scattered_match() {
        let prefix = fuzzy_score("cleanup", "clean").expect("prefix matches");
        let scattered = fuzzy_score("service-control-lean", "clean").expect("scattered matches");
        assert!(prefix > scattered, "prefix {prefix} should beat scattered {scattered}");
    }

    #[test]
    fn tokens_match_in_order() {
        assert!(fuzzy_score("network/monitoring status", "net status").is_some());
        assert!(fuzzy_score("status network", "status net").is_some());
        assert!(fuzzy_score("", "a").is_none());
        assert_eq!(fuzzy_score("", "   "), Some(0));
    }

    #[test]
    fn redacts_nested_sensitive_values() {
        let payload = json!({
            "hostname": "web-1",
            "api_key": "abc",
            "auth": { "Password": "hunter2", "user": "ops" }
        });
        let redacted = redact_payload(&payload);
        assert_eq!(redacted["hostname"], "web-1");
        assert_eq!(redacted["api_key"], REDACTED);
        assert_eq!(redacted["auth"]["Password"], REDACTED);
        assert_eq!(redacted["auth"]["user"], "ops");
    }
}
