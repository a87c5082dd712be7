//! In-memory fuzzy search over the loaded scripts.

use std::borrow::Cow;

use scriptdeck_types::Script;
use scriptdeck_util::fuzzy_score;
use serde::Serialize;

use crate::ScriptRegistry;

pub const DEFAULT_RESULT_LIMIT: usize = 20;
const COVERAGE_SCORE_MULTIPLIER: i64 = 20;
const EXACT_NAME_MATCH_SCORE_BONUS: i64 = 50;
const PREFIX_NAME_MATCH_SCORE_BONUS: i64 = 25;

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub script_id: String,
    pub path: String,
    pub description: String,
    pub score: i64,
}

impl ScriptRegistry {
    /// Ranks scripts against `query`, best first, capped at
    /// [`DEFAULT_RESULT_LIMIT`]. A blank query returns nothing.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        search_scripts(self.scripts(), query, DEFAULT_RESULT_LIMIT)
    }
}

/// Ranks `scripts` against `query`, returning at most `limit` results.
pub fn search_scripts(scripts: &[Script], query: &str, limit: usize) -> Vec<SearchResult> {
    let trimmed_query = query.trim();
    if trimmed_query.is_empty() {
        return Vec::new();
    }
    let query_lower = trimmed_query.to_lowercase();
    let query_tokens = tokenize_query(trimmed_query);

    let mut scored = scripts
        .iter()
        .filter_map(|script| {
            score_script_match(script, &query_lower, &query_tokens).map(|score| SearchResult {
                script_id: script.id.clone(),
                path: script.path.clone(),
                description: script.description.clone(),
                score,
            })
        })
        .collect::<Vec<_>>();

    scored.sort_by(|left, right| {
        right
            .score
            .cmp(&left.score)
            .then_with(|| left.script_id.cmp(&right.script_id))
            .then_with(|| left.path.cmp(&right.path))
    });
    scored.truncate(limit);
    scored
}

fn score_script_match(script: &Script, query_lower: &str, query_tokens: &[String]) -> Option<i64> {
    let haystack = build_search_haystack(script);
    let fuzzy_total = query_tokens
        .iter()
        .try_fold(0_i64, |accumulator, token| fuzzy_score(&haystack, token).map(|score| accumulator + score))?;
    let haystack_lower = haystack.to_lowercase();

    let coverage_score =
        query_tokens.iter().filter(|token| haystack_lower.contains(token.as_str())).count() as i64 * COVERAGE_SCORE_MULTIPLIER;

    let name_lower = script.name.to_lowercase();
    let exact_bonus = if name_lower.contains(query_lower) {
        EXACT_NAME_MATCH_SCORE_BONUS
    } else {
        0
    };
    let prefix_bonus = if query_tokens.first().is_some_and(|token| name_lower.starts_with(token.as_str())) {
        PREFIX_NAME_MATCH_SCORE_BONUS
    } else {
        0
    };

    Some(fuzzy_total + coverage_score + exact_bonus + prefix_bonus)
}

fn tokenize_query(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn build_search_haystack(script: &Script) -> String {
    let mut haystack = String::new();
    append_non_empty(&mut haystack, &script.path);
    append_non_empty(&mut haystack, &script.name);
    append_non_empty(&mut haystack, &normalize_identifier(&script.name));
    append_non_empty(&mut haystack, &script.description);
    for action in &script.actions {
        append_non_empty(&mut haystack, &action.name);
    }
    haystack
}

fn append_non_empty(buffer: &mut String, value: &str) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(trimmed);
    }
}

fn normalize_identifier(value: &str) -> Cow<'_, str> {
    if value.bytes().any(|byte| matches!(byte, b'_' | b'-' | b'.')) {
        Cow::Owned(value.replace(['_', '-', '.'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdeck_types::CatalogMeta;

    fn script(name: &str, path: &str, description: &str) -> Script {
        Script {
            id: name.into(),
            name: name.into(),
            description: description.into(),
            category: String::new(),
            path: path.into(),
            meta: CatalogMeta::default(),
            actions: Vec::new(),
        }
    }

    fn scripts() -> Vec<Script> {
        vec![
            script("network-status", "network/monitoring", "Check interface status"),
            script("disk-cleanup", "system/maintenance", "Remove old files"),
            script("service-control", "system/services", "Start or stop a unit"),
        ]
    }

    #[test]
    fn name_match_ranks_first() {
        let results = search_scripts(&scripts(), "cleanup", DEFAULT_RESULT_LIMIT);
        assert_eq!(results.first().map(|r| r.script_id.as_str()), Some("disk-cleanup"));
    }

    #[test]
    fn path_tokens_participate() {
        let results = search_scripts(&scripts(), "system services", DEFAULT_RESULT_LIMIT);
        assert_eq!(results.first().map(|r| r.script_id.as_str()), Some("service-control"));
    }

    #[test]
    fn blank_or_unmatched_query_returns_nothing() {
        assert!(search_scripts(&scripts(), "   ", DEFAULT_RESULT_LIMIT).is_empty());
        assert!(search_scripts(&scripts(), "zzzz", DEFAULT_RESULT_LIMIT).is_empty());
    }

    #[test]
    fn limit_caps_results() {
        assert_eq!(search_scripts(&scripts(), "s", 2).len(), 2);
    }
}
