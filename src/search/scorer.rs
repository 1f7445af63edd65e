//! Row scoring
//!
//! Score = phrase hits × [`PHRASE_WEIGHT`]
//!       + Σ tokens (key hits × [`KEY_TOKEN_WEIGHT`] + value hits × [`VALUE_TOKEN_WEIGHT`])
//!
//! All matching is case-insensitive literal substring counting.

use crate::model::{Row, StableIndex};

/// Weight of one occurrence of the whole normalized query
pub const PHRASE_WEIGHT: u64 = 10;
/// Weight of one token occurrence in the key text
pub const KEY_TOKEN_WEIGHT: u64 = 4;
/// Weight of one token occurrence in the value text
pub const VALUE_TOKEN_WEIGHT: u64 = 2;

/// A row's score for one search pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredEntry {
    pub id: StableIndex,
    pub score: u64,
}

/// Trim and lowercase a raw query
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Count non-overlapping occurrences of `needle`, scanning left to right
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Score and rank rows against a free-text query
///
/// With an empty (after trimming) query every row is returned with score 0
/// in input order. Otherwise only rows with a positive score are returned,
/// highest first; equal scores keep their input order.
pub fn score(rows: &[Row], raw_query: &str) -> Vec<ScoredEntry> {
    let query = normalize_query(raw_query);
    if query.is_empty() {
        return rows
            .iter()
            .map(|row| ScoredEntry {
                id: row.id(),
                score: 0,
            })
            .collect();
    }

    let tokens: Vec<&str> = query.split_whitespace().collect();
    let mut combined = String::new();
    let mut results = Vec::new();

    for row in rows {
        let key = row.key_text().to_lowercase();
        let value = row.value_text().to_lowercase();

        combined.clear();
        combined.push_str(&key);
        combined.push(' ');
        combined.push_str(&value);

        let mut total = count_occurrences(&combined, &query) as u64 * PHRASE_WEIGHT;
        for token in &tokens {
            total += count_occurrences(&key, token) as u64 * KEY_TOKEN_WEIGHT;
            total += count_occurrences(&value, token) as u64 * VALUE_TOKEN_WEIGHT;
        }

        if total > 0 {
            results.push(ScoredEntry {
                id: row.id(),
                score: total,
            });
        }
    }

    // sort_by is stable: ties keep input order
    results.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::trace!(query = %query, matches = results.len(), "scored rows");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, &str)]) -> Vec<Row> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (k, v))| Row::new(StableIndex(i), k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("banana", "ana"), 1);
        assert_eq!(count_occurrences("abc", ""), 0);
        assert_eq!(count_occurrences("", "a"), 0);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Apple PIE "), "apple pie");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_worked_example() {
        let rows = rows(&[("apple pie", "dessert"), ("banana", "apple fritter")]);
        let scored = score(&rows, "apple");
        assert_eq!(
            scored,
            vec![
                ScoredEntry {
                    id: StableIndex(0),
                    score: 14
                },
                ScoredEntry {
                    id: StableIndex(1),
                    score: 12
                },
            ]
        );
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let rows = rows(&[("b", "2"), ("a", "1"), ("c", "3")]);
        let scored = score(&rows, "   ");
        let ids: Vec<usize> = scored.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(scored.iter().all(|e| e.score == 0));
    }

    #[test]
    fn test_no_match_excluded() {
        let rows = rows(&[("apple", "red"), ("kiwi", "green")]);
        let scored = score(&rows, "kiwi");
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].id, StableIndex(1));
    }

    #[test]
    fn test_case_insensitive() {
        let rows = rows(&[("APPLE", "")]);
        let scored = score(&rows, "apple");
        // phrase in "apple " + key token
        assert_eq!(scored[0].score, PHRASE_WEIGHT + KEY_TOKEN_WEIGHT);
    }

    #[test]
    fn test_multi_token_query() {
        let rows = rows(&[("red apple", "sweet red fruit")]);
        let scored = score(&rows, "red apple");
        // phrase once, "red" key+value, "apple" key
        let expected = PHRASE_WEIGHT
            + KEY_TOKEN_WEIGHT
            + VALUE_TOKEN_WEIGHT
            + KEY_TOKEN_WEIGHT;
        assert_eq!(scored[0].score, expected);
    }

    #[test]
    fn test_duplicate_tokens_each_count() {
        let rows = rows(&[("tea", "")]);
        let single = score(&rows, "tea")[0].score;
        let doubled = score(&rows, "tea tea")[0].score;
        // phrase "tea tea" does not occur; each token occurrence counts twice
        assert_eq!(single, PHRASE_WEIGHT + KEY_TOKEN_WEIGHT);
        assert_eq!(doubled, 2 * KEY_TOKEN_WEIGHT);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let rows = rows(&[("x", "fig"), ("fig", "x"), ("y", "fig"), ("fig", "y")]);
        let scored = score(&rows, "fig");
        let ids: Vec<usize> = scored.iter().map(|e| e.id.get()).collect();
        // key matches (14) first, then value matches (12), input order within each
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }
}
