//! Ranked search over the row store
//!
//! ```text
//! rows × query ──► score() ──► Vec<ScoredEntry> ──► project() ──► DisplayOrder
//! ```
//!
//! Scoring is literal: whole-query phrase matches plus per-token counts,
//! weighted by column. There is no fuzzy matching.

mod projector;
mod scorer;

pub use projector::{project, DisplayOrder};
pub use scorer::{
    count_occurrences, normalize_query, score, ScoredEntry, KEY_TOKEN_WEIGHT, PHRASE_WEIGHT,
    VALUE_TOKEN_WEIGHT,
};
