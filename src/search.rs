use crate::model::VocabularyItem;
use rapidfuzz::fuzz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Fuzzy-match tuning. Scores are rapidfuzz ratios on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Minimum score a match must reach to be included.
    pub score_cutoff: f64,
    /// Queries shorter than this (after trimming) impose no constraint.
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            score_cutoff: 70.0,
            min_query_chars: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
}

/// Ranks items by fuzzy similarity of the query against title and description.
///
/// Returns `None` when the query is empty or below the minimum length, which
/// callers treat as "no search constraint". Ties keep collection order.
pub fn search(
    items: &[VocabularyItem],
    query: &str,
    config: &SearchConfig,
) -> Option<Vec<SearchHit>> {
    let query = query.trim();
    if query.chars().count() < config.min_query_chars {
        return None;
    }
    let needle = query.to_lowercase();
    let mut hits: Vec<SearchHit> = items
        .iter()
        .filter_map(|item| {
            let score = item_score(&needle, item);
            (score >= config.score_cutoff).then(|| SearchHit {
                id: item.id.clone(),
                score,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Some(hits)
}

/// Collapses ranked hits into the membership set the filter engine consumes.
pub fn hit_ids(hits: &[SearchHit]) -> HashSet<String> {
    hits.iter().map(|hit| hit.id.clone()).collect()
}

fn item_score(needle: &str, item: &VocabularyItem) -> f64 {
    let title = item.title.to_lowercase();
    let description = item.description.to_lowercase();
    let title_score = fuzz::ratio(needle.chars(), title.chars());
    let description_score = fuzz::ratio(needle.chars(), description.chars());
    title_score.max(description_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, description: &str) -> VocabularyItem {
        VocabularyItem {
            id: id.to_string(),
            category: "tech".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content_path: None,
            content: None,
        }
    }

    fn sample() -> Vec<VocabularyItem> {
        vec![
            item("blockchain", "Blockchain", "A distributed digital ledger."),
            item("wallet", "Wallet", "Stores private keys for digital assets."),
            item("dao", "DAO", "Organization governed by token holders."),
        ]
    }

    #[test]
    fn empty_query_means_no_constraint() {
        assert!(search(&sample(), "", &SearchConfig::default()).is_none());
        assert!(search(&sample(), "   ", &SearchConfig::default()).is_none());
    }

    #[test]
    fn single_char_query_is_below_minimum_length() {
        assert!(search(&sample(), "b", &SearchConfig::default()).is_none());
    }

    #[test]
    fn exact_title_ranks_first() {
        let hits = search(&sample(), "wallet", &SearchConfig::default()).unwrap();
        assert_eq!(hits[0].id, "wallet");
        assert!(hits[0].score >= 99.0);
    }

    #[test]
    fn typo_still_matches() {
        let hits = search(&sample(), "blockchan", &SearchConfig::default()).unwrap();
        assert!(hits.iter().any(|hit| hit.id == "blockchain"));
    }

    #[test]
    fn description_text_is_searched_too() {
        let hits = search(&sample(), "private keys", &SearchConfig::default()).unwrap();
        assert!(hits.iter().any(|hit| hit.id == "wallet"));
    }

    #[test]
    fn unrelated_query_yields_empty_ranked_set() {
        let hits = search(&sample(), "zzzzqqqq", &SearchConfig::default()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn hit_ids_builds_membership_set() {
        let hits = search(&sample(), "wallet", &SearchConfig::default()).unwrap();
        let ids = hit_ids(&hits);
        assert!(ids.contains("wallet"));
    }
}
