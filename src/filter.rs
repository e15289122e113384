use crate::model::{CategorySelector, VocabularyItem};
use std::collections::HashSet;

/// Intersects the category selector with an optional search membership set.
///
/// Collection order is preserved; search rank never reorders the grid. An empty
/// result is the caller's cue to show the "no results" indicator instead of an
/// empty grid.
pub fn visible_items<'a>(
    items: &'a [VocabularyItem],
    selector: &CategorySelector,
    search_ids: Option<&HashSet<String>>,
) -> Vec<&'a VocabularyItem> {
    items
        .iter()
        .filter(|item| selector.matches(item))
        .filter(|item| search_ids.is_none_or(|ids| ids.contains(&item.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn item(id: &str, raw_category: &str) -> VocabularyItem {
        VocabularyItem {
            id: id.to_string(),
            category: raw_category.to_string(),
            title: id.to_string(),
            description: String::new(),
            content_path: None,
            content: None,
        }
    }

    fn sample() -> Vec<VocabularyItem> {
        vec![
            item("blockchain", "技术"),
            item("consensus", "tech"),
            item("defi", "金融"),
            item("tokenomics", "finance"),
            item("nft", "NFT与元宇宙"),
            item("rollup", "layer2"),
        ]
    }

    #[test]
    fn all_without_search_shows_every_item() {
        let items = sample();
        let visible = visible_items(&items, &CategorySelector::All, None);
        assert_eq!(visible.len(), items.len());
    }

    #[test]
    fn synonym_labels_collapse_into_one_category() {
        let items = sample();
        let visible = visible_items(
            &items,
            &CategorySelector::Canonical(Category::Tech),
            None,
        );
        let ids: Vec<&str> = visible.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["blockchain", "consensus"]);
    }

    #[test]
    fn unmapped_selector_matches_exact_label() {
        let items = sample();
        let visible = visible_items(&items, &CategorySelector::parse("layer2"), None);
        let ids: Vec<&str> = visible.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["rollup"]);
    }

    #[test]
    fn search_set_intersects_with_category() {
        let items = sample();
        let search: HashSet<String> = ["defi", "blockchain"]
            .iter()
            .map(|id| id.to_string())
            .collect();
        let visible = visible_items(
            &items,
            &CategorySelector::Canonical(Category::Finance),
            Some(&search),
        );
        let ids: Vec<&str> = visible.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["defi"]);
    }

    #[test]
    fn collection_order_is_preserved() {
        let items = sample();
        let search: HashSet<String> = ["tokenomics", "blockchain", "nft"]
            .iter()
            .map(|id| id.to_string())
            .collect();
        let visible = visible_items(&items, &CategorySelector::All, Some(&search));
        let ids: Vec<&str> = visible.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["blockchain", "tokenomics", "nft"]);
    }

    #[test]
    fn disjoint_filters_yield_empty_set() {
        let items = sample();
        let search: HashSet<String> = ["defi"].iter().map(|id| id.to_string()).collect();
        let visible = visible_items(
            &items,
            &CategorySelector::Canonical(Category::Governance),
            Some(&search),
        );
        assert!(visible.is_empty());
    }
}
