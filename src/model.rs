use serde::{Deserialize, Serialize};
use std::fmt;

/// One glossary entry. The collection is loaded once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyItem {
    pub id: String,
    /// Raw category label as it appears in the data. Legacy and localized
    /// labels are collapsed to a canonical [`Category`] by the synonym table.
    #[serde(rename = "type")]
    pub category: String,
    pub title: String,
    pub description: String,
    /// URL of a Markdown document with the full entry text.
    #[serde(
        rename = "contentPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_path: Option<String>,
    /// Inline HTML used when no remote document exists, or as a fallback when
    /// fetching one fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl VocabularyItem {
    pub fn canonical_category(&self) -> Option<Category> {
        Category::from_label(&self.category)
    }
}

/// Canonical grouping label for the category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tech,
    Finance,
    WalletIdentity,
    NftMetaverse,
    Governance,
    Other,
}

/// Accepted raw labels per canonical category. Several legacy and localized
/// spellings occur in real data; anything absent here falls through to exact
/// string matching in [`CategorySelector`].
pub const CATEGORY_SYNONYMS: &[(Category, &[&str])] = &[
    (Category::Tech, &["tech", "技术", "Technology"]),
    (Category::Finance, &["finance", "金融"]),
    (Category::WalletIdentity, &["wallet_identity", "钱包与身份"]),
    (
        Category::NftMetaverse,
        &["nft_metaverse", "NFT与游戏", "NFT与元宇宙"],
    ),
    (Category::Governance, &["governance", "治理"]),
    (Category::Other, &["other", "其他"]),
];

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Tech,
        Category::Finance,
        Category::WalletIdentity,
        Category::NftMetaverse,
        Category::Governance,
        Category::Other,
    ];

    /// Stable identifier used in selector values and query strings.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Finance => "finance",
            Category::WalletIdentity => "wallet_identity",
            Category::NftMetaverse => "nft_metaverse",
            Category::Governance => "governance",
            Category::Other => "other",
        }
    }

    /// Human-readable label for menus and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tech => "Technology",
            Category::Finance => "Finance",
            Category::WalletIdentity => "Wallet & Identity",
            Category::NftMetaverse => "NFT & Metaverse",
            Category::Governance => "Governance",
            Category::Other => "Other",
        }
    }

    fn synonyms(&self) -> &'static [&'static str] {
        CATEGORY_SYNONYMS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, labels)| *labels)
            .unwrap_or(&[])
    }

    /// Resolves a raw data label to its canonical category.
    pub fn from_label(label: &str) -> Option<Category> {
        CATEGORY_SYNONYMS
            .iter()
            .find(|(_, labels)| labels.contains(&label))
            .map(|(category, _)| *category)
    }

    pub fn from_slug(slug: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .find(|category| category.slug() == slug)
            .copied()
    }

    pub fn matches_label(&self, label: &str) -> bool {
        self.synonyms().contains(&label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Parsed category selector value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    All,
    Canonical(Category),
    /// Selector value with no synonym-table entry; matched exactly against the
    /// raw label.
    Exact(String),
}

impl CategorySelector {
    pub fn parse(value: &str) -> CategorySelector {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "all" {
            return CategorySelector::All;
        }
        match Category::from_slug(trimmed) {
            Some(category) => CategorySelector::Canonical(category),
            None => CategorySelector::Exact(trimmed.to_string()),
        }
    }

    pub fn matches(&self, item: &VocabularyItem) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Canonical(category) => category.matches_label(&item.category),
            CategorySelector::Exact(label) => item.category == *label,
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::All => f.write_str("all"),
            CategorySelector::Canonical(category) => f.write_str(category.slug()),
            CategorySelector::Exact(label) => f.write_str(label),
        }
    }
}

/// Current filter state, passed explicitly to the filter engine instead of
/// living as ambient module state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selector: CategorySelector,
    pub query: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selector: CategorySelector::All,
            query: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn localized_labels_resolve_to_one_category() {
        assert_eq!(Category::from_label("技术"), Some(Category::Tech));
        assert_eq!(Category::from_label("Technology"), Some(Category::Tech));
        assert_eq!(Category::from_label("tech"), Some(Category::Tech));
        assert_eq!(Category::from_label("NFT与游戏"), Some(Category::NftMetaverse));
        assert_eq!(Category::from_label("made_up"), None);
    }

    #[test]
    fn selector_parse_covers_all_canonical_and_exact() {
        assert_eq!(CategorySelector::parse("all"), CategorySelector::All);
        assert_eq!(CategorySelector::parse(""), CategorySelector::All);
        assert_eq!(
            CategorySelector::parse("finance"),
            CategorySelector::Canonical(Category::Finance)
        );
        assert_eq!(
            CategorySelector::parse("layer2"),
            CategorySelector::Exact("layer2".to_string())
        );
    }

    #[test]
    fn exact_selector_matches_raw_label_only() {
        let selector = CategorySelector::parse("layer2");
        assert!(selector.matches(&item("rollup", "layer2")));
        assert!(!selector.matches(&item("defi", "金融")));
    }

    #[test]
    fn canonical_selector_accepts_every_synonym() {
        let selector = CategorySelector::parse("tech");
        assert!(selector.matches(&item("a", "tech")));
        assert!(selector.matches(&item("b", "技术")));
        assert!(selector.matches(&item("c", "Technology")));
        assert!(!selector.matches(&item("d", "金融")));
    }

    #[test]
    fn item_json_round_trips_original_field_names() {
        let json = r#"{
            "id": "defi",
            "type": "金融",
            "title": "DeFi",
            "description": "Decentralized finance.",
            "contentPath": "https://example.com/defi.md"
        }"#;
        let item: VocabularyItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, "金融");
        assert_eq!(item.content_path.as_deref(), Some("https://example.com/defi.md"));
        assert_eq!(item.canonical_category(), Some(Category::Finance));
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["type"], "金融");
        assert!(back.get("content").is_none());
    }
}
