pub mod content;
pub mod filter;
pub mod loader;
pub mod model;
pub mod panel;
pub mod search;
pub mod web;

pub use model::{Category, CategorySelector, ViewState, VocabularyItem};
pub use panel::{PanelContent, PanelController, PanelState};
pub use search::SearchConfig;
