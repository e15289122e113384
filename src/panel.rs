use crate::model::VocabularyItem;

pub type RequestToken = u64;

/// Detail panel lifecycle. `Loading` covers the window between activating a
/// card and its content resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Loading {
        item_id: String,
        token: RequestToken,
    },
    Shown {
        item_id: String,
        content: PanelContent,
    },
}

/// What the panel displays once Shown. All resolution outcomes end here; only
/// the displayed content differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// HTML converted from a fetched Markdown document.
    Rendered(String),
    /// Inline HTML from the item itself.
    Inline(String),
    /// Neither a remote path nor inline content exists.
    Missing,
    /// Remote fetch failed and no inline fallback was available.
    Failed {
        message: String,
        attempted_path: String,
    },
}

/// Work the caller must perform to finish opening an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    FetchRemote {
        path: String,
        inline_fallback: Option<String>,
    },
    /// Reveal inline content after the short deliberate delay.
    UseInline(String),
    /// Nothing to fetch; resolves straight to the "no content" notice.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTicket {
    pub token: RequestToken,
    pub action: OpenAction,
}

/// Browser-history abstraction for the URL hash: a stack of hash entries with
/// a cursor. Pushing truncates any forward entries, like `history.pushState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashHistory {
    entries: Vec<Option<String>>,
    cursor: usize,
}

impl HashHistory {
    pub fn new() -> Self {
        Self {
            entries: vec![None],
            cursor: 0,
        }
    }

    /// Current URL hash; `None` is the empty hash.
    pub fn current(&self) -> Option<&str> {
        self.entries[self.cursor].as_deref()
    }

    fn push(&mut self, hash: Option<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(hash);
        self.cursor += 1;
    }

    fn replace(&mut self, hash: Option<String>) {
        self.entries[self.cursor] = hash;
    }

    /// Moves back one entry if possible and reports whether it moved.
    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }
}

impl Default for HashHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the panel state and its URL-hash/history synchronization.
///
/// Every open hands out a fresh request token; [`PanelController::resolve`]
/// discards stale tokens, so an earlier fetch can never overwrite the content
/// of a later activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelController {
    state: PanelState,
    history: HashHistory,
    next_token: RequestToken,
    /// Whether the in-flight open should push a history entry once Shown.
    push_on_show: bool,
}

impl PanelController {
    pub fn new() -> Self {
        Self {
            state: PanelState::Closed,
            history: HashHistory::new(),
            next_token: 0,
            push_on_show: false,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Current URL hash, mirroring the open item id.
    pub fn hash(&self) -> Option<&str> {
        self.history.current()
    }

    /// User activated a card. Begins loading and hands back the work needed to
    /// resolve the panel content.
    pub fn open(&mut self, item: &VocabularyItem) -> OpenTicket {
        self.begin_open(item, true)
    }

    /// The URL hash named this item on page load. Replaces the current history
    /// entry instead of pushing a new one.
    pub fn open_via_hash(&mut self, item: &VocabularyItem) -> OpenTicket {
        self.history.replace(Some(item.id.clone()));
        self.begin_open(item, false)
    }

    fn begin_open(&mut self, item: &VocabularyItem, push_on_show: bool) -> OpenTicket {
        let token = self.next_token;
        self.next_token += 1;
        self.push_on_show = push_on_show;
        self.state = PanelState::Loading {
            item_id: item.id.clone(),
            token,
        };
        let action = match (&item.content_path, &item.content) {
            (Some(path), inline) => OpenAction::FetchRemote {
                path: path.clone(),
                inline_fallback: inline.clone(),
            },
            (None, Some(inline)) => OpenAction::UseInline(inline.clone()),
            (None, None) => OpenAction::Nothing,
        };
        OpenTicket { token, action }
    }

    /// Delivers resolved content. Returns `false` when the token is stale (a
    /// later open superseded this fetch) and the response was discarded.
    pub fn resolve(&mut self, token: RequestToken, content: PanelContent) -> bool {
        let PanelState::Loading {
            item_id,
            token: expected,
        } = &self.state
        else {
            return false;
        };
        if *expected != token {
            return false;
        }
        let item_id = item_id.clone();
        if self.push_on_show {
            self.history.push(Some(item_id.clone()));
            self.push_on_show = false;
        }
        self.state = PanelState::Shown { item_id, content };
        true
    }

    /// Explicit close action. Clears the hash with a fresh history entry.
    pub fn close(&mut self) {
        if self.state == PanelState::Closed {
            return;
        }
        self.state = PanelState::Closed;
        self.push_on_show = false;
        self.history.push(None);
    }

    /// Back navigation. Moves the history cursor and re-derives the panel
    /// state from the resulting hash: a valid item id starts a (non-pushing)
    /// load, anything else closes the panel.
    pub fn back(&mut self, items: &[VocabularyItem]) -> Option<OpenTicket> {
        if !self.history.back() {
            return None;
        }
        match self
            .history
            .current()
            .and_then(|hash| items.iter().find(|item| item.id == hash))
        {
            Some(item) => {
                let item = item.clone();
                Some(self.begin_open(&item, false))
            }
            None => {
                self.state = PanelState::Closed;
                self.push_on_show = false;
                None
            }
        }
    }
}

impl Default for PanelController {
    fn default() -> Self {
        Self::new()
    }
}
