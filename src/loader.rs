use crate::model::VocabularyItem;
use once_cell::sync::Lazy;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

static FALLBACK_JSON: &str = include_str!("../data/fallback.json");

static FALLBACK_ITEMS: Lazy<Vec<VocabularyItem>> =
    Lazy::new(|| serde_json::from_str(FALLBACK_JSON).expect("valid embedded fallback collection"));

/// Built-in collection used whenever the remote data source is missing or
/// unusable.
pub fn fallback_items() -> &'static [VocabularyItem] {
    FALLBACK_ITEMS.as_slice()
}

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;

/// Text-over-HTTP collaborator. Production uses [`HttpFetcher`]; tests inject
/// scripted implementations.
pub trait TextFetcher: Send + Sync {
    fn fetch_text<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-success HTTP status.
    Status { code: u16, reason: String },
    /// Connection, timeout, or body-read failure.
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status { code, reason } => write!(f, "HTTP error: {code} {reason}"),
            FetchError::Transport(message) => write!(f, "transport error: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|err| FetchError::Transport(err.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    code: status.as_u16(),
                    reason: status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string(),
                });
            }
            response
                .text()
                .await
                .map_err(|err| FetchError::Transport(err.to_string()))
        })
    }
}

/// Loads the vocabulary collection from a remote JSON resource.
///
/// Any network or parse failure substitutes the embedded fallback collection;
/// the viewer always starts with a usable item list.
pub async fn load_glossary<F>(fetcher: &F, url: Option<&str>) -> Vec<VocabularyItem>
where
    F: TextFetcher + ?Sized,
{
    let Some(url) = url else {
        info!(
            count = fallback_items().len(),
            "No data URL configured, using embedded fallback collection"
        );
        return fallback_items().to_vec();
    };
    match fetch_and_parse(fetcher, url).await {
        Ok(items) => {
            info!(count = items.len(), url, "Loaded vocabulary collection");
            items
        }
        Err(err) => {
            warn!(url, error = %err, "Falling back to embedded vocabulary collection");
            fallback_items().to_vec()
        }
    }
}

async fn fetch_and_parse<F>(fetcher: &F, url: &str) -> Result<Vec<VocabularyItem>, LoadError>
where
    F: TextFetcher + ?Sized,
{
    let body = fetcher.fetch_text(url).await?;
    let items = serde_json::from_str(&body)?;
    Ok(items)
}

#[derive(Debug)]
enum LoadError {
    Fetch(FetchError),
    Parse(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch(err) => write!(f, "fetch failed: {err}"),
            LoadError::Parse(err) => write!(f, "invalid vocabulary JSON: {err}"),
        }
    }
}

impl From<FetchError> for LoadError {
    fn from(value: FetchError) -> Self {
        LoadError::Fetch(value)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        LoadError::Parse(value)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Fetcher returning a fixed outcome for every URL.
    pub struct FixedFetcher(pub Result<String, FetchError>);

    impl TextFetcher for FixedFetcher {
        fn fetch_text<'a>(&'a self, _url: &'a str) -> FetchFuture<'a> {
            let outcome = self.0.clone();
            Box::pin(async move { outcome })
        }
    }
}
