use crate::content::resolve_action;
use crate::filter::visible_items;
use crate::loader::{HttpFetcher, TextFetcher, load_glossary};
use crate::model::{Category, CategorySelector, ViewState, VocabularyItem};
use crate::panel::{PanelContent, PanelController, PanelState};
use crate::search::{SearchConfig, SearchHit, hit_ids, search};
use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::info;

type SharedState = Arc<AppState>;

pub struct AppState {
    pub items: Vec<VocabularyItem>,
    pub search: SearchConfig,
    pub fetcher: Arc<dyn TextFetcher>,
    pub theme: WebTheme,
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum WebTheme {
    #[default]
    Tailwind,
    Bootstrap,
}

impl fmt::Display for WebTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebTheme::Tailwind => write!(f, "tailwind"),
            WebTheme::Bootstrap => write!(f, "bootstrap"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Chrome {
    use_tailwind: bool,
    use_bootstrap: bool,
    body_class: &'static str,
    main_class: &'static str,
    shell_class: &'static str,
    eyebrow_class: &'static str,
    headline_class: &'static str,
    lede_class: &'static str,
    grid_class: &'static str,
    card_class: &'static str,
    card_title_class: &'static str,
    card_body_class: &'static str,
    chip_class: &'static str,
    chip_active_class: &'static str,
    button_class: &'static str,
    notice_class: &'static str,
}

impl Chrome {
    fn new(theme: WebTheme) -> Self {
        match theme {
            WebTheme::Tailwind => Self {
                use_tailwind: true,
                use_bootstrap: false,
                body_class: "bg-slate-50 text-slate-900",
                main_class: "min-h-screen flex flex-col items-center justify-start py-10 px-4",
                shell_class: "max-w-5xl w-full space-y-6",
                eyebrow_class: "uppercase tracking-wide text-sm text-slate-500",
                headline_class: "text-4xl font-extrabold tracking-tight",
                lede_class: "text-lg text-slate-600",
                grid_class: "grid gap-4 md:grid-cols-3",
                card_class: "block bg-white rounded shadow hover:shadow-md transition overflow-hidden",
                card_title_class: "bg-slate-900 text-white font-semibold px-4 py-3",
                card_body_class: "px-4 py-3 text-sm text-slate-600",
                chip_class: "px-3 py-1 rounded-full bg-slate-200 text-slate-700 hover:bg-slate-300",
                chip_active_class: "px-3 py-1 rounded-full bg-slate-900 text-white",
                button_class: "inline-flex items-center rounded-md bg-slate-900 px-4 py-2 text-white font-semibold shadow hover:bg-slate-800 transition-colors",
                notice_class: "bg-white rounded shadow p-6 text-slate-500",
            },
            WebTheme::Bootstrap => Self {
                use_tailwind: false,
                use_bootstrap: true,
                body_class: "bg-light text-dark",
                main_class: "container py-5",
                shell_class: "mx-auto col-lg-10",
                eyebrow_class: "text-uppercase text-muted mb-2",
                headline_class: "display-5 fw-bold",
                lede_class: "lead mb-4",
                grid_class: "row row-cols-1 row-cols-md-3 g-3",
                card_class: "card h-100 text-decoration-none",
                card_title_class: "card-header bg-dark text-white fw-semibold",
                card_body_class: "card-body text-muted small",
                chip_class: "badge rounded-pill text-bg-secondary",
                chip_active_class: "badge rounded-pill text-bg-dark",
                button_class: "btn btn-primary px-4 py-2",
                notice_class: "alert alert-secondary",
            },
        }
    }
}

#[derive(Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub data_url: Option<String>,
    pub theme: WebTheme,
    pub base_url: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_url: None,
            theme: WebTheme::default(),
            base_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

pub async fn serve(config: WebConfig) -> Result<(), WebError> {
    let fetcher: Arc<dyn TextFetcher> = Arc::new(HttpFetcher::new());
    let items = load_glossary(fetcher.as_ref(), config.data_url.as_deref()).await;
    let state = Arc::new(AppState {
        items,
        search: SearchConfig::default(),
        fetcher,
        theme: config.theme,
        base_url: config.base_url.clone(),
    });
    let router = build_router(state);
    info!(
        %config.addr,
        theme = ?config.theme,
        base = %config.base_url,
        "Binding HTTP listener"
    );
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(grid_html))
        .route("/term", get(term_html))
        .route("/api/items", get(api_items))
        .route("/api/search", get(api_search))
        .route("/api/term", get(api_term))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "glossdeck-web" }))
}

#[derive(Debug, Deserialize)]
struct GridParams {
    category: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TermParams {
    id: Option<String>,
}

fn view_state(params: &GridParams) -> ViewState {
    ViewState {
        selector: CategorySelector::parse(params.category.as_deref().unwrap_or("all")),
        query: params.q.as_deref().unwrap_or("").trim().to_string(),
    }
}

fn grid_rows<'a>(state: &'a AppState, view: &ViewState) -> Vec<&'a VocabularyItem> {
    let ids = search(&state.items, &view.query, &state.search).map(|hits| hit_ids(&hits));
    visible_items(&state.items, &view.selector, ids.as_ref())
}

async fn grid_html(
    State(state): State<SharedState>,
    Query(params): Query<GridParams>,
) -> impl IntoResponse {
    let view = view_state(&params);
    let cards = grid_rows(&state, &view)
        .into_iter()
        .map(|item| CardView {
            title: item.title.clone(),
            description: item.description.clone(),
            href: term_path(&item.id),
        })
        .collect::<Vec<_>>();
    let filters = category_filters(&view.selector, &view.query);
    let template = GridTemplate {
        chrome: Chrome::new(state.theme),
        selector: view.selector.to_string(),
        query: view.query.clone(),
        total: state.items.len(),
        cards,
        filters,
    };
    Html(
        template
            .render()
            .unwrap_or_else(|err| render_error_page(state.theme, err.to_string())),
    )
}

async fn term_html(
    State(state): State<SharedState>,
    Query(params): Query<TermParams>,
) -> impl IntoResponse {
    match resolve_term(&state, &params).await {
        Ok(view) => {
            let template = TermTemplate {
                chrome: Chrome::new(state.theme),
                view,
            };
            Html(
                template
                    .render()
                    .unwrap_or_else(|err| render_error_page(state.theme, err.to_string())),
            )
        }
        Err(err) => Html(render_error_page(state.theme, err.message)),
    }
}

async fn api_items(
    State(state): State<SharedState>,
    Query(params): Query<GridParams>,
) -> Json<ItemsPayload> {
    let view = view_state(&params);
    let rows = grid_rows(&state, &view);
    Json(ItemsPayload {
        category: view.selector.to_string(),
        query: view.query,
        count: rows.len(),
        items: rows.into_iter().cloned().collect(),
    })
}

async fn api_search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponsePayload>, ApiError> {
    let query = params
        .q
        .as_ref()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter `q` is required"))?;
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let mut results = search(&state.items, query, &state.search).unwrap_or_default();
    results.truncate(limit);
    Ok(Json(SearchResponsePayload {
        query: query.to_string(),
        limit,
        results,
    }))
}

async fn api_term(
    State(state): State<SharedState>,
    Query(params): Query<TermParams>,
) -> Result<Json<TermPayload>, ApiError> {
    let view = resolve_term(&state, &params).await?;
    Ok(Json(TermPayload::from_view(&view)))
}

/// Drives one open/resolve cycle of the panel controller for the requested id.
async fn resolve_term(state: &AppState, params: &TermParams) -> Result<TermView, ApiError> {
    let id = params
        .id
        .as_ref()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter `id` is required"))?;
    let item = state
        .items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| ApiError::not_found(format!("No vocabulary item found with id {id:?}")))?;

    let mut panel = PanelController::new();
    let ticket = panel.open(item);
    let content = resolve_action(state.fetcher.as_ref(), ticket.action).await;
    panel.resolve(ticket.token, content);
    let PanelState::Shown { content, .. } = panel.state() else {
        return Err(ApiError::not_found(format!(
            "Content for {id:?} did not resolve"
        )));
    };
    Ok(TermView::new(item, content.clone(), panel.hash()))
}

#[derive(Debug, Clone)]
struct CardView {
    title: String,
    description: String,
    href: String,
}

#[derive(Debug, Clone)]
struct FilterLink {
    label: String,
    href: String,
    active: bool,
}

fn category_filters(selector: &CategorySelector, query: &str) -> Vec<FilterLink> {
    let mut links = vec![FilterLink {
        label: "All".to_string(),
        href: grid_path("all", query),
        active: *selector == CategorySelector::All,
    }];
    for category in Category::ALL {
        links.push(FilterLink {
            label: category.label().to_string(),
            href: grid_path(category.slug(), query),
            active: *selector == CategorySelector::Canonical(*category),
        });
    }
    links
}

#[derive(Debug, Clone)]
struct TermView {
    id: String,
    title: String,
    description: String,
    hash: String,
    /// Panel body for the Rendered and Inline outcomes; injected unescaped.
    body_html: Option<String>,
    no_content: bool,
    error: Option<TermErrorView>,
}

#[derive(Debug, Clone)]
struct TermErrorView {
    message: String,
    attempted_path: String,
}

impl TermView {
    fn new(item: &VocabularyItem, content: PanelContent, hash: Option<&str>) -> Self {
        let mut view = Self {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            hash: hash.map(|h| format!("#{h}")).unwrap_or_default(),
            body_html: None,
            no_content: false,
            error: None,
        };
        match content {
            PanelContent::Rendered(html) | PanelContent::Inline(html) => {
                view.body_html = Some(html);
            }
            PanelContent::Missing => view.no_content = true,
            PanelContent::Failed {
                message,
                attempted_path,
            } => {
                view.error = Some(TermErrorView {
                    message,
                    attempted_path,
                });
            }
        }
        view
    }
}

#[derive(Debug, Clone, Serialize)]
struct ItemsPayload {
    category: String,
    query: String,
    count: usize,
    items: Vec<VocabularyItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchResponsePayload {
    query: String,
    limit: usize,
    results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
struct TermPayload {
    id: String,
    title: String,
    hash: String,
    state: &'static str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempted_path: Option<String>,
}

impl TermPayload {
    fn from_view(view: &TermView) -> Self {
        let kind = if view.no_content {
            "missing"
        } else if view.error.is_some() {
            "failed"
        } else {
            "content"
        };
        Self {
            id: view.id.clone(),
            title: view.title.clone(),
            hash: view.hash.clone(),
            state: "shown",
            kind,
            html: view.body_html.clone(),
            error: view.error.as_ref().map(|err| err.message.clone()),
            attempted_path: view.error.as_ref().map(|err| err.attempted_path.clone()),
        }
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn term_path(id: &str) -> String {
    // The fragment keeps the open item id visible in the address bar, matching
    // the hash contract of the panel controller.
    let encoded = encode_component(id);
    format!("/term?id={encoded}#{encoded}")
}

fn grid_path(category: &str, query: &str) -> String {
    if query.is_empty() {
        format!("/?category={}", encode_component(category))
    } else {
        format!(
            "/?category={}&q={}",
            encode_component(category),
            encode_component(query)
        )
    }
}

fn render_error_page(theme: WebTheme, message: impl Into<String>) -> String {
    let chrome = Chrome::new(theme);
    let (css_tag, js_tag) = theme_tags(theme);
    let message = message.into();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Glossdeck • Error</title>
    {css_tag}
    {js_tag}
  </head>
  <body class="{body_class}">
    <main class="{main_class}">
      <div class="{shell_class}">
        <h1 class="{headline_class}">Something went wrong</h1>
        <p class="{lede_class}">{message}</p>
        <a href="/" class="{button_class}">Back to the glossary</a>
      </div>
    </main>
  </body>
</html>"#,
        css_tag = css_tag,
        js_tag = js_tag,
        body_class = chrome.body_class,
        main_class = chrome.main_class,
        shell_class = chrome.shell_class,
        headline_class = chrome.headline_class,
        lede_class = chrome.lede_class,
        button_class = chrome.button_class,
        message = message,
    )
}

fn theme_tags(theme: WebTheme) -> (&'static str, &'static str) {
    match theme {
        WebTheme::Tailwind => (
            r#"<script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>"#,
            "",
        ),
        WebTheme::Bootstrap => (
            r#"<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-sRIl4kxILFvY47J16cr9ZwB07vP4J8+LH7qKQnuqkuIAvNWLzeN8tE5YBujZqJLB" crossorigin="anonymous">"#,
            r#"<script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/js/bootstrap.bundle.min.js" integrity="sha384-FKyoEForCGlyvwx9Hj09JcYn3nv7wiPVlz7YYwJrWVcXK/BmnVDxM+D2scQbITxI" crossorigin="anonymous"></script>"#,
        ),
    }
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Glossdeck • Vocabulary</title>
    {% if chrome.use_tailwind %}
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    {% endif %}
    {% if chrome.use_bootstrap %}
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-sRIl4kxILFvY47J16cr9ZwB07vP4J8+LH7qKQnuqkuIAvNWLzeN8tE5YBujZqJLB" crossorigin="anonymous">
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/js/bootstrap.bundle.min.js" integrity="sha384-FKyoEForCGlyvwx9Hj09JcYn3nv7wiPVlz7YYwJrWVcXK/BmnVDxM+D2scQbITxI" crossorigin="anonymous"></script>
    {% endif %}
  </head>
  <body class="{{ chrome.body_class }}">
    <main class="{{ chrome.main_class }}">
      <div class="{{ chrome.shell_class }} space-y-6">
        <div>
          <p class="{{ chrome.eyebrow_class }}">{{ total }} terms • category: {{ selector }}</p>
          <h1 class="{{ chrome.headline_class }}">Web3 vocabulary</h1>
          <p class="{{ chrome.lede_class }}">Browse the glossary, filter by category, or search across titles and descriptions.</p>
        </div>

        <form method="get" action="/" class="flex gap-2 d-flex">
          <input type="hidden" name="category" value="{{ selector }}" />
          <input type="search" name="q" value="{{ query }}" placeholder="Search terms…"
                 class="flex-1 rounded border border-slate-300 px-3 py-2 form-control" />
          <button type="submit" class="{{ chrome.button_class }}">Search</button>
        </form>

        <nav class="flex flex-wrap gap-2 d-flex" aria-label="Category filter">
          {% for link in filters %}
          {% if link.active %}
          <a href="{{ link.href }}" class="{{ chrome.chip_active_class }}">{{ link.label }}</a>
          {% else %}
          <a href="{{ link.href }}" class="{{ chrome.chip_class }}">{{ link.label }}</a>
          {% endif %}
          {% endfor %}
        </nav>

        {% if cards.len() == 0 %}
        <div class="{{ chrome.notice_class }}" role="alert">No matching vocabulary found</div>
        {% else %}
        <div class="{{ chrome.grid_class }}">
          {% for card in cards %}
          <a href="{{ card.href }}" class="{{ chrome.card_class }}">
            <div class="{{ chrome.card_title_class }}">{{ card.title }}</div>
            <div class="{{ chrome.card_body_class }}">{{ card.description }}</div>
          </a>
          {% endfor %}
        </div>
        {% endif %}
      </div>
    </main>
  </body>
</html>"#,
    ext = "html"
)]
struct GridTemplate {
    chrome: Chrome,
    selector: String,
    query: String,
    total: usize,
    cards: Vec<CardView>,
    filters: Vec<FilterLink>,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Glossdeck • {{ view.title }}</title>
    {% if chrome.use_tailwind %}
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    {% endif %}
    {% if chrome.use_bootstrap %}
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-sRIl4kxILFvY47J16cr9ZwB07vP4J8+LH7qKQnuqkuIAvNWLzeN8tE5YBujZqJLB" crossorigin="anonymous">
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/js/bootstrap.bundle.min.js" integrity="sha384-FKyoEForCGlyvwx9Hj09JcYn3nv7wiPVlz7YYwJrWVcXK/BmnVDxM+D2scQbITxI" crossorigin="anonymous"></script>
    {% endif %}
  </head>
  <body class="{{ chrome.body_class }}">
    <main class="{{ chrome.main_class }}">
      <div class="{{ chrome.shell_class }} space-y-6">
        <div>
          <p class="{{ chrome.eyebrow_class }}">{{ view.id }}{{ view.hash }}</p>
          <h1 class="{{ chrome.headline_class }}">{{ view.title }}</h1>
          <p class="{{ chrome.lede_class }}">{{ view.description }}</p>
        </div>

        {% if view.body_html.is_some() %}
        <section class="bg-white shadow rounded p-4 prose prose-slate max-w-none card card-body">
          {{ view.body_html.as_ref().unwrap()|safe }}
        </section>
        {% endif %}

        {% if view.no_content %}
        <div class="{{ chrome.notice_class }}" role="status">
          <p>No detailed content available for this term.</p>
        </div>
        {% endif %}

        {% if view.error.is_some() %}
        <div class="{{ chrome.notice_class }}" role="alert">
          <p>Sorry, there was an error loading the content: {{ view.error.as_ref().unwrap().message }}</p>
          <p>Please try again later.</p>
          <p><strong>Technical details:</strong></p>
          <pre>{{ view.error.as_ref().unwrap().message }}
Path attempted: {{ view.error.as_ref().unwrap().attempted_path }}</pre>
        </div>
        {% endif %}

        <a href="/" class="{{ chrome.button_class }}">Close</a>
      </div>
    </main>
  </body>
</html>"#,
    ext = "html"
)]
struct TermTemplate {
    chrome: Chrome,
    view: TermView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_support::FixedFetcher;
    use crate::loader::{FetchError, fallback_items};
    use axum::{body, body::Body, http::Request};
    use tower::ServiceExt;

    fn test_state(fetch: Result<String, FetchError>) -> SharedState {
        Arc::new(AppState {
            items: fallback_items().to_vec(),
            search: SearchConfig::default(),
            fetcher: Arc::new(FixedFetcher(fetch)),
            theme: WebTheme::Tailwind,
            base_url: "http://127.0.0.1:8080".to_string(),
        })
    }

    fn test_router(fetch: Result<String, FetchError>) -> Router {
        build_router(test_state(fetch))
    }

    async fn get_text(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn grid_renders_one_card_per_item() {
        let router = test_router(Ok(String::new()));
        let (status, html) = get_text(router, "/").await;
        assert!(status.is_success());
        for item in fallback_items() {
            assert!(html.contains(&item.title), "missing card for {}", item.id);
        }
        assert!(!html.contains("No matching vocabulary found"));
    }

    #[tokio::test]
    async fn category_filter_collapses_localized_labels() {
        let router = test_router(Ok(String::new()));
        let (status, html) = get_text(router, "/?category=tech").await;
        assert!(status.is_success());
        // Items labeled with the localized raw category still land under tech.
        assert!(html.contains("Blockchain"));
        assert!(html.contains("Mining"));
        assert!(!html.contains("Tokenomics"));
    }

    #[tokio::test]
    async fn unmatched_search_shows_no_results_indicator() {
        let router = test_router(Ok(String::new()));
        let (status, html) = get_text(router, "/?q=zzzzxxxxyyyy").await;
        assert!(status.is_success());
        assert!(html.contains("No matching vocabulary found"));
    }

    #[tokio::test]
    async fn term_page_shows_inline_content() {
        let router = test_router(Ok(String::new()));
        let (status, html) = get_text(router, "/term?id=smart_contract").await;
        assert!(status.is_success());
        assert!(html.contains("<h1>Smart Contract</h1>"));
    }

    #[tokio::test]
    async fn term_page_renders_fetched_markdown() {
        let router = test_router(Ok("# Blockchain\n\nA shared ledger.".to_string()));
        let (status, html) = get_text(router, "/term?id=blockchain").await;
        assert!(status.is_success());
        assert!(html.contains("<h1>Blockchain</h1>"));
        assert!(html.contains("A shared ledger."));
    }

    #[tokio::test]
    async fn failed_fetch_without_inline_shows_error_details() {
        let router = test_router(Err(FetchError::Status {
            code: 404,
            reason: "Not Found".to_string(),
        }));
        let (status, html) = get_text(router, "/term?id=blockchain").await;
        assert!(status.is_success());
        assert!(html.contains("Technical details"));
        assert!(html.contains("blockchain.md"));
    }

    #[tokio::test]
    async fn unknown_term_renders_error_page() {
        let router = test_router(Ok(String::new()));
        let (status, html) = get_text(router, "/term?id=nonexistent").await;
        assert!(status.is_success());
        assert!(html.contains("Something went wrong"));
        assert!(html.contains("nonexistent"));
    }

    #[tokio::test]
    async fn api_search_returns_ranked_hits() {
        let router = test_router(Ok(String::new()));
        let response = router
            .oneshot(
                Request::get("/api/search?q=wallet&limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: SearchResponsePayload = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload.query, "wallet");
        assert!(payload.results.iter().any(|hit| hit.id == "wallet"));
    }

    #[tokio::test]
    async fn api_items_respects_category_filter() {
        let router = test_router(Ok(String::new()));
        let (status, json_text) = get_text(router, "/api/items?category=finance").await;
        assert!(status.is_success());
        let payload: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        let ids: Vec<&str> = payload["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["defi", "tokenomics"]);
    }

    #[tokio::test]
    async fn api_term_reports_missing_content_kind() {
        let state = Arc::new(AppState {
            items: vec![VocabularyItem {
                id: "bare".to_string(),
                category: "other".to_string(),
                title: "Bare".to_string(),
                description: "No content at all.".to_string(),
                content_path: None,
                content: None,
            }],
            search: SearchConfig::default(),
            fetcher: Arc::new(FixedFetcher(Ok(String::new()))),
            theme: WebTheme::Tailwind,
            base_url: "http://127.0.0.1:8080".to_string(),
        });
        let router = build_router(state);
        let (status, json_text) = get_text(router, "/api/term?id=bare").await;
        assert!(status.is_success());
        let payload: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(payload["kind"], "missing");
        assert_eq!(payload["state"], "shown");
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let router = test_router(Ok(String::new()));
        let (status, json_text) = get_text(router, "/healthz").await;
        assert!(status.is_success());
        assert!(json_text.contains("\"ok\""));
    }
}
