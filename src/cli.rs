use std::cmp;
use std::error::Error;
use std::net::SocketAddr;

use atty::Stream;
use clap::{Parser, Subcommand, ValueEnum};
use glossdeck::content::resolve_action;
use glossdeck::filter::visible_items;
use glossdeck::loader::{HttpFetcher, load_glossary};
use glossdeck::model::{CategorySelector, VocabularyItem};
use glossdeck::panel::{PanelContent, PanelController, PanelState};
use glossdeck::search::{SearchConfig, search};
use glossdeck::web::{WebConfig, WebTheme, serve};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glossdeck", about = "Browse the glossary from the terminal or serve it over HTTP", version)]
pub struct Cli {
    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Remote JSON collection to load instead of the built-in fallback.
    #[arg(long, global = true)]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Operations on vocabulary terms.
    #[command(subcommand)]
    Term(TermCommand),
    /// Run the web viewer.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
        /// CSS framework for the rendered pages.
        #[arg(long, value_enum, default_value_t = ThemeArg::Tailwind)]
        theme: ThemeArg,
        /// Public base URL used in links.
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        base_url: String,
    },
}

#[derive(Subcommand, Debug)]
enum TermCommand {
    /// List visible terms, optionally filtered by category.
    List {
        /// Category selector ("all", a canonical slug, or a raw label).
        #[arg(short, long, default_value = "all")]
        category: String,
    },
    /// Fuzzy-search titles and descriptions.
    Search {
        /// Query text.
        query: String,
        /// Maximum number of matches to return.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Resolve and display the detail content for one term.
    Show {
        /// Term id.
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Tailwind,
    Bootstrap,
}

impl From<ThemeArg> for WebTheme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Tailwind => WebTheme::Tailwind,
            ThemeArg::Bootstrap => WebTheme::Bootstrap,
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Command::Serve {
            addr,
            theme,
            base_url,
        } => handle_serve(addr, theme.into(), base_url, cli.data_url),
        Command::Term(TermCommand::List { category }) => {
            handle_list(category, cli.data_url, cli.json)
        }
        Command::Term(TermCommand::Search { query, limit }) => {
            handle_search(query, limit, cli.data_url, cli.json)
        }
        Command::Term(TermCommand::Show { id }) => handle_show(id, cli.data_url, cli.json),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn load_items(data_url: Option<&str>) -> Result<Vec<VocabularyItem>, Box<dyn Error>> {
    let fetcher = HttpFetcher::new();
    Ok(runtime()?.block_on(load_glossary(&fetcher, data_url)))
}

fn handle_serve(
    addr: SocketAddr,
    theme: WebTheme,
    base_url: String,
    data_url: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let config = WebConfig {
        addr,
        data_url,
        theme,
        base_url,
    };
    runtime()?.block_on(serve(config))?;
    Ok(())
}

fn handle_list(
    category: String,
    data_url: Option<String>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let items = load_items(data_url.as_deref())?;
    let selector = CategorySelector::parse(&category);
    let visible = visible_items(&items, &selector, None);

    if as_json {
        let payload = json!({
            "category": selector.to_string(),
            "count": visible.len(),
            "items": visible,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_item_table(&selector.to_string(), &visible);
    }
    Ok(())
}

fn handle_search(
    query: String,
    limit: usize,
    data_url: Option<String>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    if query.trim().is_empty() {
        return Err("Search query cannot be empty".into());
    }
    let items = load_items(data_url.as_deref())?;
    let limit = cmp::max(1, limit);
    let mut hits = search(&items, &query, &SearchConfig::default()).unwrap_or_default();
    hits.truncate(limit);

    if as_json {
        let payload = json!({
            "query": query,
            "limit": limit,
            "results": hits,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if hits.is_empty() {
        println!("No terms matched \"{query}\".");
    } else {
        println!("Matches for \"{query}\":");
        let width = hits
            .iter()
            .map(|hit| hit.id.len())
            .max()
            .unwrap_or(4)
            .max("ID".len());
        println!("{:<width$}  {}", "ID", "SCORE", width = width);
        println!("{:-<width$}  {}", "", "------", width = width);
        for hit in &hits {
            println!("{:<width$}  {:.1}", hit.id, hit.score, width = width);
        }
    }
    Ok(())
}

fn handle_show(id: String, data_url: Option<String>, as_json: bool) -> Result<(), Box<dyn Error>> {
    let items = load_items(data_url.as_deref())?;
    let item = items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| format!("No vocabulary item found with id {id:?}"))?;

    let mut panel = PanelController::new();
    let ticket = panel.open(item);
    let fetcher = HttpFetcher::new();
    let content = runtime()?.block_on(resolve_action(&fetcher, ticket.action));
    panel.resolve(ticket.token, content);
    let PanelState::Shown { content, .. } = panel.state() else {
        return Err(format!("Content for {id:?} did not resolve").into());
    };

    if as_json {
        let payload = json!({
            "id": item.id,
            "title": item.title,
            "type": item.category,
            "description": item.description,
            "content": content_json(content),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_term(item, content);
    }
    Ok(())
}

fn content_json(content: &PanelContent) -> serde_json::Value {
    match content {
        PanelContent::Rendered(html) => json!({ "kind": "rendered", "html": html }),
        PanelContent::Inline(html) => json!({ "kind": "inline", "html": html }),
        PanelContent::Missing => json!({ "kind": "missing" }),
        PanelContent::Failed {
            message,
            attempted_path,
        } => json!({ "kind": "failed", "message": message, "attempted_path": attempted_path }),
    }
}

fn print_item_table(category: &str, rows: &[&VocabularyItem]) {
    if rows.is_empty() {
        println!("No matching vocabulary found for category \"{category}\".");
        return;
    }
    let width = rows
        .iter()
        .map(|item| item.id.len())
        .max()
        .unwrap_or(4)
        .max("ID".len());
    println!("{:<width$}  {:<20}  {}", "ID", "CATEGORY", "TITLE", width = width);
    println!("{:-<width$}  {:-<20}  {}", "", "", "-----", width = width);
    for item in rows {
        println!(
            "{:<width$}  {:<20}  {}",
            item.id,
            item.category,
            item.title,
            width = width
        );
    }
}

fn print_term(item: &VocabularyItem, content: &PanelContent) {
    println!("Term: {} ({})", item.title, item.id);
    println!("Category: {}", item.category);
    println!("\n{}", item.description);
    match content {
        PanelContent::Rendered(html) | PanelContent::Inline(html) => {
            render_markdown_block("Content", html);
        }
        PanelContent::Missing => {
            println!("\nNo detailed content available for this term.");
        }
        PanelContent::Failed {
            message,
            attempted_path,
        } => {
            println!("\nFailed to load content: {message}");
            println!("Path attempted: {attempted_path}");
        }
    }
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
