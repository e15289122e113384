use crate::loader::TextFetcher;
use crate::panel::{OpenAction, PanelContent};
use markdown::{Options as MarkdownOptions, to_html_with_options};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Short deliberate pause before revealing inline content, so instant panels
/// still read as having loaded.
pub const INLINE_REVEAL_DELAY: Duration = Duration::from_millis(300);

/// Carries out the fetch/fallback policy for an open action.
///
/// Every outcome is displayable: remote Markdown renders to HTML, a failed
/// fetch degrades to inline content when the item has any, and the remaining
/// cases surface an error panel or the "no content" notice. Nothing here is
/// fatal and nothing retries.
pub async fn resolve_action<F>(fetcher: &F, action: OpenAction) -> PanelContent
where
    F: TextFetcher + ?Sized,
{
    match action {
        OpenAction::FetchRemote {
            path,
            inline_fallback,
        } => match fetcher.fetch_text(&path).await {
            Ok(markdown_text) => PanelContent::Rendered(render_markdown(&markdown_text)),
            Err(err) => {
                warn!(path, error = %err, "Content fetch failed");
                match inline_fallback {
                    Some(inline) => PanelContent::Inline(inline),
                    None => PanelContent::Failed {
                        message: err.to_string(),
                        attempted_path: path,
                    },
                }
            }
        },
        OpenAction::UseInline(inline) => {
            sleep(INLINE_REVEAL_DELAY).await;
            PanelContent::Inline(inline)
        }
        OpenAction::Nothing => PanelContent::Missing,
    }
}

fn markdown_options() -> MarkdownOptions {
    let mut options = MarkdownOptions::gfm();
    // Glossary entries embed trusted HTML (headings, tables, iframes), so allow it through.
    options.compile.allow_dangerous_html = true;
    options.compile.allow_dangerous_protocol = true;
    options.compile.gfm_tagfilter = false;
    options
}

/// Converts Markdown to HTML; if the converter rejects the input, the raw text
/// is wrapped verbatim in a preformatted block instead.
pub fn render_markdown(input: &str) -> String {
    let trimmed = input.trim();
    let options = markdown_options();
    to_html_with_options(trimmed, &options)
        .unwrap_or_else(|_| format!("<pre>{}</pre>", html_escape(trimmed)))
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
