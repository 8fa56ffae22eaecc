//! Standalone HTML page listing collected articles.
//!
//! The page embeds its own stylesheet and a small script that filters the
//! cards by keyword as the reader types; it has no external dependencies.

use crate::models::Article;
use crate::utils::{ensure_writable_parent, escape_html};
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const NO_MATCH_MESSAGE: &str = "No article matches your search.";
const NOTHING_LOADED_MESSAGE: &str = "No article could be loaded. Try again later.";
const NO_SUMMARY: &str = "No summary available.";

const STYLE: &str = r#"    :root {
      color-scheme: light dark;
      --bg: #f6f6f0;
      --card-bg: rgba(255, 255, 255, 0.75);
      --accent: #2f8f83;
      --accent-soft: rgba(47, 143, 131, 0.12);
      --text: #33433f;
      --muted: #60706c;
      --shadow: 0 20px 40px rgba(15, 31, 28, 0.12);
      font-family: 'Helvetica Neue', 'Segoe UI', sans-serif;
    }
    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg) 0%, #e7efe9 100%);
      color: var(--text);
      display: flex;
      flex-direction: column;
      align-items: center;
      padding: 4rem 1rem 3rem;
    }
    header { max-width: 960px; width: 100%; text-align: center; margin-bottom: 2rem; }
    h1 { font-weight: 300; letter-spacing: 0.12em; text-transform: uppercase; }
    .search-wrapper {
      display: inline-flex;
      align-items: center;
      gap: 0.5rem;
      background: var(--card-bg);
      padding: 0.75rem 1rem;
      border-radius: 999px;
      box-shadow: var(--shadow);
    }
    .search-wrapper input {
      border: none;
      outline: none;
      background: transparent;
      font-size: 1rem;
      min-width: 18rem;
      color: inherit;
    }
    main {
      width: 100%;
      max-width: 960px;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 1.5rem;
    }
    article.card {
      background: var(--card-bg);
      border-radius: 24px;
      padding: 1.75rem;
      box-shadow: var(--shadow);
      display: flex;
      flex-direction: column;
      gap: 1rem;
    }
    article.card h2 { margin: 0; font-size: 1.35rem; font-weight: 400; }
    article.card a { color: var(--accent); text-decoration: none; }
    article.card a:hover { text-decoration: underline; }
    .meta { font-size: 0.9rem; color: var(--muted); text-transform: uppercase; letter-spacing: 0.08em; }
    .empty-state {
      grid-column: 1 / -1;
      text-align: center;
      background: var(--card-bg);
      padding: 2rem;
      border-radius: 24px;
    }
    footer { margin-top: 3rem; font-size: 0.85rem; color: var(--muted); }
    @media (max-width: 600px) {
      .search-wrapper input { min-width: 12rem; }
    }
"#;

const SCRIPT: &str = r#"    const searchInput = document.getElementById('search');
    const cards = Array.from(document.querySelectorAll('article.card'));
    const emptyState = document.querySelector('.empty-state');

    function normalise(text) {
      if (!text) return '';
      let base = text.toLowerCase();
      if (base.normalize) base = base.normalize('NFD');
      return base
        .replace(/[\u0300-\u036f]/g, '')
        .replace(/[^a-z0-9\s]/g, ' ')
        .replace(/\s+/g, ' ')
        .trim();
    }

    const indexed = cards.map(card => ({
      element: card,
      keywords: normalise((card.dataset.keywords || '') + ' ' + (card.textContent || ''))
    }));

    function filterCards() {
      const query = normalise(searchInput.value || '');
      const tokens = query.split(' ').filter(Boolean);
      let visible = 0;
      indexed.forEach(item => {
        const matches = tokens.every(token => item.keywords.includes(token));
        item.element.hidden = !matches;
        if (matches) visible += 1;
      });
      if (emptyState) emptyState.hidden = indexed.length > 0 && visible !== 0;
    }

    if (searchInput) {
      searchInput.addEventListener('input', filterCards);
      searchInput.addEventListener('search', filterCards);
      filterCards();
    }
"#;

/// Render the full page.
///
/// # Arguments
///
/// * `articles` - Cards to show, in order
/// * `title` - Page title and heading, escaped here
/// * `generated_at` - Shown in the footer; callers usually pass `Local::now()`
///
/// # Returns
///
/// A complete HTML document. With no articles the empty-state message is
/// visible; otherwise it is hidden until a search matches nothing.
pub fn render_html_page(articles: &[Article], title: &str, generated_at: DateTime<Local>) -> String {
    let safe_title = escape_html(title);
    let generated = escape_html(&generated_at.format("%d %B %Y at %H:%M").to_string());

    let cards = articles.iter().map(render_card).collect::<Vec<_>>().join("\n");
    let (empty_attrs, empty_message) = if articles.is_empty() {
        ("", NOTHING_LOADED_MESSAGE)
    } else {
        (" hidden", NO_MATCH_MESSAGE)
    };

    let mut page = String::with_capacity(STYLE.len() + SCRIPT.len() + cards.len() + 1024);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("  <meta charset=\"utf-8\">\n");
    page.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str(&format!("  <title>{safe_title}</title>\n"));
    page.push_str("  <style>\n");
    page.push_str(STYLE);
    page.push_str("  </style>\n</head>\n<body>\n  <header>\n");
    page.push_str(&format!("    <h1>{safe_title}</h1>\n"));
    page.push_str("    <div class=\"search-wrapper\">\n");
    page.push_str(
        "      <input id=\"search\" type=\"search\" placeholder=\"Type keywords...\" aria-label=\"Filter articles\">\n",
    );
    page.push_str("    </div>\n  </header>\n  <main id=\"articles\">\n");
    if !cards.is_empty() {
        page.push_str(&cards);
        page.push('\n');
    }
    page.push_str(&format!(
        "    <p class=\"empty-state\"{empty_attrs}>{}</p>\n",
        escape_html(empty_message)
    ));
    page.push_str("  </main>\n");
    page.push_str(&format!("  <footer>Generated on {generated}</footer>\n"));
    page.push_str("  <script>\n");
    page.push_str(SCRIPT);
    page.push_str("  </script>\n</body>\n</html>\n");
    page
}

fn render_card(article: &Article) -> String {
    let keywords = [article.title(), article.summary(), article.date().unwrap_or(""), article.url()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut card = format!(
        "    <article class=\"card\" data-keywords=\"{}\">\n      <h2><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></h2>\n",
        escape_html(&keywords),
        escape_html(article.url()),
        escape_html(article.title()),
    );
    if let Some(date) = article.date() {
        card.push_str(&format!("      <p class=\"meta\">{}</p>\n", escape_html(date)));
    }
    if article.summary().is_empty() {
        card.push_str(&format!("      <p class=\"meta\">{NO_SUMMARY}</p>\n"));
    } else {
        card.push_str(&format!("      <p>{}</p>\n", escape_html(article.summary())));
    }
    card.push_str("    </article>");
    card
}

/// Write a rendered page to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_html_page(path: &Path, html: &str) -> Result<(), Box<dyn Error>> {
    ensure_writable_parent(path).await?;
    fs::write(path, html).await?;
    info!(bytes = html.len(), "Wrote HTML page");
    Ok(())
}
