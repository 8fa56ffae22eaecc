//! Readable text of a single article page.

use crate::error::DetailParseError;
use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static CONTENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.node__content, article .node__content, div.article__body, main article")
        .expect("valid content selector")
});
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid paragraph selector"));

/// Paragraphs of the article body, separated by blank lines.
///
/// # Errors
///
/// * [`DetailParseError::ContentNotFound`] when no content node exists.
/// * [`DetailParseError::EmptyBody`] when it has no non-empty paragraph.
pub fn parse_article_detail(markup: &str) -> Result<String, DetailParseError> {
    let document = Html::parse_document(markup);
    let content = document
        .select(&CONTENT)
        .next()
        .ok_or(DetailParseError::ContentNotFound)?;

    let paragraphs: Vec<String> = content
        .select(&PARAGRAPH)
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return Err(DetailParseError::EmptyBody);
    }
    Ok(paragraphs.join("\n\n"))
}
