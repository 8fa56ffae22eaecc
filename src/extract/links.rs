//! Last-resort scan of raw anchors pointing at news paths.

use super::Strategy;
use super::fields::{extract_date, extract_summary};
use crate::models::Article;
use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::instrument;
use url::Url;

/// Path fragments the CMS uses for news entries.
pub const NEWS_PATH_FRAGMENTS: &[&str] = &[
    "/actus/",
    "/actualites/",
    "/actualite/",
    "/toutes-les-actus/",
    "/news/",
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Treats every anchor with a news-looking href as an article.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkFallbackStrategy;

impl Strategy for LinkFallbackStrategy {
    fn name(&self) -> &'static str {
        "link-fallback"
    }

    #[instrument(level = "debug", skip_all, fields(strategy = "link-fallback"))]
    fn try_extract(&self, document: &Html, base: &Url) -> Vec<Article> {
        let mut seen = HashSet::new();
        let mut articles = Vec::new();

        for anchor in document.select(&ANCHOR) {
            let href = anchor.value().attr("href").unwrap_or_default().trim();
            if href.is_empty() || !NEWS_PATH_FRAGMENTS.iter().any(|f| href.contains(f)) {
                continue;
            }
            let title = element_text(anchor);
            if title.is_empty() {
                continue;
            }

            let scope = anchor.parent().and_then(ElementRef::wrap).unwrap_or(anchor);
            let summary = extract_summary(scope, &title);
            let date = extract_date(scope);

            if let Some(article) = Article::new(&title, href, &summary, date.as_deref(), base) {
                if seen.insert(article.url().to_string()) {
                    articles.push(article);
                }
            }
        }

        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://actus.ulb.be").unwrap()
    }

    fn run(html: &str) -> Vec<Article> {
        LinkFallbackStrategy.try_extract(&Html::parse_document(html), &base())
    }

    #[test]
    fn test_anchor_with_sibling_fields() {
        let articles = run(r#"
            <ul>
              <li>
                <a href="/fr/news/article-3">Titre 3</a>
                <span class="c-card__date">3 mars 2024</span>
                <p>Résumé 3</p>
              </li>
            </ul>
        "#);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Titre 3");
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/news/article-3");
        assert_eq!(articles[0].summary(), "Résumé 3");
        assert_eq!(articles[0].date(), Some("3 mars 2024"));
    }

    #[test]
    fn test_non_news_links_are_ignored() {
        let articles = run(r#"
            <nav><a href="/fr/contact">Contact</a><a href="/fr/agenda/evenement">Agenda</a></nav>
        "#);
        assert!(articles.is_empty());
    }

    #[test]
    fn test_empty_text_and_duplicates_are_dropped() {
        let articles = run(r#"
            <div>
              <a href="/fr/actus/x"><img src="x.jpg" alt=""></a>
              <a href="/fr/actus/x">Titre X</a>
              <a href="/fr/actus/x">Titre X bis</a>
            </div>
        "#);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Titre X");
    }
}
