//! Listing-of-cards layout, the primary strategy.
//!
//! Container selectors describe broad regions that hold a listing, card
//! selectors the individual entries inside them. Both lists are tried in
//! order and the first container selector producing at least one article
//! wins outright.

use super::Strategy;
use super::fields::{extract_date, extract_summary};
use crate::models::Article;
use crate::utils::element_text;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument};
use url::Url;

const CONTAINER_SELECTORS: &[&str] = &[
    "div.view-content",
    "ul.objets.actualites",
    "div.views-element-container",
    "main",
    "body",
];

const CARD_SELECTORS: &[&str] = &[
    "article",
    ".views-row",
    "li.avec_vignette",
    ".node--type-news",
    ".card",
    ".c-card",
];

static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(CONTAINER_SELECTORS));
static CARDS: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(CARD_SELECTORS));
static TITLE_ANCHOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2 a[href], h3 a[href], .card__title a[href], .node__title a[href]").expect("valid title selector")
});
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Paths that look like a news entry rather than navigation.
pub(crate) static RE_ARTICLE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/(actus|actualites?|toutes-les-actus|news|articles?)/[^/?#]+")
        .expect("valid article path regex")
});

fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).expect("valid card selector"))
        .collect()
}

/// Extracts articles from card markup inside known listing containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CardStrategy;

impl Strategy for CardStrategy {
    fn name(&self) -> &'static str {
        "cards"
    }

    #[instrument(level = "debug", skip_all, fields(strategy = "cards"))]
    fn try_extract(&self, document: &Html, base: &Url) -> Vec<Article> {
        for (container_selector, raw) in CONTAINERS.iter().zip(CONTAINER_SELECTORS) {
            let articles = extract_from_containers(document, container_selector, base);
            if !articles.is_empty() {
                debug!(container = *raw, count = articles.len(), "Container yielded cards");
                return articles;
            }
        }
        Vec::new()
    }
}

/// Parse every card under every match of one container selector.
fn extract_from_containers(document: &Html, container_selector: &Selector, base: &Url) -> Vec<Article> {
    let mut seen_nodes = HashSet::new();
    let mut seen_urls = HashSet::new();
    let mut articles = Vec::new();

    for container in document.select(container_selector) {
        for card_selector in CARDS.iter() {
            for card in container.select(card_selector) {
                if !seen_nodes.insert(card.id()) {
                    continue;
                }
                if let Some(article) = parse_card(card, base) {
                    if seen_urls.insert(article.url().to_string()) {
                        articles.push(article);
                    }
                }
            }
        }
    }

    articles
}

/// Turn one card node into an article, or drop it.
fn parse_card(card: ElementRef<'_>, base: &Url) -> Option<Article> {
    let anchor = card
        .select(&TITLE_ANCHOR)
        .next()
        .or_else(|| longest_article_anchor(card))?;

    let title = element_text(anchor);
    if title.is_empty() {
        return None;
    }
    let href = anchor.value().attr("href")?;

    let summary = extract_summary(card, &title);
    let date = extract_date(card);
    Article::new(&title, href, &summary, date.as_deref(), base)
}

/// Among anchors pointing at an article path, the one with the longest
/// visible text. Ties keep the first in document order.
fn longest_article_anchor(card: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut best: Option<(usize, ElementRef<'_>)> = None;

    for anchor in card.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !RE_ARTICLE_PATH.is_match(href) {
            continue;
        }
        let len = element_text(anchor).chars().count();
        if len == 0 {
            continue;
        }
        if best.is_none_or(|(best_len, _)| len > best_len) {
            best = Some((len, anchor));
        }
    }

    best.map(|(_, anchor)| anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://actus.ulb.be").unwrap()
    }

    fn run(html: &str) -> Vec<Article> {
        CardStrategy.try_extract(&Html::parse_document(html), &base())
    }

    #[test]
    fn test_cards_in_view_content() {
        let articles = run(r#"
            <div class="view-content">
              <div class="views-row">
                <div class="card__date">1 janvier 2024</div>
                <h3 class="card__title"><a href="/fr/toutes-les-actus/article-1">Titre 1</a></h3>
                <div class="card__summary">Résumé de l'article 1</div>
              </div>
              <div class="views-row">
                <h2><a href="/fr/actualites/article-2">Titre 2</a></h2>
                <div class="field--name-field-introduction">Résumé 2</div>
                <time>15 février 2024</time>
              </div>
            </div>
        "#);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title(), "Titre 1");
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/toutes-les-actus/article-1");
        assert_eq!(articles[0].summary(), "Résumé de l'article 1");
        assert_eq!(articles[0].date(), Some("1 janvier 2024"));
        assert_eq!(articles[1].title(), "Titre 2");
        assert_eq!(articles[1].summary(), "Résumé 2");
        assert_eq!(articles[1].date(), Some("15 février 2024"));
    }

    #[test]
    fn test_university_listing_markup_uses_longest_anchor() {
        let articles = run(r#"
            <main>
              <ul class="objets actualites">
                <li class="avec_vignette">
                  <div class="vignette_deco2">
                    <a href="/fr/actus/article-4"><img src="x.jpg" alt=""></a>
                    <strong>
                      <a class="lien_interne" href="/fr/actus/article-4">
                        Article en vedette
                      </a>
                    </strong>
                    <div class="date"><span class="date--debut">5 mai 2024</span></div>
                    <div class="resume">Un résumé riche en informations.</div>
                  </div>
                </li>
              </ul>
            </main>
        "#);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Article en vedette");
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/actus/article-4");
        assert_eq!(articles[0].summary(), "Un résumé riche en informations.");
        assert_eq!(articles[0].date(), Some("5 mai 2024"));
    }

    #[test]
    fn test_longest_anchor_tie_keeps_first() {
        let articles = run(r#"
            <div class="view-content">
              <article>
                <a href="/fr/news/first">Same</a>
                <a href="/fr/news/second">Same</a>
              </article>
            </div>
        "#);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/news/first");
    }

    #[test]
    fn test_card_without_title_is_skipped() {
        let articles = run(r#"
            <div class="view-content">
              <article><p>Pas de lien ici</p></article>
              <article><h2><a href="/fr/actus/ok">Valide</a></h2></article>
              <article><h2><a href="/fr/actus/vide">  </a></h2></article>
            </div>
        "#);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Valide");
    }

    #[test]
    fn test_node_matched_by_two_selectors_is_parsed_once() {
        let articles = run(r#"
            <div class="view-content">
              <article class="card"><h2><a href="/fr/actus/a">A</a></h2></article>
            </div>
        "#);
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_duplicate_urls_keep_first() {
        let articles = run(r#"
            <div class="view-content">
              <article><h2><a href="/fr/actus/same">Premier</a></h2></article>
              <article><h2><a href="/fr/actus/same">Second</a></h2></article>
            </div>
        "#);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Premier");
    }

    #[test]
    fn test_first_productive_container_wins() {
        // `div.view-content` has no parseable card, so `main` is used and the
        // article outside it is never mixed in.
        let articles = run(r#"
            <div class="view-content"><article><p>vide</p></article></div>
            <main><article><h2><a href="/fr/actus/main">Dans main</a></h2></article></main>
            <aside><article><h2><a href="/fr/actus/aside">Ailleurs</a></h2></article></aside>
        "#);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Dans main");
    }

    #[test]
    fn test_escaped_markup_in_title_is_kept_literally() {
        let articles = run(r#"
            <div class="view-content">
              <article><h2><a href="/fr/actus/balise">La balise &lt;b&gt; expliquée</a></h2></article>
              <article><h2><a href="/fr/actus/entite">Écrire &amp;eacute; en HTML</a></h2></article>
            </div>
        "#);
        assert_eq!(articles[0].title(), "La balise <b> expliquée");
        assert_eq!(articles[1].title(), "Écrire &eacute; en HTML");
    }

    #[test]
    fn test_title_anchor_without_href_falls_back_to_article_link() {
        let articles = run(r#"
            <div class="view-content">
              <article>
                <h2><a name="ancre">Ancre seule</a></h2>
                <a href="/fr/actus/suite">Lire la suite de l'article</a>
              </article>
            </div>
        "#);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/actus/suite");
        assert_eq!(articles[0].title(), "Lire la suite de l'article");
    }

    #[test]
    fn test_no_cards_returns_empty() {
        assert!(run("<html><body><ul><li><a href=\"/fr/news/x\">X</a></li></ul></body></html>").is_empty());
    }
}
