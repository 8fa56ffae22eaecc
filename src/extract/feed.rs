//! RSS/Atom parsing for listing pages that advertise a feed.
//!
//! Only the fields an [`Article`] needs are read. Dates are kept as the raw
//! text of the first date element seen (`pubDate`, `dc:date`, `published`,
//! `updated`), and descriptions are stripped of markup.

use crate::error::FeedError;
use crate::models::Article;
use crate::utils::clean_text;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument};
use url::Url;

static FEED_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"link[rel="alternate"][type="application/rss+xml"], link[rel="alternate"][type="application/atom+xml"]"#,
    )
    .expect("valid feed link selector")
});

/// Absolute URL of the first RSS/Atom feed advertised in the page head.
pub fn find_rss_feed_url(markup: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(markup);
    document
        .select(&FEED_LINK)
        .filter_map(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .find_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Summary,
    Date,
}

impl Field {
    fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Field::Title),
            "link" => Some(Field::Link),
            "description" | "summary" | "content" | "encoded" => Some(Field::Summary),
            "pubDate" | "date" | "published" | "updated" => Some(Field::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FeedItem {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    date: Option<String>,
}

impl FeedItem {
    /// First value wins, so `pubDate` beats a later `dc:date`.
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Summary => &mut self.summary,
            Field::Date => &mut self.date,
        };
        if slot.is_none() && !value.trim().is_empty() {
            *slot = Some(value);
        }
    }

    /// Text still holds entity references and, for descriptions, escaped
    /// HTML (`&lt;p&gt;`); both are resolved here.
    fn into_article(self, base: &Url) -> Option<Article> {
        let title = clean_text(self.title.as_deref()?);
        let summary = self.summary.as_deref().map(clean_text).unwrap_or_default();
        let date = self.date.as_deref().map(clean_text);
        Article::new(&title, self.link.as_deref()?, &summary, date.as_deref(), base)
    }
}

/// Parse RSS `item`s or Atom `entry`s into articles, deduplicated by URL.
///
/// # Errors
///
/// [`FeedError::Parse`] when the XML itself is malformed.
#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn parse_rss_feed(xml: &str, base: &Url) -> Result<Vec<Article>, FeedError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut current: Option<FeedItem> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e);
                if name == "item" || name == "entry" {
                    current = Some(FeedItem::default());
                    field = None;
                } else if let Some(item) = current.as_mut() {
                    if field.is_none() {
                        field = Field::from_local_name(&name);
                        text.clear();
                        if field == Some(Field::Link) {
                            if let Some(href) = link_href(e) {
                                item.set(Field::Link, href);
                            }
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                // Atom: <link rel="alternate" href="..."/>
                if let Some(item) = current.as_mut() {
                    if local_name(e) == "link" {
                        if let Some(href) = link_href(e) {
                            item.set(Field::Link, href);
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if field.is_some() {
                    text.push_str(&e.decode().map(|s| s.into_owned()).unwrap_or_default());
                }
            }
            Ok(Event::CData(ref e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                // Kept as a reference; `into_article` decodes entities.
                if field.is_some() {
                    text.push('&');
                    text.push_str(&String::from_utf8_lossy(e));
                    text.push(';');
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "item" || name == "entry" {
                    if let Some(article) = current.take().and_then(|item| item.into_article(base)) {
                        if seen.insert(article.url().to_string()) {
                            articles.push(article);
                        }
                    }
                    field = None;
                } else if let (Some(item), Some(active)) = (current.as_mut(), field) {
                    if Field::from_local_name(&name) == Some(active) {
                        item.set(active, std::mem::take(&mut text));
                        field = None;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::parse(e)),
            _ => {}
        }
        buf.clear();
    }

    debug!(count = articles.len(), "Parsed feed items");
    Ok(articles)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// `href` of an Atom link, ignoring non-alternate relations.
fn link_href(e: &BytesStart<'_>) -> Option<String> {
    let mut href = None;
    let mut rel = None;
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"href" => href = Some(String::from_utf8_lossy(&attr.value).into_owned()),
            b"rel" => rel = Some(String::from_utf8_lossy(&attr.value).into_owned()),
            _ => {}
        }
    }
    match rel.as_deref() {
        None | Some("alternate") => href,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://actus.ulb.be").unwrap()
    }

    #[test]
    fn test_find_rss_feed_url_returns_absolute_url() {
        let html = r#"
            <html>
              <head>
                <link rel="alternate" type="application/rss+xml" href="/adminsite/webservices/export_rss.jsp?NOMBRE=10" />
              </head>
              <body></body>
            </html>
        "#;

        assert_eq!(
            find_rss_feed_url(html, &base()),
            Some("https://actus.ulb.be/adminsite/webservices/export_rss.jsp?NOMBRE=10".to_string())
        );
    }

    #[test]
    fn test_find_rss_feed_url_none_without_link() {
        assert_eq!(find_rss_feed_url("<html><head></head><body></body></html>", &base()), None);
    }

    #[test]
    fn test_parse_rss_feed_extracts_articles() {
        let xml = r#"
            <rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
              <channel>
                <title>Actus</title>
                <link>https://actus.ulb.be</link>
                <item>
                  <title>Article RSS 1</title>
                  <link>/fr/actus/article-rss-1</link>
                  <description><![CDATA[<p>Résumé <strong>riche</strong></p>]]></description>
                  <pubDate>Mon, 10 Jun 2024 12:00:00 +0200</pubDate>
                </item>
                <item>
                  <title>Article RSS 2</title>
                  <link>https://actus.ulb.be/fr/actus/article-rss-2</link>
                  <description>Second résumé</description>
                  <dc:date>2024-06-11</dc:date>
                </item>
              </channel>
            </rss>
        "#;

        let articles = parse_rss_feed(xml, &base()).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title(), "Article RSS 1");
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/actus/article-rss-1");
        assert_eq!(articles[0].summary(), "Résumé riche");
        assert_eq!(articles[0].date(), Some("Mon, 10 Jun 2024 12:00:00 +0200"));
        assert_eq!(articles[1].url(), "https://actus.ulb.be/fr/actus/article-rss-2");
        assert_eq!(articles[1].date(), Some("2024-06-11"));
    }

    #[test]
    fn test_parse_atom_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <feed xmlns="http://www.w3.org/2005/Atom">
              <title>Actus</title>
              <entry>
                <title>Entrée Atom</title>
                <link rel="self" href="/feed/entry-1"/>
                <link rel="alternate" href="/fr/actus/atom-1"/>
                <summary>Résumé Atom</summary>
                <updated>2024-07-01T08:00:00Z</updated>
              </entry>
            </feed>
        "#;

        let articles = parse_rss_feed(xml, &base()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url(), "https://actus.ulb.be/fr/actus/atom-1");
        assert_eq!(articles[0].summary(), "Résumé Atom");
        assert_eq!(articles[0].date(), Some("2024-07-01T08:00:00Z"));
    }

    #[test]
    fn test_entity_references_are_decoded() {
        let xml = r#"<rss><channel><item>
            <title>Recherche &amp; innovation</title>
            <link>/fr/actus/ri</link>
        </item></channel></rss>"#;

        let articles = parse_rss_feed(xml, &base()).unwrap();
        assert_eq!(articles[0].title(), "Recherche & innovation");
    }

    #[test]
    fn test_escaped_html_description_is_stripped() {
        let xml = r#"<rss><channel><item>
            <title>Titre</title>
            <link>/fr/actus/esc</link>
            <description>&lt;p&gt;Texte &lt;em&gt;important&lt;/em&gt;&lt;/p&gt;</description>
        </item></channel></rss>"#;

        let articles = parse_rss_feed(xml, &base()).unwrap();
        assert_eq!(articles[0].summary(), "Texte important");
    }

    #[test]
    fn test_items_without_link_are_dropped() {
        let xml = r#"<rss><channel>
            <item><title>Sans lien</title></item>
            <item><title>Avec lien</title><link>/fr/actus/ok</link></item>
            <item><title>Doublon</title><link>/fr/actus/ok</link></item>
        </channel></rss>"#;

        let articles = parse_rss_feed(xml, &base()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Avec lien");
    }

    #[test]
    fn test_malformed_feed_is_an_error() {
        let xml = "<rss><channel><item><title>Oops</titre></item></channel></rss>";
        assert!(matches!(parse_rss_feed(xml, &base()), Err(FeedError::Parse(_))));
    }
}
