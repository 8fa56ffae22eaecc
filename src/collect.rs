//! Multi-page collection of listing articles.

use crate::error::{ClientError, CollectError, ListingParseError};
use crate::models::Article;
use itertools::Itertools;
use tracing::{info, instrument, warn};

/// Something that can produce the articles of a numbered listing page.
pub trait ListingSource {
    /// Articles of the zero-based listing page `page`, at most `page_size`.
    async fn listing_page(&self, page: usize, page_size: usize) -> Result<Vec<Article>, ClientError>;
}

/// Walk listing pages `0..pages` in order and gather their articles.
///
/// Collection stops at the first later page that is empty or unrecognized.
/// Articles are deduplicated by URL, keeping the first occurrence.
///
/// # Errors
///
/// * [`CollectError::InvalidArgument`] when `pages` or `page_size` is zero.
/// * [`CollectError::Listing`] when the first page yields nothing.
/// * [`CollectError::Client`] on transport or feed failures, whatever the page.
#[instrument(level = "info", skip(source))]
pub async fn collect_articles<S>(source: &S, pages: usize, page_size: usize) -> Result<Vec<Article>, CollectError>
where
    S: ListingSource,
{
    if pages == 0 {
        return Err(CollectError::InvalidArgument("pages must be a positive integer"));
    }
    if page_size == 0 {
        return Err(CollectError::InvalidArgument("page_size must be a positive integer"));
    }

    let mut collected: Vec<Article> = Vec::new();

    for page in 0..pages {
        let page_articles = match source.listing_page(page, page_size).await {
            Ok(articles) => articles,
            Err(ClientError::Listing(_)) if page > 0 => {
                warn!(page, "Listing page not recognized; stopping");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if page_articles.is_empty() {
            if page == 0 {
                return Err(ListingParseError.into());
            }
            info!(page, "Empty listing page; stopping");
            break;
        }

        info!(page, count = page_articles.len(), "Collected listing page");
        collected.extend(page_articles);
    }

    let articles: Vec<Article> = collected
        .into_iter()
        .unique_by(|a| a.url().to_string())
        .collect();
    info!(count = articles.len(), "Collection complete");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use url::Url;

    enum Page {
        Articles(Vec<Article>),
        Unrecognized,
        Unreachable,
    }

    /// Replays scripted pages and records which ones were asked for.
    struct Scripted {
        pages: Vec<Page>,
        requested: RefCell<Vec<(usize, usize)>>,
    }

    impl Scripted {
        fn new(pages: Vec<Page>) -> Self {
            Self { pages, requested: RefCell::new(Vec::new()) }
        }
    }

    impl ListingSource for Scripted {
        async fn listing_page(&self, page: usize, page_size: usize) -> Result<Vec<Article>, ClientError> {
            self.requested.borrow_mut().push((page, page_size));
            match self.pages.get(page) {
                Some(Page::Articles(articles)) => Ok(articles.clone()),
                Some(Page::Unrecognized) => Err(ListingParseError.into()),
                Some(Page::Unreachable) => Err(FetchError::Status {
                    status: 500,
                    url: format!("https://example.com/?page={page}"),
                }
                .into()),
                None => Ok(Vec::new()),
            }
        }
    }

    fn article(title: &str, path: &str) -> Article {
        let base = Url::parse("https://example.com").unwrap();
        Article::new(title, path, "", None, &base).unwrap()
    }

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(Article::title).collect()
    }

    #[tokio::test]
    async fn test_collect_deduplicates_and_stops_on_empty_page() {
        let source = Scripted::new(vec![
            Page::Articles(vec![article("Titre 1", "/1"), article("Titre 2", "/2")]),
            Page::Articles(vec![article("Titre 2", "/2"), article("Titre 3", "/3")]),
            Page::Articles(vec![]),
            Page::Articles(vec![article("Jamais", "/4")]),
        ]);

        let articles = collect_articles(&source, 5, 10).await.unwrap();

        assert_eq!(titles(&articles), vec!["Titre 1", "Titre 2", "Titre 3"]);
        assert_eq!(*source.requested.borrow(), vec![(0, 10), (1, 10), (2, 10)]);
    }

    #[tokio::test]
    async fn test_empty_first_page_is_a_listing_error() {
        let source = Scripted::new(vec![Page::Articles(vec![])]);
        let err = collect_articles(&source, 2, 10).await.unwrap_err();
        assert!(matches!(err, CollectError::Listing(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_first_page_is_a_listing_error() {
        let source = Scripted::new(vec![Page::Unrecognized]);
        let err = collect_articles(&source, 3, 10).await.unwrap_err();
        assert!(matches!(err, CollectError::Listing(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_later_page_ends_collection() {
        let source = Scripted::new(vec![Page::Articles(vec![article("Seul", "/1")]), Page::Unrecognized]);
        let articles = collect_articles(&source, 3, 10).await.unwrap();
        assert_eq!(titles(&articles), vec!["Seul"]);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let source = Scripted::new(vec![Page::Articles(vec![article("Un", "/1")]), Page::Unreachable]);
        let err = collect_articles(&source, 3, 10).await.unwrap_err();
        assert!(matches!(err, CollectError::Client(ClientError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_page_count_is_respected() {
        let source = Scripted::new(vec![
            Page::Articles(vec![article("A", "/a")]),
            Page::Articles(vec![article("B", "/b")]),
        ]);
        let articles = collect_articles(&source, 1, 4).await.unwrap();
        assert_eq!(titles(&articles), vec!["A"]);
        assert_eq!(*source.requested.borrow(), vec![(0, 4)]);
    }

    #[tokio::test]
    async fn test_zero_arguments_are_rejected() {
        let source = Scripted::new(vec![]);
        assert!(matches!(
            collect_articles(&source, 0, 10).await,
            Err(CollectError::InvalidArgument(_))
        ));
        assert!(matches!(
            collect_articles(&source, 1, 0).await,
            Err(CollectError::InvalidArgument(_))
        ));
        assert!(source.requested.borrow().is_empty());
    }
}
