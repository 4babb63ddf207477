//! Image search abstraction.
//!
//! `ImageSearch` is implemented by stock-photo backends in codebuddy-infra
//! (e.g., `PexelsImageSearch`). [`lookup_image`] is the boundary the prompt
//! processor calls: it never returns an error, only a found / not found /
//! failed-with-notice outcome.

use std::future::Future;
use std::pin::Pin;

use codebuddy_types::image::{ImageHit, ImageSearchError};

/// Trait for stock-photo search backends.
pub trait ImageSearch: Send + Sync {
    /// Human-readable backend name (e.g., "pexels").
    fn name(&self) -> &str;

    /// Search for one photo matching `query`. `Ok(None)` means zero matches.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<ImageHit>, ImageSearchError>> + Send;
}

/// Object-safe version of [`ImageSearch`] with boxed futures.
pub trait ImageSearchDyn: Send + Sync {
    fn name(&self) -> &str;

    fn search_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ImageHit>, ImageSearchError>> + Send + 'a>>;
}

impl<T: ImageSearch> ImageSearchDyn for T {
    fn name(&self) -> &str {
        ImageSearch::name(self)
    }

    fn search_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ImageHit>, ImageSearchError>> + Send + 'a>>
    {
        Box::pin(self.search(query))
    }
}

/// Type-erased image search backend.
pub struct BoxImageSearch {
    inner: Box<dyn ImageSearchDyn + Send + Sync>,
}

impl BoxImageSearch {
    pub fn new<T: ImageSearch + 'static>(search: T) -> Self {
        Self {
            inner: Box::new(search),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn search(&self, query: &str) -> Result<Option<ImageHit>, ImageSearchError> {
        self.inner.search_boxed(query).await
    }
}

/// Outcome of an image lookup as seen by the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    Found(ImageHit),
    NotFound,
    /// The search failed; the notice is shown to the user, the answer is not blocked.
    Failed(String),
}

impl ImageLookup {
    pub fn hit(&self) -> Option<&ImageHit> {
        match self {
            ImageLookup::Found(hit) => Some(hit),
            _ => None,
        }
    }
}

/// Run one image search, folding every failure into [`ImageLookup::Failed`].
pub async fn lookup_image(search: &BoxImageSearch, query: &str) -> ImageLookup {
    match search.search(query).await {
        Ok(Some(hit)) => {
            tracing::debug!(backend = search.name(), image_query = query, url = %hit.url, "image found");
            ImageLookup::Found(hit)
        }
        Ok(None) => {
            tracing::debug!(backend = search.name(), image_query = query, "no image matched");
            ImageLookup::NotFound
        }
        Err(err) => {
            tracing::warn!(backend = search.name(), image_query = query, error = %err, "image search failed");
            ImageLookup::Failed(format!("{} API Error: {err}", display_backend(search.name())))
        }
    }
}

/// Capitalise a backend name for user-facing notices ("pexels" -> "Pexels").
fn display_backend(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Image".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Canned {
        Hit(&'static str),
        Empty,
        Fail(u16),
    }

    struct CannedSearch(Canned);

    impl ImageSearch for CannedSearch {
        fn name(&self) -> &str {
            "pexels"
        }

        async fn search(&self, _query: &str) -> Result<Option<ImageHit>, ImageSearchError> {
            match &self.0 {
                Canned::Hit(url) => Ok(Some(ImageHit {
                    url: url.to_string(),
                    photographer: None,
                    page_url: None,
                })),
                Canned::Empty => Ok(None),
                Canned::Fail(status) => Err(ImageSearchError::Status {
                    status: *status,
                    body: "Unauthorized".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let search = BoxImageSearch::new(CannedSearch(Canned::Hit("https://img/large.jpg")));
        let lookup = lookup_image(&search, "sql joins diagram").await;
        assert_eq!(lookup.hit().unwrap().url, "https://img/large.jpg");
    }

    #[tokio::test]
    async fn test_lookup_zero_results_is_no_image() {
        let search = BoxImageSearch::new(CannedSearch(Canned::Empty));
        let lookup = lookup_image(&search, "nothing").await;
        assert_eq!(lookup, ImageLookup::NotFound);
        assert!(lookup.hit().is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_becomes_notice() {
        let search = BoxImageSearch::new(CannedSearch(Canned::Fail(401)));
        let lookup = lookup_image(&search, "anything").await;
        match lookup {
            ImageLookup::Failed(notice) => {
                assert_eq!(notice, "Pexels API Error: HTTP 401: Unauthorized");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_display_backend() {
        assert_eq!(display_backend("pexels"), "Pexels");
        assert_eq!(display_backend(""), "Image");
    }
}
