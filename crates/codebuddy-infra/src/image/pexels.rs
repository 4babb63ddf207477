//! Pexels stock-photo search.
//!
//! One request per lookup:
//! `GET {base_url}/search?query=<phrase>&per_page=1&orientation=<o>` with the
//! API key sent verbatim in the `Authorization` header. The first photo's
//! `src.large` rendition is returned.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use codebuddy_core::image::ImageSearch;
use codebuddy_types::config::ImageSettings;
use codebuddy_types::image::{ImageHit, ImageSearchError, Orientation};

/// Environment variable holding the Pexels API key.
pub const PEXELS_API_KEY_ENV: &str = "PEXELS_API_KEY";

/// Longest error body carried into a user-facing notice.
const MAX_ERROR_BODY: usize = 200;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
    #[serde(default)]
    photographer: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    large: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Pexels implementation of [`ImageSearch`].
///
/// Does not derive Debug: it holds the API key.
pub struct PexelsImageSearch {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    orientation: Orientation,
}

impl PexelsImageSearch {
    pub fn new(api_key: SecretString, settings: &ImageSettings) -> Result<Self, ImageSearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codebuddy/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ImageSearchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            orientation: settings.orientation,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    fn query_params(&self, query: &str) -> [(&'static str, String); 3] {
        [
            ("query", query.to_string()),
            ("per_page", "1".to_string()),
            ("orientation", self.orientation.to_string()),
        ]
    }
}

impl ImageSearch for PexelsImageSearch {
    fn name(&self) -> &str {
        "pexels"
    }

    async fn search(&self, query: &str) -> Result<Option<ImageHit>, ImageSearchError> {
        let response = self
            .http
            .get(self.search_url())
            .header(reqwest::header::AUTHORIZATION, self.api_key.expose_secret())
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| ImageSearchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageSearchError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = match body.trim() {
                "" => status.canonical_reason().unwrap_or("").to_string(),
                text => text.chars().take(MAX_ERROR_BODY).collect(),
            };
            return Err(ImageSearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_search_response(&body)
    }
}

/// Take the first photo from a search response body.
fn parse_search_response(body: &str) -> Result<Option<ImageHit>, ImageSearchError> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ImageSearchError::Deserialization(e.to_string()))?;

    Ok(parsed.photos.into_iter().next().map(|photo| ImageHit {
        url: photo.src.large,
        photographer: photo.photographer,
        page_url: photo.url,
    }))
}
