//! Link preview lookup against the linkpreview.net API.
//!
//! Lookups never fail outward: any transport or API error degrades to a
//! bare preview carrying the URL as its title.

use serde::Deserialize;
use tracing::warn;

use ccsba_store::LinkPreview;

const DEFAULT_ENDPOINT: &str = "https://api.linkpreview.net/";

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
}

#[derive(Debug, Clone)]
pub struct LinkPreviewClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl LinkPreviewClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Bare-URL links get a scheme prepended before lookup.
    pub fn normalize_url(url: &str) -> String {
        let url = url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    }

    pub async fn fetch(&self, url: &str) -> LinkPreview {
        match self.try_fetch(url).await {
            Ok(preview) => preview,
            Err(err) => {
                warn!(url, %err, "link preview lookup failed, using fallback");
                fallback_preview(url)
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<LinkPreview, anyhow::Error> {
        let response: PreviewResponse = self
            .http
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str()), ("q", url)])
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            anyhow::bail!("api error: {error}");
        }

        Ok(LinkPreview {
            title: response.title,
            description: response.description,
            image: response.image,
            url: url.to_string(),
        })
    }
}

fn fallback_preview(url: &str) -> LinkPreview {
    LinkPreview {
        title: url.to_string(),
        description: String::new(),
        image: String::new(),
        url: url.to_string(),
    }
}
