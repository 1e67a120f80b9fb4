use crate::coordinate::Coordinate;
use reqwest::{Url, blocking::Client};
use std::{error::Error, time::Duration};
use tracing::debug;

pub use reqwest::Error as HttpClientError;

/// Placeholder shown instead of the access key whenever a URL is displayed.
pub const REDACTED_KEY: &str = "REDACTED";

/// A GET request for the capture history of one location.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    url: Url,
    redacted: Url,
}

impl AssetRequest {
    /// Embeds longitude, latitude and the access key, in that order, as query
    /// parameters of `endpoint`.
    pub fn new(endpoint: &Url, coordinate: Coordinate, api_key: &str) -> Self {
        Self {
            url: with_query(endpoint, coordinate, api_key),
            redacted: with_query(endpoint, coordinate, REDACTED_KEY),
        }
    }

    /// The URL to request, including the access key.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL safe to log or print.
    pub fn redacted(&self) -> &Url {
        &self.redacted
    }
}

fn with_query(endpoint: &Url, coordinate: Coordinate, api_key: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("lon", &format!("{:?}", coordinate.longitude))
        .append_pair("lat", &format!("{:?}", coordinate.latitude))
        .append_pair("api_key", api_key);
    url
}

/// Anything that can answer an [`AssetRequest`] with a raw response body.
pub trait AssetSource {
    type Error: Error + Send + Sync + 'static;

    fn fetch(&self, request: &AssetRequest) -> Result<String, Self::Error>;
}

/// Fetches capture histories over HTTP with a single blocking GET.
pub struct HttpAssetSource {
    client: Client,
}

impl HttpAssetSource {
    /// Creates a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

impl AssetSource for HttpAssetSource {
    type Error = HttpClientError;

    fn fetch(&self, request: &AssetRequest) -> Result<String, Self::Error> {
        debug!(url = %request.redacted(), "requesting capture history");

        // The error would otherwise carry the URL, access key included.
        self.client
            .get(request.url().clone())
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(HttpClientError::without_url)
    }
}
