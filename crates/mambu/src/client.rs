//! Authenticated HTTP client for the Mambu v2 API.

use std::fmt;
use std::time::Duration;

use loanlink_shared::{MambuConfig, PageRequest};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::MambuError;
use crate::retry::RetryPolicy;
use crate::search::SearchRequest;

/// Media type selecting the v2 API.
pub const MAMBU_V2_MEDIA_TYPE: &str = "application/vnd.mambu.v2+json";

/// Mambu reads the key from `apiKey`; header names are case-insensitive.
const API_KEY_HEADER: HeaderName = HeaderName::from_static("apikey");

/// Verbosity of returned records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsLevel {
    /// Core fields only.
    Basic,
    /// Core fields plus custom fields.
    Full,
}

impl DetailsLevel {
    /// Query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for DetailsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for one Mambu tenant.
#[derive(Debug, Clone)]
pub struct MambuClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl MambuClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `MambuError::Configuration` for an unusable base URL or API key.
    pub fn new(config: &MambuConfig) -> Result<Self, MambuError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MambuError::Configuration(format!("base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MambuError::Configuration(format!(
                "base_url {base_url} cannot carry a path"
            )));
        }

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| MambuError::Configuration(format!("api_key: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static(MAMBU_V2_MEDIA_TYPE));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MambuError::Configuration(format!("http client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            retry: RetryPolicy::from(&config.retry),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// URL for a resource path given as segments; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MambuError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MambuError::Configuration("base_url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` a single record.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        details: DetailsLevel,
    ) -> Result<T, MambuError> {
        let url = self.endpoint(segments)?;
        debug!(%url, %details, "Mambu GET");
        let url = &url;
        self.retry
            .execute(url.path(), move || {
                let request = self
                    .http
                    .get(url.clone())
                    .query(&[("detailsLevel", details.as_str())]);
                send(request)
            })
            .await
    }

    /// `GET` a page of records.
    pub async fn list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        details: DetailsLevel,
        page: PageRequest,
    ) -> Result<Vec<T>, MambuError> {
        let url = self.endpoint(segments)?;
        debug!(%url, %details, offset = page.offset, limit = page.limit, "Mambu list");
        let url = &url;
        self.retry
            .execute(url.path(), move || {
                let request = self
                    .http
                    .get(url.clone())
                    .query(&[("detailsLevel", details.as_str())])
                    .query(&page.query_pairs());
                send(request)
            })
            .await
    }

    /// `POST` a search and return one page of matches.
    pub async fn search<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        details: DetailsLevel,
        body: &SearchRequest,
        page: PageRequest,
    ) -> Result<Vec<T>, MambuError> {
        let url = self.endpoint(segments)?;
        debug!(
            %url,
            %details,
            criteria = body.filter_criteria.len(),
            offset = page.offset,
            limit = page.limit,
            "Mambu search"
        );
        let url = &url;
        self.retry
            .execute(url.path(), move || {
                let request = self
                    .http
                    .post(url.clone())
                    .query(&[("detailsLevel", details.as_str())])
                    .query(&page.query_pairs())
                    .json(body);
                send(request)
            })
            .await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, MambuError> {
    let response = request
        .send()
        .await
        .map_err(|e| MambuError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| MambuError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(MambuError::from_response(status.as_u16(), &body));
    }
    serde_json::from_slice(&body).map_err(|e| MambuError::Decode(e.to_string()))
}
