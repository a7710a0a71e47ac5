//! HTTP client for the DMV portal.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// HTTP client for the DMV portal: the city/ZIP seed endpoint, the paginated
/// locations search, and per-office detail pages.
///
/// Non-2xx responses become typed errors so callers can decide per
/// seed/facility whether to stop or skip; no retrying is done here.
pub struct PortalClient {
    client: Client,
    base_url: String,
}

impl PortalClient {
    /// Creates a `PortalClient` with the configured timeout and `User-Agent`.
    ///
    /// `base_url` is the portal origin without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the city/ZIP seed list from the portal's cities endpoint.
    ///
    /// The endpoint returns a JSON array of `"City ZIP"` strings.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] — non-2xx response.
    /// - [`ScraperError::Http`] — network or TLS failure.
    /// - [`ScraperError::Deserialize`] — body is not a JSON string array.
    pub async fn fetch_city_seeds(&self) -> Result<Vec<String>, ScraperError> {
        let url = format!("{}/portal/wp-json/dmv/v1/cities", self.base_url);
        let body = self.fetch_html(&url).await?;
        serde_json::from_str::<Vec<String>>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("city seed list from {url}"),
            source: e,
        })
    }

    /// Fetches the body of an absolute URL.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] — non-2xx response.
    /// - [`ScraperError::Http`] — network or TLS failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}
