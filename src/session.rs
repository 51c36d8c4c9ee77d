//! Outbound network session
//!
//! A [`Session`] wraps the shared connection pool and is handed explicitly
//! to every pipeline call of one inbound request. Pipelines issue their
//! fetches through it one after another.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::{Result, ScrapeError};

/// Body of a completed request together with its status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Request-scoped handle onto the shared HTTP client
#[derive(Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    /// Build the shared client from configuration
    pub fn build_client(config: &HttpConfig) -> Result<Client> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;
        Ok(client)
    }

    /// Wrap a (cheaply cloned) client for the lifetime of one request
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET a page, failing on any non-2xx status
    pub async fn get_page(&self, url: &str) -> Result<String> {
        self.send_checked(url, self.client.get(url)).await
    }

    /// GET a page on behalf of `referer`, returning the status instead of
    /// failing on it
    pub async fn get_with_referer(&self, url: &str, referer: &str) -> Result<FetchedPage> {
        debug!("GET {} (referer {})", url, referer);
        let response = self.client.get(url).header(REFERER, referer).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }

    /// Same-origin AJAX GET as a browser would issue it from `referer`
    pub async fn get_ajax(&self, url: &str, query: &[(&str, String)], referer: &str) -> Result<String> {
        let request = self.client.get(url).query(query).headers(ajax_headers(referer));
        self.send_checked(url, request).await
    }

    async fn send_checked(&self, url: &str, request: RequestBuilder) -> Result<String> {
        debug!("GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Headers of an XHR issued by the site's own scripts
fn ajax_headers(referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("uk,en;q=0.9,en-GB;q=0.8,en-US;q=0.7"),
    );
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }
    headers
}
