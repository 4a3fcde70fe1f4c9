use crate::endpoint::Endpoint;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

pub const BASE_URL: &str = "https://api.rolimons.com";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const VERIFICATION_COOKIE: &str = "_RoliVerification";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport-level retry applied to every request.
///
/// Retry `n` (counting from zero) waits `backoff_factor * 2^n`.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub status_forcelist: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_secs(1),
            status_forcelist: vec![
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::BAD_GATEWAY,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::GATEWAY_TIMEOUT,
            ],
        }
    }
}

impl RetryPolicy {
    pub fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        attempt < self.max_retries && self.status_forcelist.contains(&status)
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_factor * 2u32.saturating_pow(attempt)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Builds a session authenticated with the given verification token.
    /// No request is made here.
    pub fn new(verification_token: &str) -> Result<Self> {
        Self::with_base_url(verification_token, BASE_URL)
    }

    pub fn with_base_url(verification_token: &str, base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers(verification_token)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn process_request(
        &self,
        builder: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let request = builder.try_clone().ok_or(Error::RequestNotCloneable)?;
            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if !self.retry.should_retry(status, attempt) {
                let text = response.text().await.unwrap_or_default();
                return Err(Error::Response(status, text));
            }

            let delay = self.retry.backoff(attempt);
            log::warn!(
                "Request failed with status {status} for endpoint {endpoint}. Retrying in {delay:?}"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    pub(crate) async fn post(&self, endpoint: Endpoint, payload: Value) -> Result<Value> {
        let builder = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .json(&payload);

        let response = self.process_request(builder, endpoint).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| Error::Deserialize(format!("{e}: {text}")))
    }
}

fn default_headers(verification_token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut cookie = HeaderValue::from_str(&format!("{VERIFICATION_COOKIE}={verification_token}"))?;
    cookie.set_sensitive(true);
    headers.insert(COOKIE, cookie);

    Ok(headers)
}
