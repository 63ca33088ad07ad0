//! Shared HTTP plumbing for the quote providers.

use journal_core::error::QuoteError;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use std::time::Duration;

/// Browser user agent. Both Chinese endpoints reject requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-provider HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub referer: Option<String>,
}

impl HttpOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

pub(crate) fn build_client(options: &HttpOptions) -> Result<Client, QuoteError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(&options.user_agent)
            .map_err(|e| QuoteError::Request(format!("Invalid user agent: {}", e)))?,
    );
    if let Some(referer) = &options.referer {
        headers.insert(
            header::REFERER,
            header::HeaderValue::from_str(referer)
                .map_err(|e| QuoteError::Request(format!("Invalid referer: {}", e)))?,
        );
    }
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );

    Client::builder()
        .default_headers(headers)
        .timeout(options.timeout)
        .build()
        .map_err(|e| QuoteError::Connection(e.to_string()))
}

/// Map a transport error onto the provider error kinds.
pub(crate) fn classify(err: reqwest::Error) -> QuoteError {
    if err.is_timeout() {
        QuoteError::Timeout
    } else if err.is_connect() {
        QuoteError::Connection(err.to_string())
    } else if err.is_decode() {
        QuoteError::Malformed(err.to_string())
    } else if let Some(status) = err.status() {
        status_error(status, err.to_string())
    } else {
        QuoteError::from_message(err.to_string())
    }
}

fn status_error(status: StatusCode, body: String) -> QuoteError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        QuoteError::RateLimited(format!("HTTP {}", status.as_u16()))
    } else {
        match QuoteError::from_message(body) {
            rate @ QuoteError::RateLimited(_) => rate,
            _ => QuoteError::HttpStatus(status.as_u16()),
        }
    }
}

/// Send a request and return the body of a successful response.
pub(crate) async fn get_text(request: RequestBuilder) -> Result<String, QuoteError> {
    let response = request.send().await.map_err(classify)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, body));
    }

    response.text().await.map_err(classify)
}
