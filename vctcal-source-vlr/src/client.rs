//! HTTP access to vlr.gg with timeout, retries and a politeness delay.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{SourceError, SourceResult};

const USER_AGENT: &str = concat!("vctcal/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl BackoffPolicy {
    pub fn delay_for_attempt(&self, attempt_index: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt_index as u32).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);
        delay.min(self.max_delay)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    backoff: BackoffPolicy,
    /// Pause after every successful request.
    request_delay: Duration,
}

impl HttpClient {
    pub fn new(
        timeout: Duration,
        request_delay: Duration,
        backoff: BackoffPolicy,
    ) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            backoff,
            request_delay,
        })
    }

    pub async fn get_text(&self, url: &str) -> SourceResult<String> {
        let mut attempt = 0;

        loop {
            debug!(url, attempt, "GET");
            let retryable = match self.client.get(url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.text().await?;
                    tokio::time::sleep(self.request_delay).await;
                    return Ok(body);
                }
                Ok(resp) => {
                    let status = resp.status();
                    let error = SourceError::HttpStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };
                    if !is_retryable_status(status) {
                        return Err(error);
                    }
                    error
                }
                Err(err) => {
                    if !is_retryable_error(&err) {
                        return Err(SourceError::Request(err));
                    }
                    SourceError::Request(err)
                }
            };

            if attempt >= self.backoff.max_retries {
                return Err(retryable);
            }

            let delay = self.backoff.delay_for_attempt(attempt);
            warn!(url, attempt, error = %retryable, ?delay, "retrying request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
