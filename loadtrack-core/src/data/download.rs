//! Dataset download — blocking CSV fetch with bounded retries.
//!
//! The dataset is published as a plain CSV behind a static URL. Transient
//! failures (timeouts, 5xx) are retried with exponential backoff; client
//! errors fail immediately. Retries live here and nowhere else in the engine.

use std::time::Duration;

use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("loadtrack/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("http client construction failed: {0}")]
    Client(String),

    #[error("server returned status {status} for {url}")]
    BadStatus { status: u16, url: String },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("download failed after {attempts} attempts: {reason}")]
    Exhausted { attempts: u32, reason: String },
}

/// Fetch the dataset CSV body from `url`.
pub fn fetch_csv(url: &str) -> Result<String, DownloadError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| DownloadError::Client(e.to_string()))?;

    let mut last_reason = String::new();

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt - 1));
            debug!(attempt, ?backoff, "retrying dataset download");
            std::thread::sleep(backoff);
        }

        match client.get(url).send() {
            Ok(resp) if resp.status().is_success() => {
                return resp.text().map_err(|e| DownloadError::Body(e.to_string()));
            }
            Ok(resp) => {
                let status = resp.status();
                if status.is_client_error() {
                    // 4xx will not improve on retry.
                    return Err(DownloadError::BadStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                last_reason = format!("status {status}");
                warn!(%status, attempt, "dataset download returned server error");
            }
            Err(e) => {
                last_reason = e.to_string();
                warn!(error = %e, attempt, "dataset download request failed");
            }
        }
    }

    Err(DownloadError::Exhausted {
        attempts: MAX_ATTEMPTS,
        reason: last_reason,
    })
}
