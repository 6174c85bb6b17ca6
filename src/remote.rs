use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::RossiError;

/// Blocking download of one URL to a local path.
pub trait RemoteClient: Send + Sync {
    fn download(&self, url: &str, destination: &Path) -> Result<(), RossiError>;
}

#[derive(Clone)]
pub struct HttpRemoteClient {
    client: Client,
}

impl HttpRemoteClient {
    pub fn new() -> Result<Self, RossiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("rossi-strand/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| RossiError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| RossiError::Http(err.to_string()))?;
        Ok(Self { client })
    }

    fn write_response_to_file(
        &self,
        url: &str,
        mut response: reqwest::blocking::Response,
        destination: &Path,
    ) -> Result<(), RossiError> {
        if !response.status().is_success() {
            return Err(RossiError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let mut file =
            File::create(destination).map_err(|err| RossiError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file).map_err(|err| RossiError::Http(err.to_string()))?;
        Ok(())
    }

    fn send_with_retries(&self, url: &str) -> Result<reqwest::blocking::Response, RossiError> {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        debug!(url, status, attempt, "retrying download");
                        thread::sleep(Duration::from_millis(BASE_DELAY_MS * (attempt as u64 + 1)));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        debug!(url, attempt, error = %err, "retrying download");
                        thread::sleep(Duration::from_millis(BASE_DELAY_MS * (attempt as u64 + 1)));
                        attempt += 1;
                        continue;
                    }
                    return Err(RossiError::Http(format!("{url}: {err}")));
                }
            }
        }
    }
}

impl RemoteClient for HttpRemoteClient {
    fn download(&self, url: &str, destination: &Path) -> Result<(), RossiError> {
        let response = self.send_with_retries(url)?;
        self.write_response_to_file(url, response, destination)
    }
}

pub fn join_url(base: &str, file_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file_name)
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(join_url("https://x.org/a/", "b.zip"), "https://x.org/a/b.zip");
        assert_eq!(join_url("https://x.org/a", "b.zip"), "https://x.org/a/b.zip");
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(404));
    }
}
