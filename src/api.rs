//! Synchronous client for the outbreak statistics page.
//!
//! One fixed URL, fetched as raw HTML. The page rejects default HTTP agents,
//! so the client sends a browser-like User-Agent. Transient failures (5xx,
//! transport errors) get a short fixed-backoff retry; anything else surfaces
//! as [`Error::Network`] immediately.

use crate::error::Error;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

/// The one page this tool understands.
pub const OUTBREAK_URL: &str = "https://www.worldometers.info/coronavirus/";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.77 Safari/537.36";

/// Capability the data service needs from the transport layer. Tests
/// substitute stubs; [`Client`] is the production implementation.
pub trait Fetch {
    fn fetch(&self) -> Result<String, Error>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client build");
        Self {
            url: OUTBREAK_URL.into(),
            http,
        }
    }
}

impl Client {
    /// Client pointed at a non-default URL (mock servers in tests).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Fetch for Client {
    fn fetch(&self) -> Result<String, Error> {
        // Small retry for transient failures (5xx / transport errors).
        let mut delays = [100u64, 300, 700].into_iter();
        loop {
            match self
                .http
                .get(&self.url)
                .send()
                .and_then(|r| r.error_for_status())
            {
                Ok(r) => return r.text().map_err(Error::Network),
                Err(e) => {
                    let transient = e.status().is_none_or(|s| s.is_server_error());
                    match delays.next() {
                        Some(ms) if transient => {
                            std::thread::sleep(Duration::from_millis(ms))
                        }
                        _ => return Err(Error::Network(e)),
                    }
                }
            }
        }
    }
}
