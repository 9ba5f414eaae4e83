//! MyAnimeList page client with rate-limit retry logic.

use super::backoff::LinearBackoff;
use super::http::HttpClient;
use crate::clock::Clock;
use crate::error::{Error, Result};
use shared::MediaKind;
use std::rc::Rc;
use tracing::{debug, warn};

/// Default site base URL
pub const DEFAULT_BASE_URL: &str = "https://myanimelist.net";

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Client for MyAnimeList detail pages and list exports
pub struct MalClient {
    /// HTTP transport
    http: Box<dyn HttpClient>,
    /// Clock used for backoff sleeps
    clock: Rc<dyn Clock>,
    /// Base URL of the site
    base_url: String,
    /// Retry policy for 429 responses
    backoff: LinearBackoff,
}

impl MalClient {
    /// Create a new client
    pub fn new(
        http: Box<dyn HttpClient>,
        clock: Rc<dyn Clock>,
        base_url: impl Into<String>,
        backoff: LinearBackoff,
    ) -> Self {
        Self {
            http,
            clock,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            backoff,
        }
    }

    /// URL of an anime or manga detail page
    pub fn media_url(&self, kind: MediaKind, mal_id: u32) -> String {
        format!("{}/{}/{}", self.base_url, kind.as_str(), mal_id)
    }

    /// URL of a user's full anime list export
    pub fn user_list_url(&self, username: &str) -> String {
        format!(
            "{}/malappinfo.php?type=anime&status=all&u={}",
            self.base_url,
            urlencoding::encode(username)
        )
    }

    /// Fetch an anime or manga detail page
    pub fn fetch_media(&self, kind: MediaKind, mal_id: u32) -> Result<String> {
        self.fetch(&self.media_url(kind, mal_id))
    }

    /// Fetch a user's list export
    pub fn fetch_user_list(&self, username: &str) -> Result<String> {
        self.fetch(&self.user_list_url(username))
    }

    /// GET a URL, waiting out 429 responses
    ///
    /// Only a 200 response yields content. A 429 is retried after a
    /// linearly growing delay until the attempt budget is spent; any other
    /// status fails immediately.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt = 1;

        loop {
            debug!(url = %url, attempt, "Making request");
            let response = self.http.get(url)?;

            match response.status {
                STATUS_OK => {
                    debug!(url = %url, bytes = response.body.len(), "Request successful");
                    return Ok(response.body);
                }
                STATUS_TOO_MANY_REQUESTS => match self.backoff.delay_after(attempt) {
                    Some(delay) => {
                        warn!(
                            url = %url,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Rate limited by server, waiting"
                        );
                        self.clock.sleep(delay);
                        attempt += 1;
                    }
                    None => {
                        warn!(url = %url, attempts = attempt, "Giving up after repeated rate limiting");
                        return Err(Error::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                        });
                    }
                },
                status => {
                    warn!(url = %url, status, "Request failed");
                    return Err(Error::Network {
                        url: url.to_string(),
                        status,
                    });
                }
            }
        }
    }
}
