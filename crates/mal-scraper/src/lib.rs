//! MAL Scraper library for building anime records from MyAnimeList.
//!
//! This library fetches anime detail pages and user list exports through a
//! disk-backed cache with rate-limit backoff, then extracts typed records
//! from them.

pub mod api;
pub mod cache;
pub mod clock;
pub mod error;
pub mod mal;
pub mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpClient, HttpResponse, LinearBackoff, MalClient, ReqwestClient};
pub use cache::{CacheEntry, CacheKey, CacheStats, FetchCache};
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use mal::MalScraper;
pub use parser::{parse_anime, parse_date, parse_mal_url, parse_user_entry, UserListItem};
