//! MyAnimeList network access.
//!
//! This module provides a blocking HTTP transport behind a trait, the page
//! client with linear rate-limit backoff, and the raw list export types.

pub mod backoff;
pub mod client;
pub mod http;
pub mod types;

pub use backoff::LinearBackoff;
pub use client::{MalClient, DEFAULT_BASE_URL};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use types::{UserListDocument, UserListEntry};
