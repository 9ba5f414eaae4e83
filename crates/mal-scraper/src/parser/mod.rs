//! Record parsing for detail pages and list exports.

pub mod anime;
pub mod date;
pub mod url;
pub mod user;

pub use anime::parse_anime;
pub use date::parse_date;
pub use url::parse_mal_url;
pub use user::{parse_user_entry, parse_user_list, parse_watch_status, UserListItem};

use crate::error::{Error, Result};
use scraper::Selector;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(e.to_string()))
}
