//! User list export parsing.

use super::date::parse_date;
use crate::api::{UserListDocument, UserListEntry};
use crate::error::{Error, Result};
use shared::{WatchProgress, WatchState};
use tracing::debug;

/// One parsed entry of a user's list
#[derive(Debug, Clone, PartialEq)]
pub struct UserListItem {
    pub mal_id: Option<u32>,
    pub title: String,
    pub progress: WatchProgress,
}

/// Parse every entry of a list export.
///
/// Only a malformed document fails as a whole. Each entry is parsed on its
/// own and returned with its title, so one bad status code does not hide
/// the rest of the list.
pub fn parse_user_list(content: &str) -> Result<Vec<(String, Result<UserListItem>)>> {
    let document = UserListDocument::from_xml(content)?;

    Ok(document
        .entries
        .iter()
        .map(|entry| (entry.title().to_string(), parse_list_item(entry)))
        .collect())
}

fn parse_list_item(entry: &UserListEntry) -> Result<UserListItem> {
    Ok(UserListItem {
        mal_id: entry
            .series_animedb_id
            .as_deref()
            .and_then(|id| id.trim().parse().ok()),
        title: entry.title().to_string(),
        progress: parse_progress(entry)?,
    })
}

/// Find the list entry titled exactly `name` and parse its progress.
///
/// The first matching entry wins. A title the user never added yields
/// [`WatchProgress::not_in_list`].
pub fn parse_user_entry(content: &str, name: &str) -> Result<WatchProgress> {
    let document = UserListDocument::from_xml(content)?;

    match document.entries.iter().find(|entry| entry.title() == name) {
        Some(entry) => parse_progress(entry),
        None => {
            debug!(title = %name, "Title not in user list");
            Ok(WatchProgress::not_in_list())
        }
    }
}

/// Map a `my_status` value through the site's status table
pub fn parse_watch_status(raw: &str) -> Result<WatchState> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(WatchState::from_code)
        .ok_or_else(|| Error::UnmappedWatchState(raw.trim().to_string()))
}

/// Split comma separated tags, dropping empty ones
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_progress(entry: &UserListEntry) -> Result<WatchProgress> {
    let status = entry
        .my_status
        .as_deref()
        .ok_or(Error::MissingField("my_status"))?;

    let episodes_watched = match entry.my_watched_episodes.as_deref().map(str::trim) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            debug!(title = %entry.title(), value = %raw, "Unparseable watched episode count");
            0
        }),
        None => 0,
    };

    Ok(WatchProgress {
        watch_state: parse_watch_status(status)?,
        tags: entry.my_tags.as_deref().map(parse_tags).unwrap_or_default(),
        start_date: entry.my_start_date.as_deref().and_then(parse_date),
        finish_date: entry.my_finish_date.as_deref().and_then(parse_date),
        episodes_watched,
    })
}
