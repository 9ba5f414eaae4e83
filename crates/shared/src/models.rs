//! Data models for the project.
//!
//! This module defines the value objects built from MyAnimeList pages and
//! user lists: anime records, per-user watch progress and the enums they use.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of media page hosted on MyAnimeList
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Anime,
    Manga,
}

impl MediaKind {
    /// Path segment used both in site URLs and cache directory names
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anime" => Ok(MediaKind::Anime),
            "manga" => Ok(MediaKind::Manga),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

/// Publication status of a title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AiringState {
    Airing,
    Finished,
    NotYetAired,
    Unknown,
}

impl AiringState {
    /// Map the label shown next to "Status:" on a detail page.
    ///
    /// Anything the site shows that is not one of the three known labels
    /// becomes `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Currently Airing" => AiringState::Airing,
            "Finished Airing" => AiringState::Finished,
            "Not yet aired" => AiringState::NotYetAired,
            _ => AiringState::Unknown,
        }
    }
}

impl std::fmt::Display for AiringState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiringState::Airing => write!(f, "airing"),
            AiringState::Finished => write!(f, "finished"),
            AiringState::NotYetAired => write!(f, "not-yet-aired"),
            AiringState::Unknown => write!(f, "unknown"),
        }
    }
}

/// A user's relationship to a title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WatchState {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
    NotInList,
}

impl WatchState {
    /// Look up the numeric `my_status` code used in list exports.
    ///
    /// Code 5 is unused by the site; it and any other unknown code
    /// return `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(WatchState::Watching),
            2 => Some(WatchState::Completed),
            3 => Some(WatchState::OnHold),
            4 => Some(WatchState::Dropped),
            6 => Some(WatchState::PlanToWatch),
            _ => None,
        }
    }
}

impl std::fmt::Display for WatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchState::Watching => write!(f, "watching"),
            WatchState::Completed => write!(f, "completed"),
            WatchState::OnHold => write!(f, "on-hold"),
            WatchState::Dropped => write!(f, "dropped"),
            WatchState::PlanToWatch => write!(f, "plan-to-watch"),
            WatchState::NotInList => write!(f, "not-in-list"),
        }
    }
}

/// How much of a [`WatchDate`] the site actually recorded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    Day,
    Month,
    Year,
}

/// A possibly partial calendar date.
///
/// Unknown components are stored as `1` in `date`; `precision` says which
/// components are meaningful.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchDate {
    pub date: NaiveDate,
    pub precision: DatePrecision,
}

impl WatchDate {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> Option<u32> {
        match self.precision {
            DatePrecision::Year => None,
            _ => Some(self.date.month()),
        }
    }

    pub fn day(&self) -> Option<u32> {
        match self.precision {
            DatePrecision::Day => Some(self.date.day()),
            _ => None,
        }
    }
}

impl std::fmt::Display for WatchDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.precision {
            DatePrecision::Day => write!(f, "{}", self.date.format("%Y-%m-%d")),
            DatePrecision::Month => write!(f, "{}", self.date.format("%Y-%m")),
            DatePrecision::Year => write!(f, "{}", self.date.format("%Y")),
        }
    }
}

/// Anime metadata scraped from a MyAnimeList detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimeRecord {
    pub mal_id: u32,
    pub name: String,

    // Related titles, in page order
    pub related_anime: Vec<u32>,
    pub related_manga: Vec<u32>,

    pub airing_state: AiringState,
    pub episodes: Option<u32>,
}

/// The per-title fields of one entry in a user's list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProgress {
    pub watch_state: WatchState,
    pub tags: Vec<String>,
    pub start_date: Option<WatchDate>,
    pub finish_date: Option<WatchDate>,
    pub episodes_watched: u32,
}

impl WatchProgress {
    /// Progress of a title the user never added to their list
    pub fn not_in_list() -> Self {
        Self {
            watch_state: WatchState::NotInList,
            tags: Vec::new(),
            start_date: None,
            finish_date: None,
            episodes_watched: 0,
        }
    }
}

impl Default for WatchProgress {
    fn default() -> Self {
        Self::not_in_list()
    }
}

/// An anime record combined with one user's progress on it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserWatchRecord {
    pub anime: AnimeRecord,
    pub username: String,

    // User list data
    pub watch_state: WatchState,
    pub tags: Vec<String>,
    pub start_date: Option<WatchDate>,
    pub finish_date: Option<WatchDate>,
    pub episodes_watched: u32,
}

impl UserWatchRecord {
    pub fn new(anime: AnimeRecord, username: impl Into<String>, progress: WatchProgress) -> Self {
        Self {
            anime,
            username: username.into(),
            watch_state: progress.watch_state,
            tags: progress.tags,
            start_date: progress.start_date,
            finish_date: progress.finish_date,
            episodes_watched: progress.episodes_watched,
        }
    }

    /// Display name of the underlying anime
    pub fn name(&self) -> &str {
        &self.anime.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_state_codes() {
        assert_eq!(WatchState::from_code(1), Some(WatchState::Watching));
        assert_eq!(WatchState::from_code(2), Some(WatchState::Completed));
        assert_eq!(WatchState::from_code(3), Some(WatchState::OnHold));
        assert_eq!(WatchState::from_code(4), Some(WatchState::Dropped));
        assert_eq!(WatchState::from_code(6), Some(WatchState::PlanToWatch));
        assert_eq!(WatchState::from_code(5), None);
        assert_eq!(WatchState::from_code(99), None);
    }

    #[test]
    fn test_airing_state_labels() {
        assert_eq!(AiringState::from_label("Finished Airing"), AiringState::Finished);
        assert_eq!(AiringState::from_label(" Currently Airing\n"), AiringState::Airing);
        assert_eq!(AiringState::from_label("Not yet aired"), AiringState::NotYetAired);
        assert_eq!(AiringState::from_label("Publishing"), AiringState::Unknown);
    }

    #[test]
    fn test_media_kind_round_trip() {
        assert_eq!("manga".parse::<MediaKind>().unwrap(), MediaKind::Manga);
        assert_eq!(MediaKind::Anime.to_string(), "anime");
        assert!("novel".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_watch_date_display() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let month = WatchDate { date, precision: DatePrecision::Month };
        assert_eq!(month.to_string(), "2020-05");
        assert_eq!(month.month(), Some(5));
        assert_eq!(month.day(), None);

        let year = WatchDate { date, precision: DatePrecision::Year };
        assert_eq!(year.to_string(), "2020");
        assert_eq!(year.month(), None);
    }

    #[test]
    fn test_user_record_from_progress() {
        let anime = AnimeRecord {
            mal_id: 1,
            name: "Example Show".to_string(),
            related_anime: vec![],
            related_manga: vec![],
            airing_state: AiringState::Finished,
            episodes: Some(12),
        };

        let record = UserWatchRecord::new(anime, "someone", WatchProgress::not_in_list());
        assert_eq!(record.name(), "Example Show");
        assert_eq!(record.watch_state, WatchState::NotInList);
        assert!(record.tags.is_empty());
        assert_eq!(record.episodes_watched, 0);

        let json = serde_json::to_string(&record.watch_state).unwrap();
        assert_eq!(json, "\"not-in-list\"");
    }
}
