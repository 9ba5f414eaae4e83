//! High level access to anime records and user watch progress.
//!
//! Ties the fetch cache to the record parser: every call resolves its page
//! through the cache, then parses it.

use crate::api::{LinearBackoff, MalClient, ReqwestClient};
use crate::cache::FetchCache;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::parser::{self, UserListItem};
use shared::{AnimeRecord, CachePaths, Config, MediaKind, UserWatchRecord};
use std::rc::Rc;
use tracing::{debug, info};

/// Record loader for MyAnimeList
pub struct MalScraper {
    cache: FetchCache,
}

impl MalScraper {
    /// Create a new scraper on top of an existing cache
    pub fn new(cache: FetchCache) -> Self {
        Self { cache }
    }

    /// Build the HTTP client, clock and cache described by a configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ReqwestClient::new(&config.scraper.user_agent, config.timeout())?;
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);

        let client = MalClient::new(
            Box::new(http),
            Rc::clone(&clock),
            config.scraper.base_url.clone(),
            LinearBackoff::new(config.scraper.max_attempts, config.retry_delay()),
        );

        let mut cache = FetchCache::new(
            CachePaths::new(config.cache_dir()),
            client,
            clock,
            config.flush_time(),
        )?;

        if config.scraper.cache.preload {
            cache.preload()?;
        }

        Ok(Self::new(cache))
    }

    /// Load an anime record by id
    pub fn anime(&mut self, mal_id: u32) -> Result<AnimeRecord> {
        let content = self.cache.get(MediaKind::Anime, mal_id)?;
        let record = parser::parse_anime(&content, mal_id)?;

        debug!(
            mal_id,
            name = %record.name,
            related_anime = record.related_anime.len(),
            related_manga = record.related_manga.len(),
            "Parsed anime"
        );
        Ok(record)
    }

    /// Load an anime record from a detail page URL
    pub fn anime_from_url(&mut self, url: &str) -> Result<AnimeRecord> {
        match parser::parse_mal_url(url) {
            Some((MediaKind::Anime, mal_id)) => self.anime(mal_id),
            _ => Err(Error::InvalidUrl(url.to_string())),
        }
    }

    /// Load an anime record together with a user's progress on it
    pub fn user_anime(&mut self, mal_id: u32, username: &str) -> Result<UserWatchRecord> {
        let anime = self.anime(mal_id)?;
        self.with_user_progress(anime, username)
    }

    /// Attach a user's progress to an already loaded record
    pub fn with_user_progress(
        &mut self,
        anime: AnimeRecord,
        username: &str,
    ) -> Result<UserWatchRecord> {
        let list = self.cache.get_user_list(username)?;
        let progress = parser::parse_user_entry(&list, &anime.name)?;

        debug!(
            mal_id = anime.mal_id,
            username = %username,
            watch_state = %progress.watch_state,
            "Matched user progress"
        );
        Ok(UserWatchRecord::new(anime, username, progress))
    }

    /// Every entry of a user's list, each parsed on its own and keyed by title
    pub fn user_list(
        &mut self,
        username: &str,
    ) -> Result<Vec<(String, Result<UserListItem>)>> {
        let list = self.cache.get_user_list(username)?;
        parser::parse_user_list(&list)
    }

    /// Load the user's progress on every anime related to `record`.
    ///
    /// Failures are reported per id so one broken page does not hide the
    /// others.
    pub fn related_user_anime(
        &mut self,
        record: &AnimeRecord,
        username: &str,
    ) -> Vec<(u32, Result<UserWatchRecord>)> {
        info!(
            mal_id = record.mal_id,
            related = record.related_anime.len(),
            "Loading related anime"
        );

        record
            .related_anime
            .iter()
            .map(|&mal_id| (mal_id, self.user_anime(mal_id, username)))
            .collect()
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut FetchCache {
        &mut self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_FLUSH_TIME;
    use crate::testing::{FakeClock, FakeHttpClient};
    use shared::{AiringState, WatchState};
    use std::time::Duration;
    use tempfile::TempDir;

    const SHOW: &str = r#"<html><body>
        <h1 class="title-name"><strong>Example Show</strong></h1>
        <div><span class="dark_text">Episodes:</span> 12 </div>
        <div><span class="dark_text">Status:</span> Finished Airing </div>
        <table class="anime_detail_related_anime">
          <tr><td><a href="/anime/2/Example_Show_2">Example Show 2</a></td></tr>
          <tr><td><a href="/manga/456/Example_Manga">Example Manga</a></td></tr>
        </table>
    </body></html>"#;

    const SEQUEL: &str = r#"<html><body>
        <h1>Example Show 2</h1>
        <div><span class="dark_text">Episodes:</span> Unknown </div>
        <div><span class="dark_text">Status:</span> Currently Airing </div>
    </body></html>"#;

    const LIST: &str = r#"<myanimelist>
        <anime>
            <series_animedb_id>1</series_animedb_id>
            <series_title><![CDATA[Example Show]]></series_title>
            <my_watched_episodes>12</my_watched_episodes>
            <my_start_date>2020-05-15</my_start_date>
            <my_finish_date>2020-05-00</my_finish_date>
            <my_status>2</my_status>
            <my_tags><![CDATA[fav]]></my_tags>
        </anime>
    </myanimelist>"#;

    fn scraper(http: &Rc<FakeHttpClient>, temp_dir: &TempDir) -> Result<MalScraper> {
        let clock = Rc::new(FakeClock::new());
        let client = MalClient::new(
            Box::new(Rc::clone(http)),
            clock.clone(),
            "https://myanimelist.net",
            LinearBackoff::new(3, Duration::from_secs(1)),
        );
        let cache = FetchCache::new(
            CachePaths::new(temp_dir.path()),
            client,
            clock,
            DEFAULT_FLUSH_TIME,
        )?;
        Ok(MalScraper::new(cache))
    }

    #[test]
    fn test_user_anime_matches_title() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let http = Rc::new(FakeHttpClient::new());
        http.push(200, SHOW);
        http.push(200, LIST);
        let mut scraper = scraper(&http, &temp_dir)?;

        let record = scraper.user_anime(1, "someone")?;

        assert_eq!(record.name(), "Example Show");
        assert_eq!(record.username, "someone");
        assert_eq!(record.watch_state, WatchState::Completed);
        assert_eq!(record.tags, vec!["fav"]);
        assert_eq!(record.episodes_watched, 12);
        assert_eq!(record.anime.episodes, Some(12));
        assert_eq!(record.anime.related_manga, vec![456]);

        Ok(())
    }

    #[test]
    fn test_related_user_anime() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let http = Rc::new(FakeHttpClient::new());
        http.push(200, SHOW);
        http.push(200, SEQUEL);
        http.push(200, LIST);
        let mut scraper = scraper(&http, &temp_dir)?;

        let record = scraper.anime(1)?;
        let related = scraper.related_user_anime(&record, "someone");

        assert_eq!(related.len(), 1);
        let (mal_id, sequel) = &related[0];
        assert_eq!(*mal_id, 2);
        let sequel = sequel.as_ref().unwrap();
        assert_eq!(sequel.watch_state, WatchState::NotInList);
        assert_eq!(sequel.episodes_watched, 0);
        assert_eq!(sequel.anime.airing_state, AiringState::Airing);
        assert_eq!(sequel.anime.episodes, None);

        // Second pass is served from the cache
        let again = scraper.related_user_anime(&record, "someone");
        assert!(again[0].1.is_ok());
        assert_eq!(http.request_count(), 3);

        Ok(())
    }

    #[test]
    fn test_failures_are_returned_not_fatal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let http = Rc::new(FakeHttpClient::new());
        http.push(404, "");
        http.push(200, "<html><body>no heading</body></html>");
        let mut scraper = scraper(&http, &temp_dir)?;

        assert!(scraper.anime(10).unwrap_err().is_network());
        assert!(matches!(
            scraper.anime(11).unwrap_err(),
            Error::MissingField("name")
        ));

        Ok(())
    }

    #[test]
    fn test_anime_from_url() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let http = Rc::new(FakeHttpClient::new());
        http.push(200, SHOW);
        let mut scraper = scraper(&http, &temp_dir)?;

        let record = scraper.anime_from_url("https://myanimelist.net/anime/1/Example_Show")?;
        assert_eq!(record.mal_id, 1);
        assert_eq!(http.requests(), vec!["https://myanimelist.net/anime/1"]);

        assert!(matches!(
            scraper.anime_from_url("https://myanimelist.net/manga/1"),
            Err(Error::InvalidUrl(_))
        ));

        Ok(())
    }

    #[test]
    fn test_user_list() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let http = Rc::new(FakeHttpClient::new());
        http.push(200, LIST);
        let mut scraper = scraper(&http, &temp_dir)?;

        let items = scraper.user_list("someone")?;
        assert_eq!(items.len(), 1);
        let (title, item) = &items[0];
        assert_eq!(title, "Example Show");
        assert_eq!(item.as_ref().unwrap().mal_id, Some(1));

        Ok(())
    }
}
