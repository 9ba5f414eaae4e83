//! Anime detail page parsing.
//!
//! The page has no structured data worth relying on, so fields are found by
//! DOM position (title heading, related block) or by the text labels of the
//! information sidebar. Only the title is required; every other field falls
//! back to an empty or unknown value when the page layout does not match.

use super::{selector, url::parse_mal_url};
use crate::error::{Error, Result};
use scraper::Html;
use shared::{AiringState, AnimeRecord, MediaKind};
use tracing::debug;

/// Build an [`AnimeRecord`] from the HTML of an anime detail page
pub fn parse_anime(content: &str, mal_id: u32) -> Result<AnimeRecord> {
    let document = Html::parse_document(content);

    let name = parse_name(&document)?;
    let (related_anime, related_manga) = parse_related(&document)?;

    let airing_state = parse_airing_state(content).unwrap_or_else(|e| {
        debug!(mal_id, error = %e, "Airing state not found");
        AiringState::Unknown
    });

    let episodes = match parse_episodes(content) {
        Ok(episodes) => Some(episodes),
        Err(e) => {
            debug!(mal_id, error = %e, "Episode count not available");
            None
        }
    };

    Ok(AnimeRecord {
        mal_id,
        name,
        related_anime,
        related_manga,
        airing_state,
        episodes,
    })
}

/// Text of the first `h1` heading
pub fn parse_name(document: &Html) -> Result<String> {
    let h1 = selector("h1")?;

    document
        .select(&h1)
        .next()
        .map(|heading| heading.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(Error::MissingField("name"))
}

/// Ids linked from the related-titles block, split into anime and manga.
///
/// Page order is kept and duplicates are not removed. Links that are
/// neither anime nor manga pages are ignored; a missing block gives two
/// empty lists.
pub fn parse_related(document: &Html) -> Result<(Vec<u32>, Vec<u32>)> {
    let block = selector(".anime_detail_related_anime")?;
    let link = selector("a[href]")?;

    let mut anime = Vec::new();
    let mut manga = Vec::new();

    let Some(table) = document.select(&block).next() else {
        return Ok((anime, manga));
    };

    for entry in table.select(&link) {
        let href = entry.value().attr("href").unwrap_or_default();
        match parse_mal_url(href) {
            Some((MediaKind::Anime, id)) => anime.push(id),
            Some((MediaKind::Manga, id)) => manga.push(id),
            None => debug!(href = %href, "Ignoring related link"),
        }
    }

    Ok((anime, manga))
}

/// Value of the `Status:` sidebar entry
pub fn parse_airing_state(content: &str) -> Result<AiringState> {
    label_value(content, "Status:")
        .map(|label| AiringState::from_label(&label))
        .ok_or(Error::MissingOptionalField("status"))
}

/// Value of the `Episodes:` sidebar entry; `Unknown` counts as missing
pub fn parse_episodes(content: &str) -> Result<u32> {
    label_value(content, "Episodes:")
        .and_then(|value| value.replace(',', "").parse().ok())
        .ok_or(Error::MissingOptionalField("episodes"))
}

/// Text following a sidebar label, up to the end of its `div`.
///
/// Sidebar entries look like
/// `<div><span class="dark_text">Status:</span> Finished Airing </div>`.
/// The labelled form is preferred; the bare label is the fallback.
fn label_value(content: &str, label: &str) -> Option<String> {
    let labelled = format!("{}</span>", label);
    let start = match content.find(&labelled) {
        Some(index) => index + labelled.len(),
        None => content.find(label)? + label.len(),
    };

    let rest = &content[start..];
    let raw = &rest[..rest.find("</div>").unwrap_or(rest.len())];

    let fragment = Html::parse_fragment(raw);
    let text = fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
