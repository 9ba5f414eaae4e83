//! Resolving MyAnimeList links to (kind, id) pairs.

use shared::MediaKind;

/// Extract the media kind and id from a MyAnimeList link.
///
/// Accepts absolute or site-relative links in the forms
/// `/anime/<id>[/<slug>]`, `/manga/<id>[/<slug>]` and the legacy
/// `/anime.php?id=<id>`. The host is not checked.
pub fn parse_mal_url(url: &str) -> Option<(MediaKind, u32)> {
    let url = url.trim();
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            &rest[rest.find('/')?..]
        }
        None => url,
    };

    let mut segments = path.trim_start_matches('/').split('/');
    let first = segments.next()?;

    if let Some((script, query)) = first.split_once('?') {
        let kind = match script {
            "anime.php" => MediaKind::Anime,
            "manga.php" => MediaKind::Manga,
            _ => return None,
        };
        let id = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("id="))?;
        return Some((kind, parse_id(id)?));
    }

    let kind = first.parse::<MediaKind>().ok()?;
    let id = segments.next()?;
    Some((kind, parse_id(id)?))
}

fn parse_id(raw: &str) -> Option<u32> {
    let digits = raw.split(['?', '#']).next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
