//! Media and content links built from ids found in loaded tables

use std::fmt;
use std::str::FromStr;
use url::{ParseError, Url};

const TEAM_LOGO_BASE: &str = "https://www.mlbstatic.com/team-logos";
const HEADSHOT_BASE: &str = "https://securea.mlb.com/mlb/images/players/head_shot";
const FILM_ROOM_SEARCH: &str = "https://www.mlb.com/video/search";
const CONTENT_BASE: &str = "https://www.mlb.com";

/// Kind of content piece behind a slug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Article,
    Video,
}

impl ContentKind {
    /// Path segment the site files this kind under
    pub fn path_segment(self) -> &'static str {
        match self {
            ContentKind::Article => "news",
            ContentKind::Video => "video",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Article => f.write_str("article"),
            ContentKind::Video => f.write_str("video"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(ContentKind::Article),
            "video" => Ok(ContentKind::Video),
            other => Err(format!("unknown content type `{}`", other)),
        }
    }
}

/// SVG logo for a team id
pub fn team_logo_url(team_id: u64) -> String {
    format!("{}/{}.svg", TEAM_LOGO_BASE, team_id)
}

/// Current headshot for a player id
pub fn player_headshot_url(player_id: u64) -> String {
    format!("{}/{}.jpg", HEADSHOT_BASE, player_id)
}

/// Film Room search that finds the video for one play
pub fn film_room_search_url(play_id: &str) -> Result<Url, ParseError> {
    let query = format!("playid=\"{}\"", play_id);
    Url::parse_with_params(FILM_ROOM_SEARCH, &[("q", query.as_str())])
}

/// Public page for an article or video slug
///
/// The slug is pushed as a single path segment, so `/`, `?` and `#` in it
/// are percent-encoded rather than read as URL structure.
pub fn content_url(kind: ContentKind, slug: &str) -> Result<Url, ParseError> {
    let mut url = Url::parse(CONTENT_BASE)?;
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(kind.path_segment())
        .push(slug);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_logo_and_headshot() {
        assert_eq!(
            team_logo_url(119),
            "https://www.mlbstatic.com/team-logos/119.svg"
        );
        assert_eq!(
            player_headshot_url(660271),
            "https://securea.mlb.com/mlb/images/players/head_shot/660271.jpg"
        );
    }

    #[test]
    fn test_film_room_query_is_encoded() {
        let url = film_room_search_url("560a2f9b-9589-4e4b-95f5-2ef796334a94").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.mlb.com/video/search?q=playid%3D%22560a2f9b-9589-4e4b-95f5-2ef796334a94%22"
        );

        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "q");
        assert_eq!(value, "playid=\"560a2f9b-9589-4e4b-95f5-2ef796334a94\"");
    }

    #[test]
    fn test_content_url() {
        let article =
            content_url(ContentKind::Article, "every-2024-mlb-trade-deadline-deal").unwrap();
        assert_eq!(
            article.as_str(),
            "https://www.mlb.com/news/every-2024-mlb-trade-deadline-deal"
        );

        let video = content_url("video".parse().unwrap(), "walk-off-grand-slam").unwrap();
        assert_eq!(video.as_str(), "https://www.mlb.com/video/walk-off-grand-slam");
    }

    #[test]
    fn test_content_url_keeps_slug_in_one_segment() {
        let url = content_url(ContentKind::Article, "a/b?c#d").unwrap();
        assert_eq!(url.as_str(), "https://www.mlb.com/news/a%2Fb%3Fc%23d");
        assert_eq!(url.path_segments().unwrap().count(), 2);
        assert!(url.query().is_none());
    }

    #[test]
    fn test_content_kind_parse() {
        assert_eq!("article".parse::<ContentKind>(), Ok(ContentKind::Article));
        assert!("podcast".parse::<ContentKind>().is_err());
        assert_eq!(ContentKind::Video.to_string(), "video");
    }
}
