//! Episode label normalization.
//!
//! Remote comment services index episodes by ordinal number or by a literal
//! `"movie"` marker, while upstream metadata labels episodes in a variety of
//! human-facing formats ("第01集", "全集", "07", "SP2"). This module maps a
//! raw label to the query token the service expects, or signals that no
//! query should be made at all.
//!
//! # Examples
//!
//! ```rust
//! use maku::episode::{self, EpisodeToken};
//!
//! assert_eq!(episode::normalize(Some("第01集")).unwrap().to_string(), "01");
//! assert_eq!(episode::normalize(Some("剧场版")), Some(EpisodeToken::Movie));
//! assert_eq!(episode::normalize(Some("OVA")), None);
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Labels meaning "complete collection", "HD re-release", or "feature film"
/// all resolve to the movie marker rather than an episode ordinal.
static MOVIE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new("全集|HD|剧场版").expect("invalid movie marker pattern"));

/// The normalized query token a remote comment service understands.
///
/// Produced by [`normalize`]; rendered into the search query via `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeToken {
    /// The literal `"movie"` marker for feature films and collections
    Movie,
    /// An ordinal digit string, e.g. `"01"` or `"7"`
    Ordinal(String),
}

impl fmt::Display for EpisodeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeToken::Movie => f.write_str("movie"),
            EpisodeToken::Ordinal(digits) => f.write_str(digits),
        }
    }
}

/// Maps a raw episode label to its query token.
///
/// Returns `None` for labels that must not trigger a query:
///
/// - missing or blank input;
/// - labels with an episode marker (`集`) but no digits;
/// - any format that is neither a movie marker, an episode-marker label,
///   nor a bare number ("SP", "OVA", arbitrary text).
///
/// Otherwise:
///
/// - a movie marker anywhere in the label yields [`EpisodeToken::Movie`];
/// - a label containing `集` yields the digits it contains
///   (`"第01集"` → `"01"`);
/// - an all-digit label is returned unchanged (`"07"` → `"07"`), covering
///   sources that number episodes without any marker.
///
/// Pure and side-effect free; providers call this before deciding whether
/// to touch the network.
pub fn normalize(episode_name: Option<&str>) -> Option<EpisodeToken> {
    let name = episode_name?.trim();
    if name.is_empty() {
        return None;
    }

    if MOVIE_MARKER.is_match(name) {
        return Some(EpisodeToken::Movie);
    }

    if name.contains('集') {
        let digits: String = name.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        return Some(EpisodeToken::Ordinal(digits));
    }

    if name.chars().all(|c| c.is_ascii_digit()) {
        return Some(EpisodeToken::Ordinal(name.to_string()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_markers() {
        assert_eq!(normalize(Some("剧场版")), Some(EpisodeToken::Movie));
        assert_eq!(normalize(Some("剧场版HD")), Some(EpisodeToken::Movie));
        assert_eq!(normalize(Some("全集")), Some(EpisodeToken::Movie));
        assert_eq!(normalize(Some("HD中字")), Some(EpisodeToken::Movie));
    }

    #[test]
    fn test_episode_marker_keeps_digits() {
        assert_eq!(
            normalize(Some("第01集")),
            Some(EpisodeToken::Ordinal("01".to_string()))
        );
        assert_eq!(
            normalize(Some("第1集")),
            Some(EpisodeToken::Ordinal("1".to_string()))
        );
        assert_eq!(
            normalize(Some("【第08集】")),
            Some(EpisodeToken::Ordinal("08".to_string()))
        );
    }

    #[test]
    fn test_bare_number_unchanged() {
        assert_eq!(
            normalize(Some("07")),
            Some(EpisodeToken::Ordinal("07".to_string()))
        );
        assert_eq!(
            normalize(Some("7")),
            Some(EpisodeToken::Ordinal("7".to_string()))
        );
    }

    #[test]
    fn test_skip_cases() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(Some("SP")), None);
        assert_eq!(normalize(Some("OVA")), None);
        assert_eq!(normalize(Some("特别篇")), None);
        // episode marker but no digits to extract
        assert_eq!(normalize(Some("第几集")), None);
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(EpisodeToken::Movie.to_string(), "movie");
        assert_eq!(EpisodeToken::Ordinal("01".to_string()).to_string(), "01");
    }
}
