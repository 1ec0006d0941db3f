use std::fmt;

use serde::{Deserialize, Serialize};

use super::title::TitleNames;
use crate::error::{Result, ShirabeError};

/// Season marker text and the season number it resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonInfo {
    /// Marker as it appeared, e.g. `S02` or `第二季`.
    pub raw: Option<String>,
    /// Resolved season number. Unset means a single-season release.
    pub number: Option<u32>,
}

/// Episode marker text and the episode number it resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    /// Marker as it appeared, e.g. `22`, `第05话`, `26v2`.
    pub raw: Option<String>,
    /// Parsed episode number.
    pub number: Option<u32>,
}

/// The structured record extracted from one release title.
///
/// Every field is independently optional: a pattern that is not found
/// leaves its field unset rather than failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Release group name, usually the first bracketed token.
    pub group: Option<String>,

    /// Canonical show title with season markers stripped.
    pub title: String,

    /// Per-script show names the title was chosen from.
    pub names: TitleNames,

    /// Season marker and number.
    pub season: SeasonInfo,

    /// Episode marker and number.
    pub episode: EpisodeInfo,

    /// Resolution tag, e.g. `1920X1080` or `1080P`.
    pub resolution: Option<String>,

    /// Subtitle language tag, e.g. `GB`, `CHT`, `简日双语`.
    pub subtitle: Option<String>,

    /// Remaining tags (codec, container, source) in their original order.
    pub source_tags: Vec<String>,
}

impl Episode {
    /// Season number with the single-season default applied.
    #[must_use]
    pub fn season_number(&self) -> u32 {
        self.season.number.unwrap_or(1)
    }

    /// Returns `true` if anything beyond the title was recognized.
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        self.group.is_some()
            || self.season.number.is_some()
            || self.episode.number.is_some()
            || self.resolution.is_some()
            || self.subtitle.is_some()
            || !self.source_tags.is_empty()
    }

    /// `S02E22` style code used when organizing files on disk.
    ///
    /// # Errors
    ///
    /// Returns `ShirabeError::MissingField` if no episode number was recognized.
    pub fn episode_code(&self) -> Result<String> {
        let episode = self
            .episode
            .number
            .ok_or(ShirabeError::MissingField("episode"))?;
        Ok(format!("S{:02}E{episode:02}", self.season_number()))
    }

    pub(crate) fn push_source_tag(&mut self, tag: String) {
        if !tag.is_empty() && !self.source_tags.contains(&tag) {
            self.source_tags.push(tag);
        }
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Episode(title={:?}", self.title)?;
        if let Some(ref group) = self.group {
            write!(f, ", group={group:?}")?;
        }
        write!(f, ", season={}", self.season_number())?;
        if let Some(ep) = self.episode.number {
            write!(f, ", ep={ep:02}")?;
        }
        if let Some(ref res) = self.resolution {
            write!(f, ", res={res}")?;
        }
        if let Some(ref sub) = self.subtitle {
            write!(f, ", sub={sub}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_episode_is_empty() {
        let ep = Episode::default();
        assert!(ep.title.is_empty());
        assert!(!ep.has_metadata());
        assert_eq!(ep.season_number(), 1);
    }

    #[test]
    fn season_number_uses_parsed_value() {
        let mut ep = Episode::default();
        ep.season.number = Some(3);
        assert_eq!(ep.season_number(), 3);
        assert!(ep.has_metadata());
    }

    #[test]
    fn episode_code_formats_with_default_season() {
        let mut ep = Episode::default();
        assert!(matches!(
            ep.episode_code(),
            Err(ShirabeError::MissingField("episode"))
        ));

        ep.episode.number = Some(7);
        assert_eq!(ep.episode_code().unwrap(), "S01E07");

        ep.season.number = Some(2);
        ep.episode.number = Some(122);
        assert_eq!(ep.episode_code().unwrap(), "S02E122");
    }

    #[test]
    fn source_tags_skip_duplicates() {
        let mut ep = Episode::default();
        ep.push_source_tag("MP4".into());
        ep.push_source_tag("Baha".into());
        ep.push_source_tag("MP4".into());
        ep.push_source_tag(String::new());
        assert_eq!(ep.source_tags, vec!["MP4", "Baha"]);
    }

    #[test]
    fn display_summary() {
        let mut ep = Episode {
            title: "Mushoku Tensei".into(),
            group: Some("Lilith-Raws".into()),
            resolution: Some("1080p".into()),
            ..Default::default()
        };
        ep.episode.number = Some(11);
        let display = ep.to_string();
        assert!(display.contains("Mushoku Tensei"));
        assert!(display.contains("ep=11"));
        assert!(display.contains("season=1"));
        assert!(display.contains("res=1080p"));
    }

    #[test]
    fn episode_serialization_roundtrip() {
        let mut ep = Episode {
            title: "Komi-san wa, Komyushou Desu.".into(),
            group: Some("幻樱字幕组".into()),
            resolution: Some("1920X1080".into()),
            subtitle: Some("GB".into()),
            source_tags: vec!["MP4".into()],
            ..Default::default()
        };
        ep.season = SeasonInfo {
            raw: Some("第二季".into()),
            number: Some(2),
        };
        ep.episode = EpisodeInfo {
            raw: Some("22".into()),
            number: Some(22),
        };

        let json = serde_json::to_string(&ep).unwrap();
        let back: Episode = serde_json::from_str(&json).unwrap();
        assert_eq!(ep, back);
    }
}
