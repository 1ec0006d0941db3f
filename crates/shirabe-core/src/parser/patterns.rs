//! # Recognizer table
//!
//! Every field the analyser fills is described by one [`Rule`] in
//! [`RULES`]. The analyser walks the table in order; the rule decides where
//! it may look ([`Scope`]), whether it matches whole tokens or fragments
//! inside them ([`Reach`]), and which match wins when several tokens qualify
//! ([`Pick`]). Field-specific matching lives in [`Patterns`], compiled once.

use std::ops::Range;

use regex::Regex;

use crate::error::Result;

/// Field a rule fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Promotional or recruiting text; claimed and dropped.
    Noise,
    /// Resolution tag.
    Resolution,
    /// Episode number.
    Episode,
    /// Season marker.
    Season,
    /// Release group.
    Group,
    /// Subtitle language and source/codec/container tags.
    Tag,
}

/// Which tokens a rule may inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the bracketed lead token.
    Lead,
    /// Every token except a reserved lead.
    AfterLead,
}

/// How much of a token a rule must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// The whole token.
    Whole,
    /// Fragments inside a token; the token is split around them.
    Embedded,
    /// Whole tokens first, fragments only if no whole token matched.
    WholeThenEmbedded,
}

/// Which match wins when several qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// The first in token order.
    First,
    /// Episode tie-break: the last short number before the trailing tag block.
    LastBeforeTags,
    /// All of them.
    Every,
}

/// One entry of the recognizer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub field: Field,
    pub scope: Scope,
    pub reach: Reach,
    pub pick: Pick,
}

/// Recognizers in priority order. A token is claimed by at most one rule.
pub const RULES: &[Rule] = &[
    Rule {
        field: Field::Noise,
        scope: Scope::AfterLead,
        reach: Reach::Embedded,
        pick: Pick::Every,
    },
    Rule {
        field: Field::Resolution,
        scope: Scope::AfterLead,
        reach: Reach::WholeThenEmbedded,
        pick: Pick::First,
    },
    Rule {
        field: Field::Episode,
        scope: Scope::AfterLead,
        reach: Reach::WholeThenEmbedded,
        pick: Pick::LastBeforeTags,
    },
    Rule {
        field: Field::Season,
        scope: Scope::AfterLead,
        reach: Reach::Embedded,
        pick: Pick::Every,
    },
    Rule {
        field: Field::Group,
        scope: Scope::Lead,
        reach: Reach::Whole,
        pick: Pick::First,
    },
    Rule {
        field: Field::Tag,
        scope: Scope::AfterLead,
        reach: Reach::Whole,
        pick: Pick::Every,
    },
];

/// CJK numerals used in season ordinals (`第二季`).
pub const CJK_DIGITS: &[(char, u32)] = &[
    ('零', 0),
    ('〇', 0),
    ('一', 1),
    ('二', 2),
    ('两', 2),
    ('三', 3),
    ('四', 4),
    ('五', 5),
    ('六', 6),
    ('七', 7),
    ('八', 8),
    ('九', 9),
];

/// Latin subtitle language codes, matched case-insensitively per word.
pub const SUBTITLE_CODES: &[&str] = &[
    "gb", "big5", "chs", "cht", "sc", "tc", "jp", "jpn", "cn", "eng",
];

/// What a rule extracted from a token or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Noise,
    Resolution(String),
    Episode {
        raw: String,
        number: u32,
        /// Number of digits in the marker, used by the tie-break.
        digits: usize,
    },
    Season {
        raw: String,
        number: Option<u32>,
    },
    Group(String),
    Tag {
        subtitle: Option<String>,
        source: Option<String>,
    },
}

/// Pre-compiled recognizer patterns.
pub struct Patterns {
    re_noise: Regex,
    re_resolution: Regex,
    re_episode: Regex,
    re_episode_marked: Regex,
    re_season: Regex,
    re_subtitle_cjk: Regex,
    re_source: Regex,
    re_tag_split: Regex,
}

impl Patterns {
    /// Compiles the recognizer patterns.
    ///
    /// # Errors
    ///
    /// Returns `ShirabeError::Regex` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_noise: Regex::new(concat!(
                r"[★☆]*(?:\d{4}年)?(?:[春夏秋冬]季?)?(?:\d{1,2}|[一二三四五六七八九十]{1,3})月新?番[★☆]*",
                r"|^[★☆]*[新旧老冷]番[★☆]*$",
                r"|\([^()]*(?:招募|招人|仅限港澳台)[^()]*\)",
                r"|^[^\s()]*(?:招募|招人)[^\s()]*$",
                r"|仅限港澳台地区",
            ))?,
            re_resolution: Regex::new(r"(?i)^(?:(\d{3,4})x(\d{3,4})|\d{3,4}[pi]\+?|[248]k)$")?,
            re_episode: Regex::new(
                r"(?i)^(?:第|ep?\.?\s?)?(\d{1,4})(?:[话話集]|\s?v\d{1,2}|\s?end|\s?fin|\s?pre)?$",
            )?,
            re_episode_marked: Regex::new(r"(?i)^(?:第(\d{1,4})[话話集]|ep?\.?(\d{1,4}))$")?,
            re_season: Regex::new(concat!(
                r"(?i)第([零〇一二两三四五六七八九十百\d]{1,3})[季期]",
                r"|(?-u:\b)s(\d{1,2})(?-u:\b)",
                r"|(?-u:\b)season\s?(\d{1,2})(?-u:\b)",
                r"|(?-u:\b)(\d{1,2})(?:st|nd|rd|th)\s+season(?-u:\b)",
            ))?,
            re_subtitle_cjk: Regex::new(
                r"^[简繁中日英粤双雙内外][简繁中日英粤双雙体體文语語字幕内外封嵌挂掛]+$",
            )?,
            re_source: Regex::new(concat!(
                r"(?i)^(?:[xh]\.?26[45]|hevc|avc|av1|vp9|hi10p|ma10p",
                r"|(?:hevc|avc|x26[45])?-?(?:10|8)-?bits?",
                r"|aac|flac|opus|ac3|eac3|dts|mp3",
                r"|mp4|mkv|avi|ass|srt|pgs",
                r"|web|web-?dl|web-?rip|bd|bd-?rip|bdmv|blu-?ray|remux|dvd|dvd-?rip|hdtv|tv-?rip",
                r"|baha|b-global|bilibili|abema|netflix|cr|at-x|viutv|tvb|iqiyi|youku)$",
            ))?,
            re_tag_split: Regex::new(r"[\s_/+&]+")?,
        })
    }

    /// Matches `text` as a whole token for `field`.
    pub fn capture_whole(&self, field: Field, text: &str) -> Option<Capture> {
        match field {
            Field::Noise => self
                .re_noise
                .find(text)
                .filter(|m| m.range() == (0..text.len()))
                .map(|_| Capture::Noise),
            Field::Resolution => self.resolution(text),
            Field::Episode => self.episode(text),
            Field::Season => self
                .capture_embedded(Field::Season, text)
                .into_iter()
                .find(|(range, _)| *range == (0..text.len()))
                .map(|(_, capture)| capture),
            Field::Group => self.group(text),
            Field::Tag => self.tag(text),
        }
    }

    /// Finds every fragment of `text` that matches `field`, in text order.
    pub fn capture_embedded(&self, field: Field, text: &str) -> Vec<(Range<usize>, Capture)> {
        match field {
            Field::Noise => self
                .re_noise
                .find_iter(text)
                .map(|m| (m.range(), Capture::Noise))
                .collect(),
            Field::Resolution => words(text)
                .filter_map(|(range, word)| self.resolution(word).map(|c| (range, c)))
                .collect(),
            Field::Episode => words(text)
                .filter_map(|(range, word)| self.marked_episode(word).map(|c| (range, c)))
                .collect(),
            Field::Season => self
                .re_season
                .captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let number = if let Some(ordinal) = caps.get(1) {
                        parse_ordinal(ordinal.as_str())
                    } else {
                        caps.get(2)
                            .or_else(|| caps.get(3))
                            .or_else(|| caps.get(4))
                            .and_then(|m| m.as_str().parse().ok())
                    };
                    Some((
                        whole.range(),
                        Capture::Season {
                            raw: whole.as_str().to_string(),
                            number,
                        },
                    ))
                })
                .collect(),
            Field::Group | Field::Tag => Vec::new(),
        }
    }

    /// Returns `true` if `text` is entirely made of tag vocabulary.
    pub fn is_tag(&self, text: &str) -> bool {
        self.tag(text).is_some()
    }

    fn resolution(&self, text: &str) -> Option<Capture> {
        let caps = self.re_resolution.captures(text)?;
        let canonical = match (caps.get(1), caps.get(2)) {
            (Some(w), Some(h)) => format!("{}X{}", w.as_str(), h.as_str()),
            _ => text.to_string(),
        };
        Some(Capture::Resolution(canonical))
    }

    fn episode(&self, text: &str) -> Option<Capture> {
        let digits = self.re_episode.captures(text)?.get(1)?.as_str();
        let number: u32 = digits.parse().ok()?;
        // A bare four-digit token in this range is a year, not an episode.
        if digits.len() == 4 && (1900..=2099).contains(&number) && digits == text {
            return None;
        }
        Some(Capture::Episode {
            raw: text.to_string(),
            number,
            digits: digits.len(),
        })
    }

    fn marked_episode(&self, word: &str) -> Option<Capture> {
        let caps = self.re_episode_marked.captures(word)?;
        let digits = caps.get(1).or_else(|| caps.get(2))?.as_str();
        Some(Capture::Episode {
            raw: word.to_string(),
            number: digits.parse().ok()?,
            digits: digits.len(),
        })
    }

    fn group(&self, text: &str) -> Option<Capture> {
        let looks_like_field = self.resolution(text).is_some()
            || self.episode(text).is_some()
            || self.tag(text).is_some()
            || self.capture_whole(Field::Season, text).is_some()
            || self.capture_whole(Field::Noise, text).is_some();
        (!looks_like_field).then(|| Capture::Group(text.to_string()))
    }

    fn tag(&self, text: &str) -> Option<Capture> {
        let mut subtitle = Vec::new();
        let mut source = Vec::new();
        for word in self.re_tag_split.split(text).filter(|w| !w.is_empty()) {
            if self.is_subtitle_word(word) {
                subtitle.push(word);
            } else if self.re_source.is_match(word) {
                source.push(word);
            } else {
                return None;
            }
        }

        match (subtitle.is_empty(), source.is_empty()) {
            (true, true) => None,
            (false, true) => Some(Capture::Tag {
                subtitle: Some(text.to_string()),
                source: None,
            }),
            _ => Some(Capture::Tag {
                subtitle: (!subtitle.is_empty()).then(|| subtitle.join(" ")),
                source: (!source.is_empty()).then(|| source.join(" ")),
            }),
        }
    }

    fn is_subtitle_word(&self, word: &str) -> bool {
        SUBTITLE_CODES.iter().any(|c| word.eq_ignore_ascii_case(c))
            || self.re_subtitle_cjk.is_match(word)
    }
}

/// Whitespace-separated words of `text` with their byte ranges.
fn words(text: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
    text.split_whitespace().map(move |word| {
        // `split_whitespace` yields subslices of `text`, so the offset is exact.
        let start = word.as_ptr() as usize - text.as_ptr() as usize;
        (start..start + word.len(), word)
    })
}

/// Parses a season ordinal written with Arabic or CJK digits.
///
/// Handles compounds such as `十二` (12) and `二十一` (21).
pub fn parse_ordinal(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }

    let mut total = 0u32;
    let mut pending = 0u32;
    for c in s.chars() {
        match c {
            '十' => {
                total += pending.max(1) * 10;
                pending = 0;
            }
            '百' => {
                total += pending.max(1) * 100;
                pending = 0;
            }
            _ => {
                pending = CJK_DIGITS.iter().find(|(d, _)| *d == c)?.1;
            }
        }
    }

    Some(total + pending).filter(|n| *n > 0)
}
