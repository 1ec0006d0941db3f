//! # Analyser
//!
//! Walks [`RULES`] over the token list and fills an [`Episode`].
//!
//! Tokens become slots. Each rule claims slots (or fragments of slots,
//! which are split out into slots of their own) and a claimed slot is
//! never offered to a later rule. Whatever is still free at the end is
//! either title text (before the episode marker) or a leftover tag.

use std::ops::Range;

use crate::error::Result;
use crate::parser::names::split_names;
use crate::parser::patterns::{Capture, Field, Patterns, Pick, Reach, RULES, Rule, Scope};
use crate::types::{Episode, TitleLanguage};

/// A token, or a piece of one, and the rule that claimed it.
#[derive(Debug, Clone)]
struct Slot {
    text: String,
    claim: Option<Field>,
    lead: bool,
    /// Index of the token this slot was cut from.
    token: usize,
}

impl Slot {
    fn free(text: impl Into<String>, lead: bool, token: usize) -> Self {
        Self {
            text: text.into(),
            claim: None,
            lead,
            token,
        }
    }

    fn is_free(&self) -> bool {
        self.claim.is_none()
    }

    fn in_scope(&self, scope: Scope) -> bool {
        match scope {
            Scope::Lead => self.lead,
            Scope::AfterLead => !self.lead,
        }
    }
}

/// A match found by a rule, not yet committed.
#[derive(Debug)]
struct Candidate {
    slot: usize,
    /// `None` when the whole slot matched.
    range: Option<Range<usize>>,
    capture: Capture,
}

/// Applies the recognizer table to tokenized titles.
pub struct Analyser {
    patterns: Patterns,
    title_order: Vec<TitleLanguage>,
}

impl Analyser {
    /// Creates an analyser that picks the display title in `title_order`.
    ///
    /// # Errors
    ///
    /// Returns `ShirabeError::Regex` if the recognizer patterns fail to compile.
    pub fn new(title_order: Vec<TitleLanguage>) -> Result<Self> {
        Ok(Self {
            patterns: Patterns::new()?,
            title_order,
        })
    }

    /// Builds an [`Episode`] from a standardized title and its tokens.
    ///
    /// A title without delimiters (a single token) is taken whole as the
    /// title; no recognizer runs on it.
    pub fn analyse<T: AsRef<str>>(&self, standardized: &str, tokens: &[T]) -> Episode {
        if tokens.len() <= 1 {
            let title = tokens
                .first()
                .map(|t| t.as_ref().trim().to_string())
                .unwrap_or_default();
            let mut episode = Episode::default();
            episode.names.raw = (!title.is_empty()).then(|| title.clone());
            episode.title = title;
            return episode;
        }

        let lead_reserved = standardized.trim_start().starts_with('[')
            && self
                .patterns
                .capture_whole(Field::Group, tokens[0].as_ref())
                .is_some();

        let mut slots: Vec<Slot> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| Slot::free(t.as_ref(), lead_reserved && i == 0, i))
            .collect();

        let mut episode = Episode::default();
        for rule in RULES {
            self.apply(rule, &mut slots, &mut episode);
        }
        self.assemble(&slots, &mut episode);
        episode
    }

    fn apply(&self, rule: &Rule, slots: &mut Vec<Slot>, episode: &mut Episode) {
        let eligible: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_free() && s.in_scope(rule.scope))
            .map(|(i, _)| i)
            .collect();

        let mut candidates = Vec::new();
        if matches!(rule.reach, Reach::Whole | Reach::WholeThenEmbedded) {
            candidates.extend(eligible.iter().filter_map(|&i| {
                self.patterns
                    .capture_whole(rule.field, &slots[i].text)
                    .map(|capture| Candidate {
                        slot: i,
                        range: None,
                        capture,
                    })
            }));
        }
        if rule.reach == Reach::Embedded
            || (rule.reach == Reach::WholeThenEmbedded && candidates.is_empty())
        {
            for &i in &eligible {
                candidates.extend(
                    self.patterns
                        .capture_embedded(rule.field, &slots[i].text)
                        .into_iter()
                        .map(|(range, capture)| Candidate {
                            slot: i,
                            range: Some(range),
                            capture,
                        }),
                );
            }
        }

        if candidates.is_empty() {
            return;
        }

        let chosen = match rule.pick {
            Pick::Every => candidates,
            Pick::First => {
                candidates.truncate(1);
                candidates
            }
            Pick::LastBeforeTags => {
                let boundary = self.tag_boundary(slots);
                let index = pick_episode(&candidates, boundary);
                vec![candidates.swap_remove(index)]
            }
        };

        for candidate in &chosen {
            record(episode, &candidate.capture);
        }

        // Reverse order keeps earlier slot indices and ranges valid while splicing.
        for candidate in chosen.into_iter().rev() {
            tracing::trace!(field = ?rule.field, slot = candidate.slot, "claimed");
            claim(slots, candidate.slot, candidate.range, rule.field);
        }
    }

    /// Index of the first slot of the trailing tag block.
    fn tag_boundary(&self, slots: &[Slot]) -> usize {
        slots
            .iter()
            .position(|s| {
                !s.lead
                    && match s.claim {
                        Some(field) => field == Field::Resolution,
                        None => self.patterns.is_tag(&s.text),
                    }
            })
            .unwrap_or(slots.len())
    }

    /// Free slots before the episode marker form the title. Without an
    /// episode marker, only the first token that still has free text does;
    /// every other free slot is a leftover tag.
    fn assemble(&self, slots: &[Slot], episode: &mut Episode) {
        let episode_at = slots.iter().position(|s| s.claim == Some(Field::Episode));
        let title_token = slots
            .iter()
            .find(|s| s.is_free() && !s.lead)
            .map(|s| s.token);
        let in_title = |i: usize| match episode_at {
            Some(boundary) => i < boundary,
            None => Some(slots[i].token) == title_token,
        };

        let mut parts = Vec::new();
        for (i, slot) in slots.iter().enumerate() {
            match slot.claim {
                None if in_title(i) => parts.push(slot.text.as_str()),
                None => episode
                    .push_source_tag(slot.text.split_whitespace().collect::<Vec<_>>().join(" ")),
                Some(Field::Tag) => {
                    if let Some(Capture::Tag { subtitle, source }) =
                        self.patterns.capture_whole(Field::Tag, &slot.text)
                    {
                        record_tag(episode, subtitle, source);
                    }
                }
                Some(_) => {}
            }
        }

        episode.names = split_names(&parts);
        episode.title = episode
            .names
            .preferred(&self.title_order)
            .unwrap_or_default()
            .to_string();
    }
}

/// Picks the episode candidate: the last short number before the tag block,
/// falling back to any number before it, then the last short number, then
/// the last candidate.
fn pick_episode(candidates: &[Candidate], boundary: usize) -> usize {
    let short = |c: &Candidate| matches!(c.capture, Capture::Episode { digits, .. } if digits <= 3);
    let before = |c: &Candidate| c.slot < boundary;

    candidates
        .iter()
        .rposition(|c| before(c) && short(c))
        .or_else(|| candidates.iter().rposition(before))
        .or_else(|| candidates.iter().rposition(short))
        .unwrap_or(candidates.len() - 1)
}

fn record(episode: &mut Episode, capture: &Capture) {
    match capture {
        Capture::Noise => {}
        Capture::Resolution(res) => {
            episode.resolution.get_or_insert_with(|| res.clone());
        }
        Capture::Episode { raw, number, .. } => {
            if episode.episode.number.is_none() {
                episode.episode.raw = Some(raw.clone());
                episode.episode.number = Some(*number);
            }
        }
        Capture::Season { raw, number } => {
            if episode.season.number.is_none() {
                if let Some(n) = number {
                    episode.season.raw = Some(raw.clone());
                    episode.season.number = Some(*n);
                }
            }
        }
        Capture::Group(group) => {
            episode.group.get_or_insert_with(|| group.clone());
        }
        // Tags are laid out in slot order by `assemble`.
        Capture::Tag { .. } => {}
    }
}

/// The first subtitle wins; later subtitles and every source part go to
/// `source_tags`, in slot order.
fn record_tag(episode: &mut Episode, subtitle: Option<String>, source: Option<String>) {
    if let Some(sub) = subtitle {
        if episode.subtitle.is_none() {
            episode.subtitle = Some(sub);
        } else {
            episode.push_source_tag(sub);
        }
    }
    if let Some(src) = source {
        episode.push_source_tag(src);
    }
}

/// Marks `slots[index]` (or `range` inside it) as claimed by `field`,
/// splitting the unclaimed text around the range into free slots.
fn claim(slots: &mut Vec<Slot>, index: usize, range: Option<Range<usize>>, field: Field) {
    let Some(range) = range.filter(|r| *r != (0..slots[index].text.len())) else {
        slots[index].claim = Some(field);
        return;
    };

    let slot = &slots[index];
    let before = slot.text[..range.start].trim();
    let after = slot.text[range.end..].trim();

    let mut replacement = Vec::with_capacity(3);
    if !before.is_empty() {
        replacement.push(Slot::free(before, slot.lead, slot.token));
    }
    replacement.push(Slot {
        text: slot.text[range.clone()].to_string(),
        claim: Some(field),
        lead: slot.lead,
        token: slot.token,
    });
    if !after.is_empty() {
        replacement.push(Slot::free(after, slot.lead, slot.token));
    }

    slots.splice(index..=index, replacement);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Tokenizer, standardize};

    fn analyse(raw: &str) -> Episode {
        let analyser = Analyser::new(TitleLanguage::DEFAULT_ORDER.to_vec()).unwrap();
        let standardized = standardize(raw);
        let tokens = Tokenizer::new().tokenize(&standardized);
        analyser.analyse(&standardized, &tokens)
    }

    #[test]
    fn komi_release() {
        let ep = analyse(
            "【幻樱字幕组】【4月新番】【古见同学有交流障碍症 第二季 Komi-san wa, Komyushou Desu. S02】【22】【GB_MP4】【1920X1080】",
        );
        assert_eq!(ep.group.as_deref(), Some("幻樱字幕组"));
        assert_eq!(ep.title, "Komi-san wa, Komyushou Desu.");
        assert_eq!(ep.names.zh.as_deref(), Some("古见同学有交流障碍症"));
        assert_eq!(ep.season.raw.as_deref(), Some("第二季"));
        assert_eq!(ep.season.number, Some(2));
        assert_eq!(ep.episode.number, Some(22));
        assert_eq!(ep.resolution.as_deref(), Some("1920X1080"));
        assert_eq!(ep.subtitle.as_deref(), Some("GB"));
        assert_eq!(ep.source_tags, ["MP4"]);
    }

    #[test]
    fn mushoku_release() {
        let ep = analyse(
            "[Lilith-Raws] 无职转生，到了异世界就拿出真本事 / Mushoku Tensei - 11 [Baha][WEB-DL][1080p][AVC AAC][CHT][MP4]",
        );
        assert_eq!(ep.group.as_deref(), Some("Lilith-Raws"));
        assert_eq!(ep.title, "Mushoku Tensei");
        assert_eq!(ep.episode.number, Some(11));
        assert_eq!(ep.season.number, None);
        assert_eq!(ep.season_number(), 1);
        assert_eq!(ep.resolution.as_deref(), Some("1080p"));
        assert_eq!(ep.subtitle.as_deref(), Some("CHT"));
        assert_eq!(ep.source_tags, ["Baha", "WEB-DL", "AVC AAC", "MP4"]);
    }

    #[test]
    fn single_token_is_all_title() {
        let ep = analyse("Some Random Title");
        assert_eq!(ep.title, "Some Random Title");
        assert_eq!(ep.group, None);
        assert_eq!(ep.episode.number, None);
        assert_eq!(ep.season.number, None);
        assert_eq!(ep.resolution, None);
        assert!(ep.source_tags.is_empty());
    }

    #[test]
    fn single_token_keeps_field_shaped_words() {
        for input in [
            "Some Show 1080p",
            "Komi-san S02",
            "Show EP05",
            "天国大魔境 Tengoku Daimakyou",
        ] {
            let ep = analyse(input);
            assert_eq!(ep.title, input);
            assert_eq!(ep.names.raw.as_deref(), Some(input));
            assert_eq!(ep.names.en, None);
            assert!(!ep.has_metadata(), "fields extracted from {input:?}");
        }
    }

    #[test]
    fn without_episode_only_first_free_token_is_title() {
        let a = analyse("[Group] 某番名 [Foo][WEB-DL]");
        let b = analyse("[Group] 某番名 [WEB-DL][Foo]");

        assert_eq!(a.title, "某番名");
        assert_eq!(b.title, "某番名");
        assert_eq!(a.source_tags, ["Foo", "WEB-DL"]);
        assert_eq!(b.source_tags, ["WEB-DL", "Foo"]);
    }

    #[test]
    fn without_episode_season_is_cut_from_title_token() {
        let ep = analyse("[Group] 古见同学 第二季 Komi-san [1080p][Extra]");
        assert_eq!(ep.season.number, Some(2));
        assert_eq!(ep.names.zh.as_deref(), Some("古见同学"));
        assert_eq!(ep.title, "Komi-san");
        assert_eq!(ep.source_tags, ["Extra"]);
    }

    #[test]
    fn embedded_episode_marker_splits_title() {
        let ep = analyse("[SweetSub] 天国大魔境 Tengoku Daimakyou 第05话 GB [1080P]");
        assert_eq!(ep.episode.number, Some(5));
        assert_eq!(ep.episode.raw.as_deref(), Some("第05话"));
        assert_eq!(ep.names.zh.as_deref(), Some("天国大魔境"));
        assert_eq!(ep.title, "Tengoku Daimakyou");
        assert_eq!(ep.subtitle.as_deref(), Some("GB"));
        assert_eq!(ep.resolution.as_deref(), Some("1080P"));
    }

    #[test]
    fn year_is_not_an_episode() {
        let ep = analyse("[Group][Some Show][2023][05][1080p]");
        assert_eq!(ep.episode.number, Some(5));
        assert_eq!(ep.source_tags, Vec::<String>::new());
    }

    #[test]
    fn numeric_title_loses_to_later_number() {
        let ep = analyse("[Group][86][12][1080p]");
        assert_eq!(ep.episode.number, Some(12));
        assert_eq!(ep.title, "86");
    }

    #[test]
    fn episode_after_resolution_still_found() {
        let ep = analyse("[Group][Some Show][1080p][07]");
        assert_eq!(ep.episode.number, Some(7));
        assert_eq!(ep.title, "Some Show");
    }

    #[test]
    fn field_shaped_lead_is_not_a_group() {
        let ep = analyse("[1080p] Some Show - 03");
        assert_eq!(ep.group, None);
        assert_eq!(ep.resolution.as_deref(), Some("1080p"));
        assert_eq!(ep.episode.number, Some(3));
    }

    #[test]
    fn claim_splits_slot() {
        let mut slots = vec![Slot::free("abc XYZ def", false, 0)];
        claim(&mut slots, 0, Some(4..7), Field::Season);
        let texts: Vec<_> = slots.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["abc", "XYZ", "def"]);
        assert_eq!(slots[1].claim, Some(Field::Season));
        assert!(slots[0].is_free() && slots[2].is_free());
        assert!(slots.iter().all(|s| s.token == 0));
    }

    #[test]
    fn empty_token_list() {
        let ep = analyse("");
        assert_eq!(ep, Episode::default());
    }
}
