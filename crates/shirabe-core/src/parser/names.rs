//! Splits the title region into per-script show names.

use crate::types::{TitleLanguage, TitleNames};

fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{30ff}').contains(&c)
}

fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c) || ('\u{3400}'..='\u{4dbf}').contains(&c)
}

fn starts_with_han_word(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(a), Some(b)) if is_han(a) && is_han(b))
}

fn longest_ascii_alpha_run(s: &str) -> usize {
    s.split(|c: char| !c.is_ascii_alphabetic())
        .map(str::len)
        .max()
        .unwrap_or(0)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Guesses the script of one name piece.
pub fn language_of(piece: &str) -> Option<TitleLanguage> {
    let kana = piece.chars().filter(|&c| is_kana(c)).count();
    let han = piece.chars().filter(|&c| is_han(c)).count();

    if kana >= 2 {
        Some(TitleLanguage::Jp)
    } else if han >= 2 {
        Some(TitleLanguage::Zh)
    } else if longest_ascii_alpha_run(piece) >= 3 {
        Some(TitleLanguage::En)
    } else {
        None
    }
}

/// Breaks title parts into name pieces.
///
/// Parts are split on `/` and on runs of two or more spaces. When that
/// leaves a single piece, it is split on `_` (`Show_古见`), and failing
/// that a leading or trailing Han word is split off the rest
/// (`天国大魔境 Tengoku Daimakyou`).
pub fn name_pieces<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
    let mut pieces: Vec<String> = parts
        .iter()
        .flat_map(|part| part.as_ref().split('/'))
        .flat_map(|part| part.split("  "))
        .map(collapse_whitespace)
        .filter(|piece| !piece.is_empty())
        .collect();

    if pieces.len() == 1 && pieces[0].contains('_') {
        pieces = pieces[0]
            .split('_')
            .map(collapse_whitespace)
            .filter(|piece| !piece.is_empty())
            .collect();
    }

    if pieces.len() == 1 {
        let words: Vec<&str> = pieces[0].split(' ').collect();
        if words.len() >= 2 {
            let last = words.len() - 1;
            if starts_with_han_word(words[0]) {
                pieces = vec![words[0].to_string(), words[1..].join(" ")];
            } else if starts_with_han_word(words[last]) {
                pieces = vec![words[..last].join(" "), words[last].to_string()];
            }
        }
    }

    pieces
}

/// Builds [`TitleNames`] from the ordered title parts.
///
/// The first piece of each script wins; `raw` is every part joined by a
/// single space.
pub fn split_names<S: AsRef<str>>(parts: &[S]) -> TitleNames {
    let raw = collapse_whitespace(
        &parts
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let mut names = TitleNames {
        raw: (!raw.is_empty()).then_some(raw),
        ..Default::default()
    };

    for piece in name_pieces(parts) {
        if let Some(lang) = language_of(&piece) {
            let slot = names.slot_mut(lang);
            if slot.is_none() {
                *slot = Some(piece);
            }
        }
    }

    names
}
