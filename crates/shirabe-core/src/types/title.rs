use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Script a show name is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleLanguage {
    /// Romanized or English name.
    En,
    /// Chinese name (Han characters, no kana).
    Zh,
    /// Japanese name (contains kana).
    Jp,
}

impl TitleLanguage {
    /// Default preference when picking the canonical title.
    pub const DEFAULT_ORDER: [TitleLanguage; 3] = [Self::En, Self::Zh, Self::Jp];
}

impl fmt::Display for TitleLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Zh => write!(f, "zh"),
            Self::Jp => write!(f, "jp"),
        }
    }
}

impl FromStr for TitleLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Self::En),
            "zh" | "cn" | "chs" | "chinese" => Ok(Self::Zh),
            "jp" | "ja" | "jpn" | "japanese" => Ok(Self::Jp),
            other => Err(format!("unknown title language: {other:?}")),
        }
    }
}

/// Show names recovered from the title region, one per script.
///
/// Release groups often publish the Chinese and the romanized name side by
/// side (`无职转生 / Mushoku Tensei`). `raw` keeps the whole title region as
/// it appeared, with season markers removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleNames {
    /// Title region before it was split into per-script names.
    pub raw: Option<String>,
    /// Romanized / English name.
    pub en: Option<String>,
    /// Chinese name.
    pub zh: Option<String>,
    /// Japanese name.
    pub jp: Option<String>,
}

impl TitleNames {
    /// Returns the name recorded for `lang`, if any.
    #[must_use]
    pub fn get(&self, lang: TitleLanguage) -> Option<&str> {
        match lang {
            TitleLanguage::En => self.en.as_deref(),
            TitleLanguage::Zh => self.zh.as_deref(),
            TitleLanguage::Jp => self.jp.as_deref(),
        }
    }

    /// Picks the first available name following `order`, falling back to `raw`.
    #[must_use]
    pub fn preferred(&self, order: &[TitleLanguage]) -> Option<&str> {
        order
            .iter()
            .find_map(|&lang| self.get(lang))
            .or(self.raw.as_deref())
    }

    pub(crate) fn slot_mut(&mut self, lang: TitleLanguage) -> &mut Option<String> {
        match lang {
            TitleLanguage::En => &mut self.en,
            TitleLanguage::Zh => &mut self.zh,
            TitleLanguage::Jp => &mut self.jp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_str() {
        assert_eq!("EN".parse::<TitleLanguage>(), Ok(TitleLanguage::En));
        assert_eq!("chs".parse::<TitleLanguage>(), Ok(TitleLanguage::Zh));
        assert_eq!("ja".parse::<TitleLanguage>(), Ok(TitleLanguage::Jp));
        assert!("klingon".parse::<TitleLanguage>().is_err());
    }

    #[test]
    fn preferred_follows_order_then_raw() {
        let names = TitleNames {
            raw: Some("夏日重现 Summer Time Rendering".into()),
            en: Some("Summer Time Rendering".into()),
            zh: Some("夏日重现".into()),
            jp: None,
        };
        assert_eq!(
            names.preferred(&TitleLanguage::DEFAULT_ORDER),
            Some("Summer Time Rendering")
        );
        assert_eq!(
            names.preferred(&[TitleLanguage::Jp, TitleLanguage::Zh]),
            Some("夏日重现")
        );
        assert_eq!(
            names.preferred(&[TitleLanguage::Jp]),
            Some("夏日重现 Summer Time Rendering")
        );
        assert_eq!(TitleNames::default().preferred(&TitleLanguage::DEFAULT_ORDER), None);
    }
}
