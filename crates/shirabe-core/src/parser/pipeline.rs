//! # Parser Pipeline
//!
//! Runs the three stages in order: standardize, tokenize, analyse.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::analyser::Analyser;
use crate::parser::standardizer::standardize;
use crate::parser::tokenizer::{Token, Tokenizer};
use crate::types::{Episode, TitleLanguage};

/// Configuration for the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Order in which per-script names are tried for [`Episode::title`]
    pub title_order: Vec<TitleLanguage>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            title_order: TitleLanguage::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title language preference. An empty list keeps the default.
    pub fn with_title_order(mut self, order: Vec<TitleLanguage>) -> Self {
        if !order.is_empty() {
            self.title_order = order;
        }
        self
    }
}

/// Intermediate results of one parse, for inspection and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Output of the standardizer
    pub standardized: String,
    /// Output of the tokenizer
    pub tokens: Vec<Token>,
    /// Output of the analyser
    pub episode: Episode,
}

/// Release-title parser. Immutable after construction and safe to share
/// across threads.
pub struct Parser {
    config: ParserConfig,
    tokenizer: Tokenizer,
    analyser: Analyser,
}

impl Parser {
    /// Create a new parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ShirabeError::Regex` if the recognizer patterns fail to compile.
    pub fn new(config: ParserConfig) -> Result<Self> {
        let analyser = Analyser::new(config.title_order.clone())?;
        Ok(Self {
            config,
            tokenizer: Tokenizer::new(),
            analyser,
        })
    }

    /// Create a new parser with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ParserConfig::default())
    }

    /// Parse a release title.
    ///
    /// Never fails: fields that cannot be recognized are left unset.
    ///
    /// # Examples
    /// ```
    /// use shirabe_core::parser::Parser;
    ///
    /// let parser = Parser::with_defaults().unwrap();
    /// let ep = parser.parse("[Lilith-Raws] 无职转生 / Mushoku Tensei - 11 [Baha][WEB-DL][1080p]");
    ///
    /// assert_eq!(ep.title, "Mushoku Tensei");
    /// assert_eq!(ep.group.as_deref(), Some("Lilith-Raws"));
    /// assert_eq!(ep.episode.number, Some(11));
    /// ```
    pub fn parse(&self, input: &str) -> Episode {
        self.parse_detailed(input).episode
    }

    /// Parse and keep the standardized text and token list alongside the result.
    pub fn parse_detailed(&self, input: &str) -> Parsed {
        let standardized = standardize(input);
        let tokens = self.tokenizer.tokenize(&standardized);
        let episode = self.analyser.analyse(&standardized, &tokens);

        tracing::debug!(
            tokens = tokens.len(),
            title = %episode.title,
            episode = ?episode.episode.number,
            "parsed release title"
        );

        Parsed {
            standardized,
            tokens,
            episode,
        }
    }

    /// Get the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

/// Convenience function to parse a title with default settings.
///
/// Builds a fresh [`Parser`] on every call; reuse a `Parser` for batches.
///
/// # Errors
///
/// Returns `ShirabeError::Regex` if the recognizer patterns fail to compile.
pub fn parse(input: &str) -> Result<Episode> {
    let parser = Parser::with_defaults()?;
    Ok(parser.parse(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::new().with_title_order(vec![TitleLanguage::Zh]);
        assert_eq!(config.title_order, [TitleLanguage::Zh]);

        let config = ParserConfig::new().with_title_order(Vec::new());
        assert_eq!(config.title_order, TitleLanguage::DEFAULT_ORDER);
    }

    #[test]
    fn test_title_order_changes_title() {
        let input = "[Lilith-Raws] 无职转生 / Mushoku Tensei - 11 [1080p]";

        let en = Parser::with_defaults().unwrap().parse(input);
        assert_eq!(en.title, "Mushoku Tensei");

        let zh = Parser::new(ParserConfig::new().with_title_order(vec![TitleLanguage::Zh]))
            .unwrap()
            .parse(input);
        assert_eq!(zh.title, "无职转生");
        assert_eq!(zh.names, en.names);
    }

    #[test]
    fn test_parse_detailed_exposes_stages() {
        let parser = Parser::with_defaults().unwrap();
        let parsed = parser.parse_detailed("【幻樱字幕组】【4月新番】【22】");
        assert_eq!(parsed.standardized, "[幻樱字幕组][4月新番][22]");
        assert_eq!(parsed.tokens.len(), 3);
        assert_eq!(parsed.episode.episode.number, Some(22));
    }

    #[test]
    fn test_convenience_parse() {
        let ep = parse("[SubsPlease] Jujutsu Kaisen - 24 [1080p]").unwrap();
        assert_eq!(ep.title, "Jujutsu Kaisen");
        assert_eq!(ep.episode.number, Some(24));
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parser>();
    }
}
