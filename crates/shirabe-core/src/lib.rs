//! # Shirabe Core
//!
//! Turns raw fansub release titles, as they appear in RSS feeds, into
//! structured episode records: show names, season, episode number,
//! resolution, subtitle language and release group.
//!
//! Parsing runs in three stages: [`parser::standardize`] folds full-width
//! punctuation into one canonical set, [`parser::Tokenizer`] splits on
//! bracket and separator delimiters, and [`parser::Analyser`] walks an
//! ordered recognizer table over the tokens.
//!
//! ## Quick Start
//!
//! ```rust
//! use shirabe_core::Parser;
//!
//! let parser = Parser::with_defaults().unwrap();
//! let ep = parser.parse(
//!     "【幻樱字幕组】【4月新番】【古见同学有交流障碍症 第二季 Komi-san wa, Komyushou Desu. S02】【22】【GB_MP4】【1920X1080】",
//! );
//!
//! assert_eq!(ep.title, "Komi-san wa, Komyushou Desu.");
//! assert_eq!(ep.season.number, Some(2));
//! assert_eq!(ep.episode.number, Some(22));
//! assert_eq!(ep.resolution.as_deref(), Some("1920X1080"));
//! assert_eq!(ep.group.as_deref(), Some("幻樱字幕组"));
//! ```
pub mod error;
pub mod parser;
pub mod types;

// Re-export primary API
pub use error::{Result, ShirabeError};
pub use parser::{Analyser, Parsed, Parser, ParserConfig, Token, Tokenizer, parse, standardize};
pub use types::{Episode, EpisodeInfo, SeasonInfo, TitleLanguage, TitleNames};
