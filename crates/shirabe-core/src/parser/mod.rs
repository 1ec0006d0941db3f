pub mod analyser;
pub mod names;
pub mod patterns;
pub mod pipeline;
pub mod standardizer;
pub mod tokenizer;

pub use analyser::Analyser;
pub use names::split_names;
pub use patterns::{Capture, Field, Patterns, Pick, RULES, Reach, Rule, Scope};
pub use pipeline::{Parsed, Parser, ParserConfig, parse};
pub use standardizer::{SUBSTITUTIONS, standardize};
pub use tokenizer::{DELIMITERS, Token, Tokenizer};
