pub mod episode;
pub mod title;

pub use episode::{Episode, EpisodeInfo, SeasonInfo};
pub use title::{TitleLanguage, TitleNames};
