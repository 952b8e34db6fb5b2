pub mod report;
pub mod sentiment;
pub mod text;

pub use report::{AnalysisError, ProductReport};
pub use sentiment::{LexiconScorer, PolarityScores, SentimentScorer};
pub use text::{clean_text, word_frequencies};
