//! Content module - post models and rich-text rendering

mod post;
pub mod richtext;

pub use post::{
    count_words, reading_time, Banner, PostData, PostDetail, PostSummary, Section, SummaryData,
    WORDS_PER_MINUTE,
};
pub use richtext::RichText;
