//! Keyword normalization and search URL construction

mod normalize;
mod search;

pub use normalize::normalize_keyword;
pub use search::SearchContext;
