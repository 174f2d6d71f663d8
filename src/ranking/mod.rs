//! Month-scoped ranking and filtering over a canonical payload.

mod holidays;
mod keywords;

pub use holidays::{holidays_for, parse_date};
pub use keywords::{DEFAULT_KEYWORD_LIMIT, KeywordRank, UNRANKED, top_search_keywords};
