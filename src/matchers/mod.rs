//! Pure text matchers used by the ranking and recommendation stages.
//!
//! - [`extract_year_month`] turns free text ("2025-12 프로모션", "12월") into a
//!   `YYYY-MM` key.
//! - [`month_of`] reads a month number out of whatever a producer put in a
//!   record's month field.
//! - [`theme_tokens`] and [`split_list_text`] split labels and narrative text
//!   into comparable tokens.

mod month;
mod tokens;

pub use month::{extract_year_month, month_of, month_of_year_month};
pub use tokens::{split_list_text, theme_tokens};
