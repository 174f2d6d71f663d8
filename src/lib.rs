//! Promo Planner Core Library
//!
//! Turns the loosely-shaped promotion payload returned by an automation
//! webhook into a canonical structure, then derives what a duty-free
//! promotion planner looks at for one region and month: trend notes,
//! holidays, top search keywords and up to four promotion themes with
//! matched products.
//!
//! # Architecture
//!
//! - [`payload`] - Coercion of raw payload shapes into one flat mapping
//! - [`schema`] - Normalization into [`CanonicalPayload`] and typed record views
//! - [`matchers`] - Year-month extraction, month reading, token splitting
//! - [`ranking`] - Top search keywords and holiday lookup
//! - [`recommend`] - Active themes and theme-product assignment
//! - [`trend`] - NOW TREND sections from the analytics block
//! - [`cache`] - TTL cache of canonical payloads per month
//! - [`fetch`] - Webhook client with retry
//! - [`planner`] - Read-through loading and [`RegionReport`] assembly
//! - [`config`] - File configuration for CLI defaults
//!
//! Nothing below [`fetch`] returns an error: malformed input degrades to
//! empty values.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod fetch;
pub mod matchers;
pub mod payload;
pub mod planner;
pub mod ranking;
pub mod recommend;
pub mod region;
pub mod schema;
pub mod trend;

// Re-export commonly used types
pub use cache::{DEFAULT_CACHE_TTL, PayloadCache};
pub use fetch::{FetchError, RetryPolicy, WebhookClient};
pub use matchers::{extract_year_month, month_of};
pub use payload::{RawPayload, coerce};
pub use planner::{PayloadSource, PromoPlanner, RegionReport, StaticSource, canonicalize};
pub use ranking::{KeywordRank, holidays_for, top_search_keywords};
pub use recommend::{ProductRow, ThemeAssignment, active_themes, assign_products};
pub use region::Region;
pub use schema::{CanonicalPayload, ScoredProduct, Theme, normalize};
pub use trend::{RegionTrend, TrendSection};
