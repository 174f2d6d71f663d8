//! Promotion theme selection and product matching.
//!
//! [`active_themes`] picks which themes a region shows; [`assign_products`]
//! fills each of them from the region's scored recommendations without
//! handing the same product to two themes while unused ones remain.

mod matcher;
mod themes;

pub use matcher::{PRODUCTS_PER_THEME, ProductRow, ThemeAssignment, assign_products};
pub use themes::{MAX_THEMES, active_themes};
