//! Theme to product assignment.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::matchers::theme_tokens;
use crate::schema::{IdentifierKey, ScoredProduct, Theme};

/// Maximum number of products assigned to one theme.
pub const PRODUCTS_PER_THEME: usize = 5;

/// Products picked for one theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeAssignment {
    /// Display label of the theme.
    pub theme: String,
    /// Picked products in pick order (token hits, then score).
    pub products: Vec<ScoredProduct>,
}

/// One display row of a theme's product table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub name: String,
    pub category: String,
    pub stock: Option<Value>,
    pub score_total: Option<f64>,
    pub suggested_mechanic: Option<String>,
}

impl From<&ScoredProduct> for ProductRow {
    fn from(product: &ScoredProduct) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            stock: product.stock.clone(),
            score_total: product.score_total,
            suggested_mechanic: product.suggested_mechanic.clone(),
        }
    }
}

impl ThemeAssignment {
    /// Display rows ordered by score descending; rows without a score go last.
    #[must_use]
    pub fn rows(&self) -> Vec<ProductRow> {
        let mut rows: Vec<ProductRow> = self.products.iter().map(ProductRow::from).collect();
        rows.sort_by(|a, b| match (a.score_total, b.score_total) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows
    }
}

/// Assigns up to [`PRODUCTS_PER_THEME`] products to each theme.
///
/// `items` are ranked once by score (absent scores last) into a pool shared
/// by all themes. Themes are processed in order; each takes the best
/// candidates of the pool not yet used by an earlier theme, ranked by the
/// number of theme tokens found in the product's name and category, then
/// by score. A product's sku is marked used once assigned; a short remainder
/// of unused products is returned as is.
///
/// Known quirk: once every product with a sku has been used, a theme falls
/// back to the first [`PRODUCTS_PER_THEME`] products of the ranked pool,
/// reusing products assigned to earlier themes. A theme therefore only comes
/// back empty when `items` is empty.
#[instrument(skip(themes, items), fields(themes = themes.len(), items = items.len()))]
#[must_use]
pub fn assign_products(themes: &[Theme], items: &[ScoredProduct]) -> Vec<ThemeAssignment> {
    let mut pool: Vec<&ScoredProduct> = items.iter().collect();
    pool.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));

    let mut used = HashSet::new();
    let mut assignments = Vec::with_capacity(themes.len());
    for theme in themes {
        let (assignment, now_used) = assign_theme(theme, &pool, used);
        used = now_used;
        assignments.push(assignment);
    }
    assignments
}

/// Picks products for one theme and returns the updated used-sku set.
fn assign_theme(
    theme: &Theme,
    pool: &[&ScoredProduct],
    mut used: HashSet<IdentifierKey>,
) -> (ThemeAssignment, HashSet<IdentifierKey>) {
    let tokens = theme_tokens(&theme.theme, &theme.products);

    let mut candidates: Vec<(usize, usize)> = pool
        .iter()
        .enumerate()
        .filter(|(_, product)| !is_used(product, &used))
        .map(|(index, product)| (index, token_hits(&tokens, product)))
        .collect();
    candidates.sort_by(|(a_index, a_hits), (b_index, b_hits)| {
        b_hits.cmp(a_hits).then_with(|| {
            let a_score = pool[*a_index].score_total.unwrap_or(0.0);
            let b_score = pool[*b_index].score_total.unwrap_or(0.0);
            b_score.total_cmp(&a_score)
        })
    });

    let picked: Vec<usize> = if candidates.is_empty() {
        debug!(theme = theme.label(), "no unused products left, reusing ranked pool");
        (0..pool.len().min(PRODUCTS_PER_THEME)).collect()
    } else {
        candidates
            .into_iter()
            .take(PRODUCTS_PER_THEME)
            .map(|(index, _)| index)
            .collect()
    };

    let products: Vec<ScoredProduct> = picked.iter().map(|&index| pool[index].clone()).collect();
    for product in &products {
        if let Some(identity) = &product.identity {
            used.insert(identity.clone());
        }
    }

    let assignment = ThemeAssignment {
        theme: theme.label().to_string(),
        products,
    };
    (assignment, used)
}

fn is_used(product: &ScoredProduct, used: &HashSet<IdentifierKey>) -> bool {
    product
        .identity
        .as_ref()
        .is_some_and(|identity| used.contains(identity))
}

fn token_hits(tokens: &[String], product: &ScoredProduct) -> usize {
    let text = product.match_text();
    tokens.iter().filter(|token| text.contains(token.as_str())).count()
}
