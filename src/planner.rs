//! Fetch, cache and per-region reporting.
//!
//! [`PromoPlanner`] is the read-through front of the pipeline: it asks a
//! [`PayloadSource`] for the raw payload of a month, canonicalizes it once and
//! caches the result. [`RegionReport`] then bundles everything shown for one
//! region of that month.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cache::PayloadCache;
use crate::fetch::{FetchError, WebhookClient};
use crate::payload::{RawPayload, coerce};
use crate::ranking::{DEFAULT_KEYWORD_LIMIT, KeywordRank, holidays_for, top_search_keywords};
use crate::recommend::{ThemeAssignment, active_themes, assign_products};
use crate::region::{Region, flag_for};
use crate::schema::{CanonicalPayload, normalize};
use crate::trend::RegionTrend;

/// Anything that can produce the raw payload for a target month.
///
/// Uses `async_trait` so planners can hold an `Arc<dyn PayloadSource>`.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Fetches the raw payload for a `YYYY-MM` target.
    async fn fetch(&self, target_ym: &str) -> Result<RawPayload, FetchError>;
}

#[async_trait]
impl PayloadSource for WebhookClient {
    async fn fetch(&self, target_ym: &str) -> Result<RawPayload, FetchError> {
        WebhookClient::fetch(self, target_ym).await
    }
}

/// A fixed payload, for offline input (files, stdin) and tests.
#[derive(Debug, Clone)]
pub struct StaticSource {
    raw: RawPayload,
}

impl StaticSource {
    #[must_use]
    pub fn new(raw: RawPayload) -> Self {
        Self { raw }
    }
}

#[async_trait]
impl PayloadSource for StaticSource {
    async fn fetch(&self, _target_ym: &str) -> Result<RawPayload, FetchError> {
        Ok(self.raw.clone())
    }
}

/// Coerces and normalizes a raw payload in one step.
#[must_use]
pub fn canonicalize(raw: RawPayload) -> CanonicalPayload {
    normalize(coerce(raw))
}

/// Read-through loader of canonical payloads.
#[derive(Clone)]
pub struct PromoPlanner {
    source: Arc<dyn PayloadSource>,
    cache: Arc<PayloadCache>,
}

impl std::fmt::Debug for PromoPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromoPlanner")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl PromoPlanner {
    /// Planner with a default 10-minute cache.
    #[must_use]
    pub fn new(source: Arc<dyn PayloadSource>) -> Self {
        Self::with_cache(source, Arc::new(PayloadCache::default()))
    }

    #[must_use]
    pub fn with_cache(source: Arc<dyn PayloadSource>, cache: Arc<PayloadCache>) -> Self {
        Self { source, cache }
    }

    #[must_use]
    pub fn cache(&self) -> &PayloadCache {
        &self.cache
    }

    /// Returns the canonical payload for `target_ym`, fetching on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns the source's [`FetchError`]; failures are not cached.
    #[instrument(skip(self))]
    pub async fn load(&self, target_ym: &str) -> Result<Arc<CanonicalPayload>, FetchError> {
        self.cache
            .get_or_try_insert_with(target_ym, || async {
                let raw = self.source.fetch(target_ym).await?;
                let canonical = canonicalize(raw);
                info!(
                    calendar = canonical.calendar.len(),
                    search_rows = canonical.search_data.len(),
                    promotion_blocks = canonical.promotions_by_region.len(),
                    "payload canonicalized"
                );
                Ok::<_, FetchError>(canonical)
            })
            .await
    }

    /// Loads `target_ym` and builds the report for `region`.
    ///
    /// # Errors
    ///
    /// Same as [`PromoPlanner::load`].
    pub async fn report(&self, target_ym: &str, region: Region) -> Result<RegionReport, FetchError> {
        let canonical = self.load(target_ym).await?;
        Ok(RegionReport::build(&canonical, target_ym, region.as_str()))
    }
}

/// Everything shown for one region in one target month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub target_ym: String,
    pub region: String,
    pub flag: &'static str,
    /// Month label reported by the analytics block, if any.
    pub analytics_month: String,
    pub trend: RegionTrend,
    pub holidays: Vec<String>,
    pub keywords: Vec<KeywordRank>,
    pub themes: Vec<ThemeAssignment>,
}

impl RegionReport {
    /// Builds the report. Missing region data yields empty sections.
    #[instrument(skip(canonical))]
    #[must_use]
    pub fn build(canonical: &CanonicalPayload, target_ym: &str, region_code: &str) -> Self {
        let themes = active_themes(&canonical.promotion_themes(region_code));
        let items = canonical.recommended_items(region_code);
        let assignments = assign_products(&themes, &items);

        let report = Self {
            target_ym: target_ym.to_string(),
            region: region_code.to_string(),
            flag: flag_for(region_code),
            analytics_month: canonical.analytics.month.clone(),
            trend: RegionTrend::from_payload(canonical, region_code),
            holidays: holidays_for(canonical, target_ym, region_code),
            keywords: top_search_keywords(canonical, target_ym, DEFAULT_KEYWORD_LIMIT),
            themes: assignments,
        };
        debug!(
            holidays = report.holidays.len(),
            keywords = report.keywords.len(),
            themes = report.themes.len(),
            "region report built"
        );
        report
    }
}
