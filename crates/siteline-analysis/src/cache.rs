//! Bounded in-memory report cache.
//!
//! FIFO by insertion order with an explicit order queue: eviction does not
//! depend on any map iteration-order guarantee. Shared across request
//! handlers; the mutex guards both structures so insert-then-evict is one
//! atomic step and a fresh insert can never evict itself.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use siteline_core::AnalysisReport;

/// Default number of reports retained.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

#[derive(Debug, Default)]
struct CacheInner {
    order: VecDeque<String>,
    entries: HashMap<String, Arc<AnalysisReport>>,
}

/// Thread-safe FIFO cache of finished reports, keyed by report id.
#[derive(Debug)]
pub struct ReportCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl ReportCache {
    /// Creates a cache holding at most `capacity` reports (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Inserts a report, evicting the oldest entry if the cache is full.
    ///
    /// Re-inserting an existing id replaces the value in place (last writer
    /// wins) without consuming extra capacity. Returns the shared handle so
    /// callers can hand the report on without cloning it.
    pub fn insert(&self, report: AnalysisReport) -> Arc<AnalysisReport> {
        let id = report.id.clone();
        let report = Arc::new(report);

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.contains_key(&id) {
            inner.entries.insert(id, Arc::clone(&report));
            return report;
        }

        if inner.order.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
        inner.order.push_back(id.clone());
        inner.entries.insert(id, Arc::clone(&report));
        report
    }

    /// Looks up a report by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<AnalysisReport>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(id).cloned()
    }

    /// Number of cached reports.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use siteline_core::{Category, Coordinate, Level, Recommendation, ReportMetrics};

    fn report(id: &str) -> AnalysisReport {
        AnalysisReport {
            id: id.to_string(),
            location: "MG Road, Bangalore".to_string(),
            category: Category::Cafe,
            coordinates: Coordinate {
                lat: 12.97,
                lng: 77.59,
            },
            summary: String::new(),
            strengths: vec![],
            weaknesses: vec![],
            opportunities: vec![],
            threats: vec![],
            metrics: ReportMetrics {
                viability_score: 75,
                competition_level: Level::Medium,
                market_saturation: Level::Medium,
                expected_revenue: 0,
                average_revenue: 0,
                total_addressable_market: 0,
                footfall: 0,
                competitor_count: 0,
            },
            recommendation: Recommendation::HighlyRecommended,
            key_insights: vec![],
            action_items: vec![],
            alternatives: vec![],
            competitors: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn get_returns_inserted_report() {
        let cache = ReportCache::new(10);
        cache.insert(report("a"));
        assert_eq!(cache.get("a").expect("cached").id, "a");
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn insert_at_capacity_evicts_exactly_the_oldest() {
        let cache = ReportCache::new(50);
        for i in 0..50 {
            cache.insert(report(&format!("r{i}")));
        }
        assert_eq!(cache.len(), 50);

        cache.insert(report("r50"));

        assert_eq!(cache.len(), 50);
        assert!(cache.get("r0").is_none(), "oldest entry must be evicted");
        for i in 1..=50 {
            assert!(cache.get(&format!("r{i}")).is_some(), "r{i} must survive");
        }
    }

    #[test]
    fn eviction_follows_insertion_order_not_access_order() {
        let cache = ReportCache::new(2);
        cache.insert(report("a"));
        cache.insert(report("b"));
        // Reading "a" must not rescue it from FIFO eviction.
        let _ = cache.get("a");
        cache.insert(report("c"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn reinserting_same_id_replaces_without_eviction() {
        let cache = ReportCache::new(2);
        cache.insert(report("a"));
        cache.insert(report("b"));

        let mut updated = report("a");
        updated.summary = "updated".to_string();
        cache.insert(updated);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").expect("present").summary, "updated");
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn capacity_one_always_keeps_the_newest() {
        let cache = ReportCache::new(1);
        cache.insert(report("a"));
        cache.insert(report("b"));
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b").expect("newest").id, "b");
    }

    #[test]
    fn zero_capacity_is_promoted_to_one() {
        let cache = ReportCache::new(0);
        cache.insert(report("a"));
        assert!(cache.get("a").is_some(), "insert must never evict itself");
    }
}
