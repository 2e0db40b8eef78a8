//! Cache Statistics Module
//!
//! Point-in-time counters for the result store and the in-flight registry,
//! and the summary returned by each sweep.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache activity since construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the result store
    pub hits: u64,
    /// Lookups that found nothing usable (absent or expired)
    pub misses: u64,
    /// Entries removed because their TTL elapsed (lazily or by the sweep)
    pub expired: u64,
    /// Producer invocations started
    pub producer_calls: u64,
    /// Resolve calls that attached to an already running episode
    pub coalesced: u64,
    /// Episodes that settled with a producer failure
    pub producer_failures: u64,
    /// In-flight registrations reclaimed as stale
    pub stale_reclaimed: u64,
    /// Entries currently held in the result store
    pub entries: usize,
    /// Episodes currently registered
    pub in_flight: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the result-store hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Sweep Report ==
/// What a single sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Result-store entries whose TTL had elapsed
    pub expired_entries: usize,
    /// In-flight registrations reclaimed as stale
    pub stale_reclaimed: usize,
}

impl SweepReport {
    /// True when the sweep removed nothing.
    pub fn is_empty(&self) -> bool {
        self.expired_entries == 0 && self.stale_reclaimed == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.producer_calls, 0);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_sweep_report_is_empty() {
        assert!(SweepReport::default().is_empty());
        let report = SweepReport {
            expired_entries: 0,
            stale_reclaimed: 1,
        };
        assert!(!report.is_empty());
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            coalesced: 9,
            ..CacheStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["coalesced"], 9);
        assert!(json.get("stale_reclaimed").is_some());
    }
}
