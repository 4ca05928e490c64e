//! Structured profiling for enumeration runs
//!
//! Every enumerator keeps a [`SearchStats`] with plain counters. When
//! `EnumerationConfig::enable_profiling` is set, the front end wraps them into
//! an [`EnumerationProfile`] together with timings and the size of the indexed
//! proof.

use crate::collections::FamilyStats;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

fn secs(d: &Duration) -> f64 {
    d.as_secs_f64()
}

/// Counters maintained by an enumerator during one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    /// Jobs (or candidate justifications) put on the queue
    pub jobs_produced: usize,
    /// Jobs taken from the queue and expanded
    pub jobs_processed: usize,
    /// Jobs dropped as non-minimal, dominated or obsolete
    pub jobs_pruned: usize,
    /// Candidate results built by combining partial results
    pub candidates: usize,
    /// Candidates dropped because they contain a known result
    pub blocked: usize,
    /// Results passed to the listener
    pub emitted: usize,
    pub max_queue_size: usize,
    /// Containment tests against all families, merged
    pub families: FamilyStats,
    /// Algorithm-specific counters
    pub counters: BTreeMap<String, usize>,
}

impl SearchStats {
    /// Add `count` to an algorithm-specific counter.
    pub fn record(&mut self, name: &str, count: usize) {
        *self.counters.entry(name.to_string()).or_default() += count;
    }

    /// Track the largest queue size seen.
    pub fn observe_queue(&mut self, size: usize) {
        self.max_queue_size = self.max_queue_size.max(size);
    }
}

/// Profiling data of one enumeration call.
///
/// All `Duration` fields are serialized as `f64` seconds.
#[derive(Debug, Clone, Default)]
pub struct EnumerationProfile {
    pub algorithm: String,

    // Phase timings
    pub total_time: Duration,
    pub index_time: Duration,
    pub search_time: Duration,

    // Size of the indexed proof
    pub conclusions: usize,
    pub inferences: usize,
    pub axioms: usize,

    pub search: SearchStats,
}

impl Serialize for EnumerationProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EnumerationProfile", 8)?;
        s.serialize_field("algorithm", &self.algorithm)?;

        s.serialize_field("total_time", &secs(&self.total_time))?;
        s.serialize_field("index_time", &secs(&self.index_time))?;
        s.serialize_field("search_time", &secs(&self.search_time))?;

        s.serialize_field("conclusions", &self.conclusions)?;
        s.serialize_field("inferences", &self.inferences)?;
        s.serialize_field("axioms", &self.axioms)?;

        s.serialize_field("search", &self.search)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_serializes() {
        let profile = EnumerationProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"total_time\":0.0"));
        assert!(json.contains("\"algorithm\":\"\""));
        assert!(json.contains("\"counters\":{}"));
    }

    #[test]
    fn test_profile_with_values_serializes() {
        let mut profile = EnumerationProfile::default();
        profile.algorithm = "top-down".to_string();
        profile.total_time = Duration::from_millis(1500);
        profile.search.jobs_produced = 12;
        profile.search.record("expansions", 3);
        profile.search.record("expansions", 2);
        profile.search.families.exact_tests = 7;

        let json = serde_json::to_string(&profile).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_time"], 1.5);
        assert_eq!(value["algorithm"], "top-down");
        assert_eq!(value["search"]["jobs_produced"], 12);
        assert_eq!(value["search"]["counters"]["expansions"], 5);
        assert_eq!(value["search"]["families"]["exact_tests"], 7);
    }

    #[test]
    fn test_observe_queue_keeps_maximum() {
        let mut stats = SearchStats::default();
        stats.observe_queue(4);
        stats.observe_queue(9);
        stats.observe_queue(2);
        assert_eq!(stats.max_queue_size, 9);
    }
}
