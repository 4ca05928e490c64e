//! Antichains of sets under inclusion.
//!
//! A [`MinimalFamily`] stores sets and answers two queries against a candidate:
//!
//! - `is_minimal`: no stored set is a subset of the candidate
//! - `is_maximal`: no stored set is a superset of the candidate
//!
//! Sets are kept in a trie keyed by their elements in canonical (ascending)
//! order. Every trie node carries the union of the signatures stored below it,
//! so whole subtrees are skipped when the signatures already prove that no
//! containment is possible. Element tests that the signature cannot decide
//! fall back to an exact lookup; both outcomes are counted in [`FamilyStats`].
//!
//! The family is append-only. Adding a set never retracts stored sets that
//! became non-minimal; callers use [`MinimalFamily::supersets_of`] to find and
//! mark them.

use super::bloom_set::BloomSet;
use super::signature::{Element, Signature};
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;

// =============================================================================
// Statistics
// =============================================================================

/// Counters for containment queries against a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FamilyStats {
    /// Number of `is_minimal` / `is_maximal` / `supersets_of` queries
    pub queries: u64,
    /// Queries that found a containing (or contained) stored set
    pub positive: u64,
    /// Element or subtree tests decided by signatures alone
    pub filtered: u64,
    /// Element tests that needed an exact lookup
    pub exact_tests: u64,
}

impl FamilyStats {
    pub fn merge(&mut self, other: &FamilyStats) {
        self.queries += other.queries;
        self.positive += other.positive;
        self.filtered += other.filtered;
        self.exact_tests += other.exact_tests;
    }
}

// =============================================================================
// Trie node
// =============================================================================

#[derive(Debug)]
struct TrieNode<T: Element> {
    /// Children keyed by the next element of the stored sets
    children: BTreeMap<T, TrieNode<T>>,
    /// Family entries whose set ends at this node
    entries: Vec<usize>,
    /// Union of the signatures of all sets stored in this subtree
    below: Signature,
}

impl<T: Element> Default for TrieNode<T> {
    fn default() -> Self {
        TrieNode {
            children: BTreeMap::new(),
            entries: Vec::new(),
            below: Signature::EMPTY,
        }
    }
}

// =============================================================================
// MinimalFamily
// =============================================================================

/// An append-only family of sets with fast subset and superset queries.
#[derive(Debug)]
pub struct MinimalFamily<T: Element> {
    sets: Vec<BloomSet<T>>,
    root: TrieNode<T>,
    stats: Cell<FamilyStats>,
}

impl<T: Element> Default for MinimalFamily<T> {
    fn default() -> Self {
        MinimalFamily::new()
    }
}

impl<T: Element> MinimalFamily<T> {
    pub fn new() -> Self {
        MinimalFamily {
            sets: Vec::new(),
            root: TrieNode::default(),
            stats: Cell::new(FamilyStats::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The set stored under the given entry id.
    pub fn get(&self, entry: usize) -> &BloomSet<T> {
        &self.sets[entry]
    }

    /// Stored sets in insertion order; the position is the entry id.
    pub fn iter(&self) -> std::slice::Iter<'_, BloomSet<T>> {
        self.sets.iter()
    }

    pub fn stats(&self) -> FamilyStats {
        self.stats.get()
    }

    /// Remove all sets and reset the statistics.
    pub fn clear(&mut self) {
        self.sets.clear();
        self.root = TrieNode::default();
        self.stats.set(FamilyStats::default());
    }

    /// True iff no stored set is a subset of (or equal to) the candidate.
    pub fn is_minimal(&self, candidate: &BloomSet<T>) -> bool {
        self.bump(|s| s.queries += 1);
        let found = self.find_subset(&self.root, candidate, 0).is_some();
        if found {
            self.bump(|s| s.positive += 1);
        }
        !found
    }

    /// True iff no stored set is a superset of (or equal to) the candidate.
    pub fn is_maximal(&self, candidate: &BloomSet<T>) -> bool {
        self.bump(|s| s.queries += 1);
        let suffixes = suffix_signatures(candidate);
        let found = self.visit_supersets(&self.root, candidate.as_slice(), 0, &suffixes, &mut |_| true);
        if found {
            self.bump(|s| s.positive += 1);
        }
        !found
    }

    /// Entry ids of stored sets that are proper supersets of the candidate.
    pub fn supersets_of(&self, candidate: &BloomSet<T>) -> Vec<usize> {
        self.bump(|s| s.queries += 1);
        let suffixes = suffix_signatures(candidate);
        let mut results = Vec::new();
        let size = candidate.len();
        let sets = &self.sets;
        self.visit_supersets(&self.root, candidate.as_slice(), 0, &suffixes, &mut |entry| {
            if sets[entry].len() > size {
                results.push(entry);
            }
            false
        });
        if !results.is_empty() {
            self.bump(|s| s.positive += 1);
        }
        results
    }

    /// Store a set and return its entry id.
    ///
    /// The caller is expected to have checked minimality (or maximality).
    pub fn add(&mut self, set: BloomSet<T>) -> usize {
        let entry = self.sets.len();
        let signature = *set.signature();
        let mut current = &mut self.root;
        current.below = current.below.union(&signature);
        for element in set.iter() {
            current = current.children.entry(*element).or_default();
            current.below = current.below.union(&signature);
        }
        current.entries.push(entry);
        self.sets.push(set);
        entry
    }

    /// Add the set if it is minimal.
    ///
    /// Returns the new entry id together with the ids of the stored sets that
    /// are proper supersets of it (and therefore no longer minimal), or `None`
    /// if the set was rejected.
    pub fn add_minimal(&mut self, set: BloomSet<T>) -> Option<(usize, Vec<usize>)> {
        if !self.is_minimal(&set) {
            return None;
        }
        let superseded = self.supersets_of(&set);
        Some((self.add(set), superseded))
    }

    fn bump(&self, update: impl FnOnce(&mut FamilyStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Find a stored set contained in `candidate[pos..]` below `node`.
    fn find_subset(&self, node: &TrieNode<T>, candidate: &BloomSet<T>, pos: usize) -> Option<usize> {
        if let Some(&entry) = node.entries.first() {
            return Some(entry);
        }
        let rest = &candidate.as_slice()[pos..];
        let (first, last) = match (rest.first(), rest.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return None,
        };
        for (key, child) in node.children.range(first..=last) {
            if !candidate.signature().may_contain(key) {
                self.bump(|s| s.filtered += 1);
                continue;
            }
            self.bump(|s| s.exact_tests += 1);
            if let Ok(offset) = rest.binary_search(key) {
                if let Some(found) = self.find_subset(child, candidate, pos + offset + 1) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Visit entries below `node` whose sets contain `candidate[pos..]`.
    ///
    /// Returns true as soon as `visit` asks to stop.
    fn visit_supersets(
        &self,
        node: &TrieNode<T>,
        candidate: &[T],
        pos: usize,
        suffixes: &[Signature],
        visit: &mut dyn FnMut(usize) -> bool,
    ) -> bool {
        if pos == candidate.len() {
            return visit_all(node, visit);
        }
        if !node.below.covers(&suffixes[pos]) {
            self.bump(|s| s.filtered += 1);
            return false;
        }
        let next = candidate[pos];
        for (key, child) in node.children.range(..=next) {
            let advance = if *key == next {
                self.bump(|s| s.exact_tests += 1);
                pos + 1
            } else {
                pos
            };
            if self.visit_supersets(child, candidate, advance, suffixes, visit) {
                return true;
            }
        }
        false
    }
}

fn visit_all<T: Element>(node: &TrieNode<T>, visit: &mut dyn FnMut(usize) -> bool) -> bool {
    for &entry in &node.entries {
        if visit(entry) {
            return true;
        }
    }
    for child in node.children.values() {
        if visit_all(child, visit) {
            return true;
        }
    }
    false
}

/// `suffixes[i]` is the signature of `candidate[i..]`.
fn suffix_signatures<T: Element>(candidate: &BloomSet<T>) -> Vec<Signature> {
    let elements = candidate.as_slice();
    let mut suffixes = vec![Signature::EMPTY; elements.len() + 1];
    for i in (0..elements.len()).rev() {
        let mut signature = suffixes[i + 1];
        signature.insert(&elements[i]);
        suffixes[i] = signature;
    }
    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(elements: &[u32]) -> BloomSet<u32> {
        elements.iter().copied().collect()
    }

    #[test]
    fn test_is_minimal() {
        let mut family = MinimalFamily::new();
        family.add(set(&[1, 3]));
        family.add(set(&[2, 5, 7]));

        assert!(!family.is_minimal(&set(&[1, 3])));
        assert!(!family.is_minimal(&set(&[1, 2, 3])));
        assert!(!family.is_minimal(&set(&[0, 2, 5, 6, 7])));
        assert!(family.is_minimal(&set(&[1, 2, 5])));
        assert!(family.is_minimal(&set(&[3])));
        assert!(family.is_minimal(&set(&[])));
    }

    #[test]
    fn test_clear_resets_sets_and_stats() {
        let mut family = MinimalFamily::new();
        family.add(set(&[1, 2]));
        assert!(!family.is_minimal(&set(&[1, 2, 3])));
        family.clear();
        assert!(family.is_empty());
        assert_eq!(family.stats().queries, 0);
        assert_eq!(family.stats().positive, 0);
        assert!(family.is_minimal(&set(&[1, 2, 3])));
        assert_eq!(family.stats().queries, 1);
    }

    #[test]
    fn test_empty_set_dominates_everything() {
        let mut family = MinimalFamily::new();
        family.add(set(&[]));
        assert!(!family.is_minimal(&set(&[])));
        assert!(!family.is_minimal(&set(&[4, 9])));
        assert!(family.is_maximal(&set(&[4])));
    }

    #[test]
    fn test_is_maximal() {
        let mut family = MinimalFamily::new();
        family.add(set(&[1, 2, 3]));
        family.add(set(&[4, 5]));

        assert!(!family.is_maximal(&set(&[1, 3])));
        assert!(!family.is_maximal(&set(&[])));
        assert!(!family.is_maximal(&set(&[4, 5])));
        assert!(family.is_maximal(&set(&[3, 4])));
        assert!(family.is_maximal(&set(&[1, 2, 3, 4])));
    }

    #[test]
    fn test_supersets_of_is_strict() {
        let mut family = MinimalFamily::new();
        let a = family.add(set(&[1, 2, 3]));
        let b = family.add(set(&[1, 3]));
        let c = family.add(set(&[2, 4]));

        let mut found = family.supersets_of(&set(&[1, 3]));
        found.sort();
        assert_eq!(found, vec![a]);
        assert!(!found.contains(&b));
        assert_eq!(family.supersets_of(&set(&[2])), {
            let mut v = vec![a, c];
            v.sort();
            v
        });
    }

    #[test]
    fn test_add_minimal_reports_superseded() {
        let mut family = MinimalFamily::new();
        let (big, superseded) = family.add_minimal(set(&[1, 2, 3])).unwrap();
        assert!(superseded.is_empty());
        let (_, superseded) = family.add_minimal(set(&[2, 3])).unwrap();
        assert_eq!(superseded, vec![big]);
        assert!(family.add_minimal(set(&[1, 2, 3, 4])).is_none());
        assert_eq!(family.len(), 2);
    }

    #[test]
    fn test_stats_are_collected() {
        let mut family = MinimalFamily::new();
        family.add(set(&[10, 20]));
        family.add(set(&[30]));
        family.is_minimal(&set(&[10, 20, 30]));
        family.is_minimal(&set(&[11]));
        let stats = family.stats();
        assert_eq!(stats.queries, 2);
        assert_eq!(stats.positive, 1);
        assert!(stats.exact_tests + stats.filtered > 0);
    }

    #[test]
    fn test_matches_naive_containment() {
        let stored = [
            set(&[1, 4]),
            set(&[2]),
            set(&[3, 5, 6]),
            set(&[1, 5, 6, 7]),
        ];
        let mut family = MinimalFamily::new();
        for s in &stored {
            family.add(s.clone());
        }
        for mask in 0u32..256 {
            let candidate: BloomSet<u32> = (0..8).filter(|i| mask & (1 << i) != 0).collect();
            let naive_minimal = !stored.iter().any(|s| s.is_subset(&candidate));
            let naive_maximal = !stored.iter().any(|s| candidate.is_subset(s));
            assert_eq!(family.is_minimal(&candidate), naive_minimal, "{:?}", candidate);
            assert_eq!(family.is_maximal(&candidate), naive_maximal, "{:?}", candidate);
        }
    }
}
