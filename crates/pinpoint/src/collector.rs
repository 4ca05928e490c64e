//! Size-bounded collection of justifications and repairs
//!
//! Results arrive by ascending cardinality, so the first result above the
//! limit cancels the run: nothing smaller can follow it.

use crate::config::EnumerationConfig;
use crate::enumerate::{CancellationToken, Enumeration};
use crate::error::Result;
use crate::proof::{InferenceJustifier, Proof};
use std::hash::Hash;
use tracing::debug;

/// Which minimal sets to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Justifications,
    Repairs,
}

/// Collect the justifications of `goal` with at most `size_limit` axioms.
///
/// A limit of 0 means unlimited.
pub fn collect_justifications<C, A, P, J>(
    proof: &P,
    justifier: &J,
    goal: &C,
    config: &EnumerationConfig,
    size_limit: usize,
) -> Result<Vec<Vec<A>>>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
    P: Proof<C>,
    J: InferenceJustifier<C, A>,
{
    collect(proof, justifier, goal, config, size_limit, CollectionKind::Justifications)
}

/// Collect the repairs of `goal` removing at most `size_limit` axioms.
///
/// A limit of 0 means unlimited.
pub fn collect_repairs<C, A, P, J>(
    proof: &P,
    justifier: &J,
    goal: &C,
    config: &EnumerationConfig,
    size_limit: usize,
) -> Result<Vec<Vec<A>>>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
    P: Proof<C>,
    J: InferenceJustifier<C, A>,
{
    collect(proof, justifier, goal, config, size_limit, CollectionKind::Repairs)
}

pub fn collect<C, A, P, J>(
    proof: &P,
    justifier: &J,
    goal: &C,
    config: &EnumerationConfig,
    size_limit: usize,
    kind: CollectionKind,
) -> Result<Vec<Vec<A>>>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
    P: Proof<C>,
    J: InferenceJustifier<C, A>,
{
    let limit = if size_limit == 0 { usize::MAX } else { size_limit };
    let token = CancellationToken::new();
    let enumeration = Enumeration::new(proof, justifier, config)?.with_monitor(&token);

    let mut sets: Vec<Vec<A>> = Vec::new();
    let mut listener = |axioms: &[A]| {
        if axioms.len() <= limit {
            sets.push(axioms.to_vec());
        } else {
            token.cancel();
        }
    };
    let report = match kind {
        CollectionKind::Justifications => enumeration.justifications(goal, &mut listener),
        CollectionKind::Repairs => enumeration.repairs(goal, &mut listener),
    };
    debug!(?kind, limit = size_limit, collected = sets.len(), complete = report.is_complete(), "collected");
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::InferenceSet;

    fn example() -> InferenceSet<&'static str, &'static str> {
        InferenceSet::new()
            .with("one", "G", [], ["a"])
            .with("two", "G", [], ["b", "c"])
            .with("three", "G", [], ["d", "e", "f"])
    }

    #[test]
    fn test_limit_cuts_larger_justifications() {
        let set = example();
        let config = EnumerationConfig::default();
        let found = collect_justifications(&set, &set, &"G", &config, 2).unwrap();
        assert_eq!(found, vec![vec!["a"], vec!["b", "c"]]);
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let set = example();
        let config = EnumerationConfig::default();
        let found = collect_justifications(&set, &set, &"G", &config, 0).unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_repairs_are_limited() {
        let set = example();
        let config = EnumerationConfig::default();
        let all = collect_repairs(&set, &set, &"G", &config, 0).unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|repair| repair.len() == 3));
        assert!(collect_repairs(&set, &set, &"G", &config, 2).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let set = example();
        let config = EnumerationConfig {
            strategy: crate::config::EnumerationStrategy::Resolution(crate::config::SelectionStrategy::Threshold(0)),
            ..EnumerationConfig::default()
        };
        assert!(collect_justifications(&set, &set, &"G", &config, 0).is_err());
    }
}
