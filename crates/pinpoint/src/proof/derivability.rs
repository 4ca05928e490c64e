//! Replaying a proof restricted to a set of axioms

use super::{InferenceJustifier, Proof, ProofIndex};
use std::collections::HashSet;
use std::hash::Hash;

/// Whether `goal` is derivable when only the given axioms may be assumed.
///
/// Computes the least fixpoint of the inferences reachable from the goal whose
/// support axioms are all available. Cycles never contribute on their own.
pub fn is_derivable<C, A, P, J>(proof: &P, justifier: &J, goal: &C, axioms: &[A]) -> bool
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
    P: Proof<C> + ?Sized,
    J: InferenceJustifier<C, A> + ?Sized,
{
    let index = ProofIndex::build(proof, justifier, goal);
    let available: HashSet<_> = index.axiom_set(axioms).iter().copied().collect();
    let graph = index.graph();
    graph.derivable(|axiom| available.contains(&axiom))[graph.goal().index()]
}
