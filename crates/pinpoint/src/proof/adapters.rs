//! Proof summaries and proof transformations
//!
//! The adapters compute their result eagerly for the ancestors of one goal and
//! then answer [`Proof::inferences`] from the stored result. Conclusions that
//! are not ancestors of that goal have no inferences in the adapted proof.

use super::{Inference, InferenceJustifier, Proof};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, trace};

/// All inferences reachable backward from `goal`, breadth-first.
fn reachable_inferences<C, P>(proof: &P, goal: &C) -> (IndexSet<C>, Vec<Inference<C>>)
where
    C: Clone + Eq + Hash,
    P: Proof<C> + ?Sized,
{
    let mut conclusions = IndexSet::new();
    let mut inferences = Vec::new();
    conclusions.insert(goal.clone());
    let mut next = 0;
    while let Some(conclusion) = conclusions.get_index(next).cloned() {
        next += 1;
        for inference in proof.inferences(&conclusion) {
            for premise in &inference.premises {
                conclusions.insert(premise.clone());
            }
            inferences.push(inference);
        }
    }
    (conclusions, inferences)
}

// =============================================================================
// ProofInfo
// =============================================================================

/// The conclusions, inferences and axioms used in the proofs of a goal.
#[derive(Debug, Clone)]
pub struct ProofInfo<C, A> {
    pub conclusions: Vec<C>,
    pub inferences: Vec<Inference<C>>,
    pub axioms: Vec<A>,
}

impl<C, A> ProofInfo<C, A>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    pub fn collect<P, J>(proof: &P, justifier: &J, goal: &C) -> Self
    where
        P: Proof<C> + ?Sized,
        J: InferenceJustifier<C, A> + ?Sized,
    {
        let (conclusions, inferences) = reachable_inferences(proof, goal);
        let mut axioms = IndexSet::new();
        for inference in &inferences {
            axioms.extend(justifier.justification(inference));
        }
        debug!(
            conclusions = conclusions.len(),
            inferences = inferences.len(),
            axioms = axioms.len(),
            "collected proof info"
        );
        ProofInfo {
            conclusions: conclusions.into_iter().collect(),
            inferences,
            axioms: axioms.into_iter().collect(),
        }
    }
}

// =============================================================================
// CycleRemovingProof
// =============================================================================

/// A proof without inferences that can only be used cyclically.
///
/// An inference is dropped if its conclusion is one of its premises, or if one
/// of its premises has no kept inference that avoids the conclusion. Dropped
/// inferences are re-examined whenever a premise gains a kept inference, so
/// the result is the largest stable set of kept inferences.
#[derive(Debug, Clone)]
pub struct CycleRemovingProof<C> {
    kept: HashMap<C, Vec<Inference<C>>>,
}

impl<C> CycleRemovingProof<C>
where
    C: Clone + Eq + Hash,
{
    pub fn new<P: Proof<C> + ?Sized>(proof: &P, goal: &C) -> Self {
        let (_, inferences) = reachable_inferences(proof, goal);
        let mut kept: HashMap<C, Vec<Inference<C>>> = HashMap::new();
        let mut blocked: HashMap<C, Vec<Inference<C>>> = HashMap::new();
        let mut unblocked: Vec<Inference<C>> = Vec::new();

        for inference in inferences {
            check_blocked(inference, &kept, &mut blocked, &mut unblocked);
            while let Some(next) = unblocked.pop() {
                let waiting = blocked.remove(&next.conclusion).unwrap_or_default();
                kept.entry(next.conclusion.clone()).or_default().push(next);
                for inference in waiting {
                    check_blocked(inference, &kept, &mut blocked, &mut unblocked);
                }
            }
        }

        let dropped: usize = blocked.values().map(Vec::len).sum();
        debug!(dropped, "removed cyclic inferences");
        CycleRemovingProof { kept }
    }
}

fn check_blocked<C: Clone + Eq + Hash>(
    inference: Inference<C>,
    kept: &HashMap<C, Vec<Inference<C>>>,
    blocked: &mut HashMap<C, Vec<Inference<C>>>,
    unblocked: &mut Vec<Inference<C>>,
) {
    if inference.is_cyclic() {
        trace!("inference permanently blocked");
        return;
    }
    let blocking = inference.premises.iter().find(|premise| {
        !kept
            .get(*premise)
            .map(|derived| derived.iter().any(|d| !d.premises.contains(&inference.conclusion)))
            .unwrap_or(false)
    });
    match blocking {
        Some(premise) => {
            let premise = premise.clone();
            blocked.entry(premise).or_default().push(inference);
        }
        None => unblocked.push(inference),
    }
}

impl<C> Proof<C> for CycleRemovingProof<C>
where
    C: Clone + Eq + Hash,
{
    fn inferences(&self, conclusion: &C) -> Vec<Inference<C>> {
        self.kept.get(conclusion).cloned().unwrap_or_default()
    }
}

// =============================================================================
// TautologyRemovingProof
// =============================================================================

/// A proof in which tautologies keep a single axiom-free derivation.
///
/// A conclusion is a tautology if it is derivable using inferences with empty
/// justifications only. Every tautology keeps just the inference through which
/// it was first found to be one, whose premises are tautologies found earlier;
/// other conclusions keep all of their inferences.
#[derive(Debug, Clone)]
pub struct TautologyRemovingProof<C> {
    inferences: HashMap<C, Vec<Inference<C>>>,
    tautologies: HashSet<C>,
}

impl<C> TautologyRemovingProof<C>
where
    C: Clone + Eq + Hash,
{
    pub fn new<P, J, A>(proof: &P, justifier: &J, goal: &C) -> Self
    where
        P: Proof<C> + ?Sized,
        J: InferenceJustifier<C, A> + ?Sized,
    {
        let (_, all) = reachable_inferences(proof, goal);

        // Only inferences with empty justifications can derive tautologies.
        let mut by_premise: HashMap<C, Vec<usize>> = HashMap::new();
        let mut candidates = Vec::new();
        for inference in &all {
            if justifier.justification(inference).is_empty() {
                let position = candidates.len();
                for premise in &inference.premises {
                    by_premise.entry(premise.clone()).or_default().push(position);
                }
                candidates.push(inference);
            }
        }

        let mut witness: HashMap<C, Inference<C>> = HashMap::new();
        let mut queue: Vec<C> = Vec::new();
        let is_tautology = |inference: &Inference<C>, witness: &HashMap<C, Inference<C>>| {
            !witness.contains_key(&inference.conclusion)
                && inference.premises.iter().all(|p| witness.contains_key(p))
        };
        for &inference in &candidates {
            if is_tautology(inference, &witness) {
                trace!("new tautology");
                witness.insert(inference.conclusion.clone(), inference.clone());
                queue.push(inference.conclusion.clone());
            }
        }
        while let Some(tautology) = queue.pop() {
            for &position in by_premise.get(&tautology).map(Vec::as_slice).unwrap_or(&[]) {
                let inference = candidates[position];
                if is_tautology(inference, &witness) {
                    trace!("new tautology");
                    witness.insert(inference.conclusion.clone(), inference.clone());
                    queue.push(inference.conclusion.clone());
                }
            }
        }

        let mut inferences: HashMap<C, Vec<Inference<C>>> = HashMap::new();
        for inference in all {
            if !witness.contains_key(&inference.conclusion) {
                inferences.entry(inference.conclusion.clone()).or_default().push(inference);
            }
        }
        let tautologies: HashSet<C> = witness.keys().cloned().collect();
        for (conclusion, inference) in witness {
            inferences.insert(conclusion, vec![inference]);
        }
        debug!(tautologies = tautologies.len(), "removed tautological inferences");
        TautologyRemovingProof {
            inferences,
            tautologies,
        }
    }

    pub fn is_tautology(&self, conclusion: &C) -> bool {
        self.tautologies.contains(conclusion)
    }
}

impl<C> Proof<C> for TautologyRemovingProof<C>
where
    C: Clone + Eq + Hash,
{
    fn inferences(&self, conclusion: &C) -> Vec<Inference<C>> {
        self.inferences.get(conclusion).cloned().unwrap_or_default()
    }
}
