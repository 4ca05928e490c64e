//! Arena representation of the part of a proof reachable from a goal
//!
//! Conclusions and axioms are interned into dense integer ids. All enumerators
//! work on the resulting [`ProofGraph`], which only stores ids and adjacency
//! lists; the [`ProofIndex`] keeps the interning tables to map results back.

use super::{Inference, InferenceJustifier, Proof};
use crate::collections::{BloomSet, Element};
use indexmap::IndexSet;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

// =============================================================================
// Ids
// =============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Element for $name {
            fn code(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Interned conclusion; the goal is always `ConclusionId(0)`.
    ConclusionId,
    "c"
);
define_id!(
    /// Interned axiom, numbered in order of first appearance.
    AxiomId,
    "a"
);
define_id!(
    /// Position of an inference in the graph.
    InferenceId,
    "i"
);

// =============================================================================
// ProofGraph
// =============================================================================

/// An inference over interned ids. Premises and axioms are deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedInference {
    pub conclusion: ConclusionId,
    pub premises: BloomSet<ConclusionId>,
    pub axioms: BloomSet<AxiomId>,
}

/// Id-based adjacency structure of a proof restricted to a goal's ancestors.
#[derive(Debug, Clone)]
pub struct ProofGraph {
    inferences: Vec<IndexedInference>,
    by_conclusion: Vec<Vec<InferenceId>>,
    by_premise: Vec<Vec<InferenceId>>,
    axiom_count: usize,
}

impl ProofGraph {
    pub fn goal(&self) -> ConclusionId {
        ConclusionId(0)
    }

    pub fn conclusion_count(&self) -> usize {
        self.by_conclusion.len()
    }

    pub fn axiom_count(&self) -> usize {
        self.axiom_count
    }

    pub fn inference_count(&self) -> usize {
        self.inferences.len()
    }

    pub fn inference(&self, id: InferenceId) -> &IndexedInference {
        &self.inferences[id.index()]
    }

    /// Inferences deriving the conclusion.
    pub fn inferences_of(&self, conclusion: ConclusionId) -> &[InferenceId] {
        &self.by_conclusion[conclusion.index()]
    }

    /// Inferences using the conclusion as a premise.
    pub fn consumers_of(&self, conclusion: ConclusionId) -> &[InferenceId] {
        &self.by_premise[conclusion.index()]
    }

    pub fn inference_ids(&self) -> impl Iterator<Item = InferenceId> {
        (0..self.inferences.len() as u32).map(InferenceId)
    }

    pub fn conclusion_ids(&self) -> impl Iterator<Item = ConclusionId> {
        (0..self.by_conclusion.len() as u32).map(ConclusionId)
    }

    /// Every axiom of the graph.
    pub fn all_axioms(&self) -> BloomSet<AxiomId> {
        (0..self.axiom_count as u32).map(AxiomId).collect()
    }

    /// Least fixpoint of the inferences whose axioms are all available.
    ///
    /// Returns, per conclusion, whether it is derivable.
    pub fn derivable(&self, available: impl Fn(AxiomId) -> bool) -> Vec<bool> {
        let mut derived = vec![false; self.conclusion_count()];
        let mut missing: Vec<usize> = self.inferences.iter().map(|inf| inf.premises.len()).collect();
        let usable: Vec<bool> = self
            .inferences
            .iter()
            .map(|inf| inf.axioms.iter().all(|&axiom| available(axiom)))
            .collect();
        let mut queue: VecDeque<InferenceId> = self
            .inference_ids()
            .filter(|id| usable[id.index()] && missing[id.index()] == 0)
            .collect();

        while let Some(id) = queue.pop_front() {
            let conclusion = self.inferences[id.index()].conclusion;
            if derived[conclusion.index()] {
                continue;
            }
            derived[conclusion.index()] = true;
            for &consumer in self.consumers_of(conclusion) {
                missing[consumer.index()] -= 1;
                if missing[consumer.index()] == 0 && usable[consumer.index()] {
                    queue.push_back(consumer);
                }
            }
        }
        derived
    }
}

// =============================================================================
// ProofIndex
// =============================================================================

/// A [`ProofGraph`] together with the tables mapping ids back to values.
#[derive(Debug, Clone)]
pub struct ProofIndex<C, A> {
    graph: ProofGraph,
    conclusions: IndexSet<C>,
    axioms: IndexSet<A>,
    sources: Vec<Inference<C>>,
}

impl<C, A> ProofIndex<C, A>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    /// Index every inference reachable backward from the goal.
    ///
    /// Conclusions are visited breadth-first, so cycles are expanded once.
    /// Inferences equal in conclusion, premise set and axiom set are kept once.
    pub fn build<P, J>(proof: &P, justifier: &J, goal: &C) -> Self
    where
        P: Proof<C> + ?Sized,
        J: InferenceJustifier<C, A> + ?Sized,
    {
        let mut conclusions = IndexSet::new();
        let mut axioms = IndexSet::new();
        let mut inferences = Vec::new();
        let mut sources = Vec::new();
        let mut by_conclusion: Vec<Vec<InferenceId>> = Vec::new();
        let mut seen: HashSet<IndexedInference> = HashSet::new();

        conclusions.insert(goal.clone());
        let mut next = 0;
        while next < conclusions.len() {
            let conclusion_id = ConclusionId(next as u32);
            let conclusion = match conclusions.get_index(next) {
                Some(conclusion) => conclusion.clone(),
                None => break,
            };
            next += 1;
            let mut derived_by = Vec::new();
            for inference in proof.inferences(&conclusion) {
                let premises: BloomSet<ConclusionId> = inference
                    .premises
                    .iter()
                    .map(|premise| ConclusionId(conclusions.insert_full(premise.clone()).0 as u32))
                    .collect();
                let support: BloomSet<AxiomId> = justifier
                    .justification(&inference)
                    .into_iter()
                    .map(|axiom| AxiomId(axioms.insert_full(axiom).0 as u32))
                    .collect();
                let indexed = IndexedInference {
                    conclusion: conclusion_id,
                    premises,
                    axioms: support,
                };
                if !seen.insert(indexed.clone()) {
                    continue;
                }
                derived_by.push(InferenceId(inferences.len() as u32));
                inferences.push(indexed);
                sources.push(inference);
            }
            by_conclusion.push(derived_by);
        }

        let mut by_premise = vec![Vec::new(); conclusions.len()];
        for (position, inference) in inferences.iter().enumerate() {
            for premise in inference.premises.iter() {
                by_premise[premise.index()].push(InferenceId(position as u32));
            }
        }

        let graph = ProofGraph {
            inferences,
            by_conclusion,
            by_premise,
            axiom_count: axioms.len(),
        };
        ProofIndex {
            graph,
            conclusions,
            axioms,
            sources,
        }
    }

    pub fn graph(&self) -> &ProofGraph {
        &self.graph
    }

    pub fn conclusion(&self, id: ConclusionId) -> &C {
        &self.conclusions[id.index()]
    }

    pub fn axiom(&self, id: AxiomId) -> &A {
        &self.axioms[id.index()]
    }

    pub fn conclusion_id(&self, conclusion: &C) -> Option<ConclusionId> {
        self.conclusions.get_index_of(conclusion).map(|i| ConclusionId(i as u32))
    }

    pub fn axiom_id(&self, axiom: &A) -> Option<AxiomId> {
        self.axioms.get_index_of(axiom).map(|i| AxiomId(i as u32))
    }

    /// The inference an indexed inference was built from.
    pub fn source(&self, id: InferenceId) -> &Inference<C> {
        &self.sources[id.index()]
    }

    /// Conclusions in id order.
    pub fn conclusions(&self) -> impl Iterator<Item = &C> {
        self.conclusions.iter()
    }

    /// Axioms in id order.
    pub fn axioms(&self) -> impl Iterator<Item = &A> {
        self.axioms.iter()
    }

    /// Resolve a set of axiom ids, in id order.
    pub fn axioms_of(&self, set: &BloomSet<AxiomId>) -> Vec<A> {
        set.iter().map(|&id| self.axioms[id.index()].clone()).collect()
    }

    /// Intern a set of axioms, ignoring those that do not occur in the graph.
    pub fn axiom_set<'a>(&self, axioms: impl IntoIterator<Item = &'a A>) -> BloomSet<AxiomId>
    where
        A: 'a,
    {
        axioms.into_iter().filter_map(|axiom| self.axiom_id(axiom)).collect()
    }
}
