//! Proofs as AND/OR graphs of inferences
//!
//! A [`Proof`] maps every conclusion to the inferences deriving it. An
//! inference holds when all of its premises hold and all of its support axioms
//! are assumed; a conclusion holds when one of its inferences does. Support
//! axioms are supplied separately by an [`InferenceJustifier`] so the same
//! proof can be read with different axiom extraction policies.

pub mod adapters;
pub mod derivability;
pub mod index;

pub use adapters::{CycleRemovingProof, ProofInfo, TautologyRemovingProof};
pub use derivability::is_derivable;
pub use index::{AxiomId, ConclusionId, IndexedInference, InferenceId, ProofGraph, ProofIndex};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

// =============================================================================
// Inference
// =============================================================================

/// One derivation step: `conclusion` follows from `premises`.
///
/// Premises may repeat; they are treated as a set wherever it matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inference<C> {
    /// Rule name, used for display only
    pub name: String,
    pub conclusion: C,
    pub premises: Vec<C>,
}

impl<C> Inference<C> {
    pub fn new(name: impl Into<String>, conclusion: C, premises: Vec<C>) -> Self {
        Inference {
            name: name.into(),
            conclusion,
            premises,
        }
    }

    /// Whether the conclusion is among its own premises.
    pub fn is_cyclic(&self) -> bool
    where
        C: PartialEq,
    {
        self.premises.contains(&self.conclusion)
    }
}

impl<C: fmt::Display> fmt::Display for Inference<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} :- ", self.name, self.conclusion)?;
        for (i, premise) in self.premises.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", premise)?;
        }
        Ok(())
    }
}

// =============================================================================
// Proof and justifier interfaces
// =============================================================================

/// Source of inferences, queried per conclusion.
///
/// Must be a pure function of the conclusion: repeated calls may return fresh
/// collections but they must be equal.
pub trait Proof<C> {
    fn inferences(&self, conclusion: &C) -> Vec<Inference<C>>;
}

impl<C, P: Proof<C> + ?Sized> Proof<C> for &P {
    fn inferences(&self, conclusion: &C) -> Vec<Inference<C>> {
        (**self).inferences(conclusion)
    }
}

/// Supplies the support axioms of an inference.
pub trait InferenceJustifier<C, A> {
    fn justification(&self, inference: &Inference<C>) -> Vec<A>;
}

impl<C, A, F> InferenceJustifier<C, A> for F
where
    F: Fn(&Inference<C>) -> Vec<A>,
{
    fn justification(&self, inference: &Inference<C>) -> Vec<A> {
        self(inference)
    }
}

// =============================================================================
// InferenceSet
// =============================================================================

/// An in-memory proof that also records the axioms of every inference.
///
/// Adding the same inference twice unions its axioms.
#[derive(Debug, Clone)]
pub struct InferenceSet<C, A> {
    by_conclusion: IndexMap<C, Vec<Inference<C>>>,
    justifications: IndexMap<Inference<C>, Vec<A>>,
}

impl<C, A> Default for InferenceSet<C, A> {
    fn default() -> Self {
        InferenceSet {
            by_conclusion: IndexMap::new(),
            justifications: IndexMap::new(),
        }
    }
}

impl<C, A> InferenceSet<C, A>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inference together with its support axioms.
    pub fn add(&mut self, inference: Inference<C>, axioms: impl IntoIterator<Item = A>) {
        match self.justifications.get_mut(&inference) {
            Some(existing) => {
                for axiom in axioms {
                    if !existing.contains(&axiom) {
                        existing.push(axiom);
                    }
                }
            }
            None => {
                let mut support: Vec<A> = Vec::new();
                for axiom in axioms {
                    if !support.contains(&axiom) {
                        support.push(axiom);
                    }
                }
                self.by_conclusion
                    .entry(inference.conclusion.clone())
                    .or_default()
                    .push(inference.clone());
                self.justifications.insert(inference, support);
            }
        }
    }

    /// Chaining form of [`add`](Self::add).
    pub fn with(
        mut self,
        name: &str,
        conclusion: C,
        premises: impl IntoIterator<Item = C>,
        axioms: impl IntoIterator<Item = A>,
    ) -> Self {
        self.add(Inference::new(name, conclusion, premises.into_iter().collect()), axioms);
        self
    }

    /// Number of distinct inferences.
    pub fn len(&self) -> usize {
        self.justifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.justifications.is_empty()
    }

    /// Conclusions having at least one inference, in insertion order.
    pub fn conclusions(&self) -> impl Iterator<Item = &C> {
        self.by_conclusion.keys()
    }

    /// All inferences with their axioms, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Inference<C>, &[A])> {
        self.justifications.iter().map(|(inference, axioms)| (inference, axioms.as_slice()))
    }
}

impl<C, A> Proof<C> for InferenceSet<C, A>
where
    C: Clone + Eq + Hash,
{
    fn inferences(&self, conclusion: &C) -> Vec<Inference<C>> {
        self.by_conclusion.get(conclusion).cloned().unwrap_or_default()
    }
}

impl<C, A> InferenceJustifier<C, A> for InferenceSet<C, A>
where
    C: Clone + Eq + Hash,
    A: Clone,
{
    fn justification(&self, inference: &Inference<C>) -> Vec<A> {
        self.justifications.get(inference).cloned().unwrap_or_default()
    }
}
