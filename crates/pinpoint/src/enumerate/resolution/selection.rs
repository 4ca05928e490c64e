//! Selection functions for resolution
//!
//! A selection function decides, for each derived inference, which atom it is
//! resolved on: one of its premises (`Some`) or its conclusion (`None`).
//! An inference for the goal that still has premises must select a premise.

use super::DerivedInference;
use crate::config::SelectionStrategy;
use crate::proof::{ConclusionId, ProofGraph};

/// Trait for resolution selection strategies
pub trait Selection {
    /// The premise to resolve on, or `None` to resolve on the conclusion.
    fn select(&self, inference: &DerivedInference, graph: &ProofGraph, goal: ConclusionId) -> Option<ConclusionId>;

    /// Get the name of this selection strategy
    fn name(&self) -> &str;
}

/// The premise derived by the fewest inferences, with its inference count.
///
/// Ties go to the smallest id.
fn fewest_inferences(inference: &DerivedInference, graph: &ProofGraph) -> Option<(ConclusionId, usize)> {
    inference
        .premises
        .iter()
        .map(|&premise| (premise, graph.inferences_of(premise).len()))
        .min_by_key(|&(premise, count)| (count, premise))
}

/// Always resolve on a premise; inferences without premises resolve on
/// their conclusion.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomUpSelection;

impl Selection for BottomUpSelection {
    fn select(&self, inference: &DerivedInference, graph: &ProofGraph, _goal: ConclusionId) -> Option<ConclusionId> {
        fewest_inferences(inference, graph).map(|(premise, _)| premise)
    }

    fn name(&self) -> &str {
        "bottom-up"
    }
}

/// Resolve on the conclusion unless it is the goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopDownSelection;

impl Selection for TopDownSelection {
    fn select(&self, inference: &DerivedInference, graph: &ProofGraph, goal: ConclusionId) -> Option<ConclusionId> {
        if inference.conclusion != goal {
            return None;
        }
        fewest_inferences(inference, graph).map(|(premise, _)| premise)
    }

    fn name(&self) -> &str {
        "top-down"
    }
}

/// Bottom-up selection, except that a premise with more inferences than the
/// threshold is only selected for the goal.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSelection {
    threshold: usize,
}

impl ThresholdSelection {
    pub fn new(threshold: usize) -> Self {
        ThresholdSelection { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Selection for ThresholdSelection {
    fn select(&self, inference: &DerivedInference, graph: &ProofGraph, goal: ConclusionId) -> Option<ConclusionId> {
        let (premise, count) = fewest_inferences(inference, graph)?;
        if count > self.threshold && inference.conclusion != goal {
            return None;
        }
        Some(premise)
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

/// Create the selection function for a strategy.
pub fn create_selection(strategy: SelectionStrategy) -> Box<dyn Selection> {
    match strategy {
        SelectionStrategy::BottomUp => Box::new(BottomUpSelection),
        SelectionStrategy::TopDown => Box::new(TopDownSelection),
        SelectionStrategy::Threshold(threshold) => Box::new(ThresholdSelection::new(threshold)),
    }
}
