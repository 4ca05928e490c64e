//! Resolution-based enumeration of justifications
//!
//! Every inference of the indexed proof is read as a clause
//! `conclusion :- premises` labelled with its justification. Two derived
//! inferences resolve when the conclusion of the first is a premise of the
//! second:
//!
//! ```text
//!   c :- P1 [J1]      d :- c, P2 [J2]
//!   ---------------------------------
//!         d :- P1, P2 [J1 ∪ J2]
//! ```
//!
//! A derived inference for the goal without premises is a justification
//! candidate. A [`Selection`] function fixes for each derived inference the
//! single atom it can be resolved on, which keeps the number of resolvents
//! manageable. Derived inferences are processed by ascending weight of their
//! justification, then by number of premises; an inference is dropped when
//! its justification contains a justification already found or when another
//! inference with the same conclusion has a subset of its premises and of its
//! justification.

mod selection;

pub use selection::{create_selection, BottomUpSelection, Selection, ThresholdSelection, TopDownSelection};

use super::profile::SearchStats;
use super::{EnumerationStatus, JobMember, JobQueue, MinimalSubsetEnumerator, SearchContext};
use crate::collections::{BloomSet, MinimalFamily};
use crate::proof::{AxiomId, ConclusionId, IndexedInference};
use tracing::{debug, trace};

// =============================================================================
// Derived inferences
// =============================================================================

/// An inference obtained from the proof or by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedInference {
    pub conclusion: ConclusionId,
    pub premises: BloomSet<ConclusionId>,
    pub justification: BloomSet<AxiomId>,
}

impl DerivedInference {
    /// Whether the conclusion is one of the premises.
    pub fn is_tautology(&self) -> bool {
        self.premises.contains(&self.conclusion)
    }

    /// Resolve this inference on its conclusion with a premise of `other`.
    pub fn resolve_with(&self, other: &DerivedInference) -> DerivedInference {
        DerivedInference {
            conclusion: other.conclusion,
            premises: other.premises.replace(&self.conclusion, &self.premises),
            justification: self.justification.union(&other.justification),
        }
    }

    /// Premises and justification; compared among inferences with the same conclusion.
    fn key(&self) -> BloomSet<JobMember> {
        self.premises
            .iter()
            .map(|&p| JobMember::Premise(p))
            .chain(self.justification.iter().map(|&a| JobMember::Axiom(a)))
            .collect()
    }
}

impl From<&IndexedInference> for DerivedInference {
    fn from(inference: &IndexedInference) -> Self {
        DerivedInference {
            conclusion: inference.conclusion,
            premises: inference.premises.clone(),
            justification: inference.axioms.clone(),
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolution under a selection function.
pub struct Resolution {
    selection: Box<dyn Selection>,
    /// All produced inferences; the queue and the indexes refer to positions here
    inferences: Vec<DerivedInference>,
    queue: JobQueue,
    /// Per conclusion: keys of the minimal inferences processed so far
    minimal: Vec<MinimalFamily<JobMember>>,
    /// Per conclusion: inferences resolved on that conclusion
    by_selected_conclusion: Vec<Vec<usize>>,
    /// Per conclusion: inferences resolved on that premise
    by_selected_premise: Vec<Vec<usize>>,
    justifications: MinimalFamily<AxiomId>,
    stats: SearchStats,
}

impl Resolution {
    pub fn new(selection: Box<dyn Selection>) -> Self {
        Resolution {
            selection,
            inferences: Vec::new(),
            queue: JobQueue::new(),
            minimal: Vec::new(),
            by_selected_conclusion: Vec::new(),
            by_selected_premise: Vec::new(),
            justifications: MinimalFamily::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn selection(&self) -> &dyn Selection {
        self.selection.as_ref()
    }

    fn reset(&mut self, conclusions: usize) {
        self.inferences.clear();
        self.queue = JobQueue::new();
        self.minimal = (0..conclusions).map(|_| MinimalFamily::new()).collect();
        self.by_selected_conclusion = vec![Vec::new(); conclusions];
        self.by_selected_premise = vec![Vec::new(); conclusions];
        self.justifications.clear();
        self.stats = SearchStats::default();
    }

    fn produce(&mut self, context: &SearchContext<'_>, inference: DerivedInference) {
        if inference.is_tautology() {
            self.stats.record("tautologies", 1);
            return;
        }
        self.stats.jobs_produced += 1;
        let position = self.inferences.len();
        self.queue.push(
            context.weights.of(&inference.justification),
            inference.premises.len(),
            position,
        );
        self.inferences.push(inference);
        self.stats.observe_queue(self.queue.len());
    }
}

impl MinimalSubsetEnumerator for Resolution {
    fn enumerate(
        &mut self,
        context: &SearchContext<'_>,
        emit: &mut dyn FnMut(&BloomSet<AxiomId>),
    ) -> EnumerationStatus {
        let graph = context.graph;
        let goal = graph.goal();
        self.reset(graph.conclusion_count());
        for id in graph.inference_ids() {
            self.produce(context, DerivedInference::from(graph.inference(id)));
        }

        let mut status = EnumerationStatus::Complete;
        let mut last_size = 0;
        while let Some(position) = self.queue.pop() {
            if context.monitor.is_interrupted() {
                status = EnumerationStatus::Interrupted;
                break;
            }
            self.stats.jobs_processed += 1;

            let inference = self.inferences[position].clone();
            if !self.justifications.is_minimal(&inference.justification) {
                self.stats.blocked += 1;
                continue;
            }
            if inference.premises.is_empty() && inference.conclusion == goal {
                if inference.justification.len() > last_size {
                    last_size = inference.justification.len();
                    debug!(size = last_size, found = self.stats.emitted, "justification size increased");
                }
                self.justifications.add(inference.justification.clone());
                self.stats.emitted += 1;
                emit(&inference.justification);
                continue;
            }

            if self.minimal[inference.conclusion.index()].add_minimal(inference.key()).is_none() {
                self.stats.jobs_pruned += 1;
                continue;
            }
            self.stats.record("minimal_inferences", 1);

            let selected = self.selection.select(&inference, graph, goal).or_else(|| {
                // the goal is never resolved on
                if inference.conclusion == goal {
                    inference.premises.iter().copied().min_by_key(|&p| (graph.inferences_of(p).len(), p))
                } else {
                    None
                }
            });
            match selected {
                None => {
                    let conclusion = inference.conclusion;
                    trace!(?conclusion, "resolving on conclusion");
                    self.by_selected_conclusion[conclusion.index()].push(position);
                    for i in 0..self.by_selected_premise[conclusion.index()].len() {
                        let other = self.by_selected_premise[conclusion.index()][i];
                        let resolvent = inference.resolve_with(&self.inferences[other]);
                        self.stats.candidates += 1;
                        self.produce(context, resolvent);
                    }
                }
                Some(premise) => {
                    trace!(?premise, "resolving on premise");
                    self.by_selected_premise[premise.index()].push(position);
                    for i in 0..self.by_selected_conclusion[premise.index()].len() {
                        let other = self.by_selected_conclusion[premise.index()][i];
                        let resolvent = self.inferences[other].resolve_with(&inference);
                        self.stats.candidates += 1;
                        self.produce(context, resolvent);
                    }
                }
            }
        }

        for family in &self.minimal {
            self.stats.families.merge(&family.stats());
        }
        self.stats.families.merge(&self.justifications.stats());
        status
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn name(&self) -> &str {
        "resolution"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionStrategy;
    use crate::enumerate::enumerate_ids;
    use crate::proof::InferenceSet;

    const STRATEGIES: [SelectionStrategy; 4] = [
        SelectionStrategy::BottomUp,
        SelectionStrategy::TopDown,
        SelectionStrategy::Threshold(1),
        SelectionStrategy::Threshold(2),
    ];

    fn run(
        set: &InferenceSet<&'static str, &'static str>,
        goal: &'static str,
        strategy: SelectionStrategy,
    ) -> Vec<Vec<&'static str>> {
        let mut enumerator = Resolution::new(create_selection(strategy));
        let (index, results) = enumerate_ids(set, set, &goal, &mut enumerator);
        let mut found: Vec<Vec<&str>> = results.iter().map(|r| index.axioms_of(r)).collect();
        for axioms in &mut found {
            axioms.sort();
        }
        found.sort();
        found
    }

    #[test]
    fn test_resolve_with() {
        let first = DerivedInference {
            conclusion: ConclusionId(2),
            premises: [ConclusionId(3)].into_iter().collect(),
            justification: [AxiomId(0)].into_iter().collect(),
        };
        let second = DerivedInference {
            conclusion: ConclusionId(0),
            premises: [ConclusionId(1), ConclusionId(2)].into_iter().collect(),
            justification: [AxiomId(1)].into_iter().collect(),
        };
        let resolvent = first.resolve_with(&second);
        assert_eq!(resolvent.conclusion, ConclusionId(0));
        assert_eq!(resolvent.premises.as_slice(), &[ConclusionId(1), ConclusionId(3)]);
        assert_eq!(resolvent.justification.as_slice(), &[AxiomId(0), AxiomId(1)]);
        assert!(!resolvent.is_tautology());
    }

    #[test]
    fn test_wide_inferences_resolve_directly() {
        let set = InferenceSet::new()
            .with("g", "G", ["a", "b", "c"], [])
            .with("a", "a", [], ["p"])
            .with("b1", "b", [], ["q"])
            .with("b2", "b", [], ["p"])
            .with("c", "c", ["d", "e", "f"], ["r"])
            .with("d", "d", [], ["s"])
            .with("e", "e", [], ["s"])
            .with("f", "f", [], ["t"]);
        for strategy in STRATEGIES {
            assert_eq!(
                run(&set, "G", strategy),
                vec![vec!["p", "r", "s", "t"]],
                "{}",
                strategy
            );
        }
    }

    #[test]
    fn test_two_alternatives_for_every_selection() {
        let set = InferenceSet::new()
            .with("r1", "G", ["x"], ["ax1"])
            .with("r2", "G", [], ["ax2", "ax3"])
            .with("r3", "x", [], ["ax4"]);
        for strategy in STRATEGIES {
            assert_eq!(
                run(&set, "G", strategy),
                vec![vec!["ax1", "ax4"], vec!["ax2", "ax3"]],
                "{}",
                strategy
            );
        }
    }

    #[test]
    fn test_deep_chain_with_alternatives() {
        let set = InferenceSet::new()
            .with("g", "G", ["a", "b"], [])
            .with("a1", "a", ["c"], ["p"])
            .with("a2", "a", [], ["q", "r"])
            .with("b", "b", ["c"], [])
            .with("c1", "c", [], ["s"])
            .with("c2", "c", [], ["t"])
            .with("c3", "c", [], ["u"]);
        for strategy in STRATEGIES {
            assert_eq!(
                run(&set, "G", strategy),
                vec![
                    vec!["p", "s"],
                    vec!["p", "t"],
                    vec!["p", "u"],
                    vec!["q", "r", "s"],
                    vec!["q", "r", "t"],
                    vec!["q", "r", "u"],
                ],
                "{}",
                strategy
            );
        }
    }

    #[test]
    fn test_self_loop_yields_nothing() {
        let set: InferenceSet<&str, &str> = InferenceSet::new().with("loop", "X", ["X"], []);
        for strategy in STRATEGIES {
            assert!(run(&set, "X", strategy).is_empty());
        }
    }

    #[test]
    fn test_tautologies_are_dropped() {
        let set = InferenceSet::new()
            .with("g", "G", ["a"], [])
            .with("aa", "a", ["a"], ["w"])
            .with("ab", "a", ["b"], ["x"])
            .with("ba", "b", ["a"], ["y"])
            .with("b", "b", [], ["z"]);
        let mut enumerator = Resolution::new(create_selection(SelectionStrategy::TopDown));
        let (index, results) = enumerate_ids(&set, &set, &"G", &mut enumerator);
        assert_eq!(results.len(), 1);
        assert_eq!(index.axioms_of(&results[0]), vec!["x", "z"]);
        assert_eq!(enumerator.stats().counters.get("tautologies"), Some(&1));
    }
}
