//! Bottom-up enumeration of justifications
//!
//! Every conclusion keeps a family of minimal justifications. Inferences
//! without premises seed candidate justifications for their conclusions; every
//! accepted justification is combined, through the inferences using its
//! conclusion as a premise, with the justifications of the other premises.
//! Candidates are processed by ascending weight, so a justification accepted
//! for the goal is never superseded later and is emitted right away.

use super::profile::SearchStats;
use super::{EnumerationStatus, JobQueue, MinimalSubsetEnumerator, SearchContext};
use crate::collections::{BloomSet, MinimalFamily};
use crate::proof::{AxiomId, ConclusionId, ProofGraph};
use tracing::{debug, trace};

/// A candidate or accepted justification of one conclusion.
#[derive(Debug, Clone)]
struct Justification {
    conclusion: ConclusionId,
    axioms: BloomSet<AxiomId>,
    /// Depth of the derivation that produced it
    age: usize,
    /// Set once a proper subset has been accepted for the same conclusion
    obsolete: bool,
}

/// Fixpoint propagation of justification families.
#[derive(Debug, Default)]
pub struct BottomUp {
    justifications: Vec<Justification>,
    queue: JobQueue,
    families: Vec<MinimalFamily<AxiomId>>,
    /// Per conclusion: family entry -> position in `justifications`
    members: Vec<Vec<usize>>,
    stats: SearchStats,
}

impl BottomUp {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, graph: &ProofGraph) {
        let conclusions = graph.conclusion_count();
        self.justifications.clear();
        self.queue = JobQueue::new();
        self.families = (0..conclusions).map(|_| MinimalFamily::new()).collect();
        self.members = vec![Vec::new(); conclusions];
        self.stats = SearchStats::default();
    }

    fn produce(
        &mut self,
        context: &SearchContext<'_>,
        conclusion: ConclusionId,
        axioms: BloomSet<AxiomId>,
        age: usize,
    ) {
        self.stats.jobs_produced += 1;
        if !self.families[conclusion.index()].is_minimal(&axioms) {
            self.stats.jobs_pruned += 1;
            return;
        }
        let goal = context.graph.goal();
        if conclusion != goal && !self.families[goal.index()].is_minimal(&axioms) {
            self.stats.blocked += 1;
            return;
        }
        let position = self.justifications.len();
        self.queue.push(context.weights.of(&axioms), age, position);
        self.justifications.push(Justification {
            conclusion,
            axioms,
            age,
            obsolete: false,
        });
        self.stats.observe_queue(self.queue.len());
    }

    /// Live (non-obsolete) justifications of a conclusion, with their ages.
    fn live(&self, conclusion: ConclusionId) -> Vec<(BloomSet<AxiomId>, usize)> {
        self.members[conclusion.index()]
            .iter()
            .map(|&position| &self.justifications[position])
            .filter(|justification| !justification.obsolete)
            .map(|justification| (justification.axioms.clone(), justification.age))
            .collect()
    }

    /// Combine the justification at `position` through every inference using its conclusion.
    fn propagate(&mut self, context: &SearchContext<'_>, position: usize) {
        let graph = context.graph;
        let (conclusion, axioms, age) = {
            let justification = &self.justifications[position];
            (justification.conclusion, justification.axioms.clone(), justification.age)
        };

        for &consumer in graph.consumers_of(conclusion) {
            let inference = graph.inference(consumer);
            let mut partial = vec![(axioms.union(&inference.axioms), age)];
            for &premise in inference.premises.iter() {
                if premise == conclusion {
                    continue;
                }
                let family = self.live(premise);
                if family.is_empty() {
                    partial.clear();
                    break;
                }
                partial = join(&partial, &family);
            }
            self.stats.candidates += partial.len();
            for (candidate, depth) in partial {
                self.produce(context, inference.conclusion, candidate, depth + 1);
            }
        }
    }
}

/// Pairwise unions of two lists of sets, keeping only the minimal ones.
fn join(
    left: &[(BloomSet<AxiomId>, usize)],
    right: &[(BloomSet<AxiomId>, usize)],
) -> Vec<(BloomSet<AxiomId>, usize)> {
    let mut products: Vec<(BloomSet<AxiomId>, usize)> = Vec::with_capacity(left.len() * right.len());
    for (first, first_age) in left {
        for (second, second_age) in right {
            products.push((first.union(second), (*first_age).max(*second_age)));
        }
    }
    products.sort_by_key(|(set, _)| set.len());

    let mut minimal = MinimalFamily::new();
    let mut result = Vec::new();
    for (set, age) in products {
        if minimal.is_minimal(&set) {
            minimal.add(set.clone());
            result.push((set, age));
        }
    }
    result
}

impl MinimalSubsetEnumerator for BottomUp {
    fn enumerate(
        &mut self,
        context: &SearchContext<'_>,
        emit: &mut dyn FnMut(&BloomSet<AxiomId>),
    ) -> EnumerationStatus {
        let graph = context.graph;
        self.reset(graph);
        let goal = graph.goal();

        for id in graph.inference_ids() {
            let inference = graph.inference(id);
            if inference.premises.is_empty() {
                self.produce(context, inference.conclusion, inference.axioms.clone(), 0);
            }
        }

        let mut status = EnumerationStatus::Complete;
        let mut last_size = 0;
        while let Some(position) = self.queue.pop() {
            if context.monitor.is_interrupted() {
                status = EnumerationStatus::Interrupted;
                break;
            }
            self.stats.jobs_processed += 1;

            let conclusion = self.justifications[position].conclusion;
            let family = &self.families[conclusion.index()];
            if !family.is_minimal(&self.justifications[position].axioms) {
                self.stats.jobs_pruned += 1;
                continue;
            }
            if conclusion != goal && !self.families[goal.index()].is_minimal(&self.justifications[position].axioms) {
                trace!(?conclusion, "candidate blocked by a goal justification");
                self.stats.blocked += 1;
                continue;
            }

            let axioms = self.justifications[position].axioms.clone();
            let family = &mut self.families[conclusion.index()];
            let superseded = family.supersets_of(&axioms);
            family.add(axioms.clone());
            self.members[conclusion.index()].push(position);
            for entry in superseded {
                let obsolete = self.members[conclusion.index()][entry];
                self.justifications[obsolete].obsolete = true;
                self.stats.record("obsolete", 1);
            }

            if conclusion == goal {
                if axioms.len() > last_size {
                    last_size = axioms.len();
                    debug!(size = last_size, found = self.stats.emitted, "justification size increased");
                }
                self.stats.emitted += 1;
                emit(&axioms);
            }
            self.propagate(context, position);
        }

        let largest = self.families.iter().map(MinimalFamily::len).max().unwrap_or(0);
        self.stats.record("max_family_size", largest);
        for family in &self.families {
            self.stats.families.merge(&family.stats());
        }
        status
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn name(&self) -> &str {
        "bottom-up"
    }
}
