//! Enumeration of repairs
//!
//! A repair is a minimal set of axioms whose removal makes the goal
//! underivable. The search breaks the goal directly on the proof: a job holds
//! the conclusions already broken, the axioms removed so far and the pending
//! inferences of broken conclusions that can still fire. An inference is
//! broken either by breaking one of its premises or by removing one of its
//! axioms; each choice is a branch. A job without pending inferences is a
//! repair candidate.
//!
//! Jobs are processed by ascending weight of their removal set, then by the
//! number of pending inferences. The complements of accepted repairs are kept
//! in a family, and a candidate is accepted only if its complement is maximal
//! in it.

use super::profile::SearchStats;
use super::{EnumerationStatus, JobMember, JobQueue, MinimalSubsetEnumerator, SearchContext};
use crate::collections::{BloomSet, MinimalFamily};
use crate::proof::{AxiomId, ConclusionId, InferenceId, ProofGraph};
use std::collections::BTreeSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
struct RepairJob {
    broken: BloomSet<ConclusionId>,
    removed: BloomSet<AxiomId>,
    /// Inferences still to break, cheapest (fewest premises and axioms) first
    pending: BTreeSet<(usize, InferenceId)>,
}

impl RepairJob {
    fn key(&self) -> BloomSet<JobMember> {
        self.removed
            .iter()
            .map(|&a| JobMember::Axiom(a))
            .chain(self.pending.iter().map(|&(_, id)| JobMember::Inference(id)))
            .collect()
    }

    /// Mark the conclusion broken; its inferences that can still fire become pending.
    fn break_conclusion(&self, graph: &ProofGraph, conclusion: ConclusionId) -> RepairJob {
        let mut broken = self.broken.clone();
        broken.insert(conclusion);
        let mut pending: BTreeSet<(usize, InferenceId)> = self
            .pending
            .iter()
            .filter(|&&(_, id)| !graph.inference(id).premises.contains(&conclusion))
            .copied()
            .collect();
        for &id in graph.inferences_of(conclusion) {
            let inference = graph.inference(id);
            if inference.premises.intersects(&broken) || inference.axioms.intersects(&self.removed) {
                continue;
            }
            pending.insert((inference.premises.len() + inference.axioms.len(), id));
        }
        RepairJob {
            broken,
            removed: self.removed.clone(),
            pending,
        }
    }

    /// Remove the axiom; pending inferences using it are broken.
    fn remove_axiom(&self, graph: &ProofGraph, axiom: AxiomId) -> RepairJob {
        let mut removed = self.removed.clone();
        removed.insert(axiom);
        let pending = self
            .pending
            .iter()
            .filter(|&&(_, id)| !graph.inference(id).axioms.contains(&axiom))
            .copied()
            .collect();
        RepairJob {
            broken: self.broken.clone(),
            removed,
            pending,
        }
    }
}

/// Priority-ordered search for minimal axiom removals.
#[derive(Debug, Default)]
pub struct RepairEnumerator {
    jobs: Vec<RepairJob>,
    queue: JobQueue,
    /// Keys of all processed jobs
    job_keys: MinimalFamily<JobMember>,
    /// Complements of the accepted repairs
    kept: MinimalFamily<AxiomId>,
    stats: SearchStats,
}

impl RepairEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.jobs.clear();
        self.queue = JobQueue::new();
        self.job_keys.clear();
        self.kept.clear();
        self.stats = SearchStats::default();
    }

    fn produce(&mut self, context: &SearchContext<'_>, job: RepairJob) {
        self.stats.jobs_produced += 1;
        let position = self.jobs.len();
        self.queue.push(context.weights.of(&job.removed), job.pending.len(), position);
        self.jobs.push(job);
        self.stats.observe_queue(self.queue.len());
    }
}

impl MinimalSubsetEnumerator for RepairEnumerator {
    fn enumerate(
        &mut self,
        context: &SearchContext<'_>,
        emit: &mut dyn FnMut(&BloomSet<AxiomId>),
    ) -> EnumerationStatus {
        let graph = context.graph;
        self.reset();
        let all_axioms = graph.all_axioms();
        let root = RepairJob::default().break_conclusion(graph, graph.goal());
        self.produce(context, root);

        let mut status = EnumerationStatus::Complete;
        let mut last_size = 0;
        while let Some(position) = self.queue.pop() {
            if context.monitor.is_interrupted() {
                status = EnumerationStatus::Interrupted;
                break;
            }
            self.stats.jobs_processed += 1;

            let job = std::mem::take(&mut self.jobs[position]);
            let complement = all_axioms.filtered(|axiom| !job.removed.contains(axiom));
            if !self.kept.is_maximal(&complement) {
                self.stats.blocked += 1;
                continue;
            }
            if self.job_keys.add_minimal(job.key()).is_none() {
                self.stats.jobs_pruned += 1;
                continue;
            }

            let Some(&(_, next)) = job.pending.iter().next() else {
                if job.removed.len() > last_size {
                    last_size = job.removed.len();
                    debug!(size = last_size, found = self.stats.emitted, "repair size increased");
                }
                self.kept.add(complement);
                self.stats.emitted += 1;
                emit(&job.removed);
                continue;
            };

            trace!(?next, pending = job.pending.len(), "breaking inference");
            let inference = graph.inference(next);
            for &premise in inference.premises.iter() {
                self.stats.record("broken_premises", 1);
                let branch = job.break_conclusion(graph, premise);
                self.produce(context, branch);
            }
            for &axiom in inference.axioms.iter() {
                self.stats.record("removed_axioms", 1);
                let branch = job.remove_axiom(graph, axiom);
                self.produce(context, branch);
            }
        }

        self.stats.families.merge(&self.job_keys.stats());
        self.stats.families.merge(&self.kept.stats());
        status
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn name(&self) -> &str {
        "repair"
    }
}
