//! Top-down enumeration of justifications
//!
//! A job is a partial derivation of the goal: the conclusions still to be
//! derived (`open`) and the axioms used so far (`support`). Starting from
//! `({goal}, {})`, a job is expanded by replacing one open conclusion with the
//! premises of each of its inferences. A job without open conclusions is a
//! justification candidate.
//!
//! Jobs are processed by ascending weight of their support, then by the
//! number of open conclusions. A job is dropped when its support contains a
//! justification already found, or when another job has a subset of its open
//! conclusions and a subset of its support.

use super::profile::SearchStats;
use super::{EnumerationStatus, JobMember, JobQueue, MinimalSubsetEnumerator, SearchContext};
use crate::collections::{BloomSet, MinimalFamily};
use crate::proof::{AxiomId, ConclusionId, ProofGraph};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
struct Job {
    open: BloomSet<ConclusionId>,
    support: BloomSet<AxiomId>,
    /// Set once a dominating job has been produced
    obsolete: bool,
}

impl Job {
    /// Combined representation used for dominance checks.
    fn key(&self) -> BloomSet<JobMember> {
        self.open
            .iter()
            .map(|&c| JobMember::Conclusion(c))
            .chain(self.support.iter().map(|&a| JobMember::Axiom(a)))
            .collect()
    }
}

/// Priority-ordered goal-directed search.
#[derive(Debug, Default)]
pub struct TopDown {
    jobs: Vec<Job>,
    queue: JobQueue,
    /// Keys of all jobs put on the queue
    job_keys: MinimalFamily<JobMember>,
    /// Per entry of `job_keys`: position in `jobs`
    key_owner: Vec<usize>,
    justifications: MinimalFamily<AxiomId>,
    stats: SearchStats,
}

impl TopDown {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.jobs.clear();
        self.queue = JobQueue::new();
        self.job_keys.clear();
        self.key_owner.clear();
        self.justifications.clear();
        self.stats = SearchStats::default();
    }

    fn produce(&mut self, context: &SearchContext<'_>, open: BloomSet<ConclusionId>, support: BloomSet<AxiomId>) {
        self.stats.jobs_produced += 1;
        if !self.justifications.is_minimal(&support) {
            self.stats.blocked += 1;
            return;
        }
        let job = Job {
            open,
            support,
            obsolete: false,
        };
        let (_, dominated) = match self.job_keys.add_minimal(job.key()) {
            Some(added) => added,
            None => {
                self.stats.jobs_pruned += 1;
                return;
            }
        };
        for entry in dominated {
            let position = self.key_owner[entry];
            if !self.jobs[position].obsolete {
                self.jobs[position].obsolete = true;
                self.stats.record("obsolete", 1);
            }
        }

        let position = self.jobs.len();
        self.key_owner.push(position);
        self.queue.push(context.weights.of(&job.support), job.open.len(), position);
        self.jobs.push(job);
        self.stats.observe_queue(self.queue.len());
    }

    /// The open conclusion with the fewest inferences; ties go to the smallest id.
    fn choose(graph: &ProofGraph, open: &BloomSet<ConclusionId>) -> Option<ConclusionId> {
        open.iter()
            .copied()
            .min_by_key(|&conclusion| (graph.inferences_of(conclusion).len(), conclusion))
    }
}

impl MinimalSubsetEnumerator for TopDown {
    fn enumerate(
        &mut self,
        context: &SearchContext<'_>,
        emit: &mut dyn FnMut(&BloomSet<AxiomId>),
    ) -> EnumerationStatus {
        let graph = context.graph;
        self.reset();
        self.produce(context, BloomSet::singleton(graph.goal()), BloomSet::new());

        let mut status = EnumerationStatus::Complete;
        let mut last_size = 0;
        while let Some(position) = self.queue.pop() {
            if context.monitor.is_interrupted() {
                status = EnumerationStatus::Interrupted;
                break;
            }
            let Job { open, support, obsolete } = std::mem::take(&mut self.jobs[position]);
            if obsolete {
                self.stats.jobs_pruned += 1;
                continue;
            }
            self.stats.jobs_processed += 1;

            let Some(next) = Self::choose(graph, &open) else {
                if self.justifications.is_minimal(&support) {
                    if support.len() > last_size {
                        last_size = support.len();
                        debug!(size = last_size, found = self.stats.emitted, "justification size increased");
                    }
                    self.stats.emitted += 1;
                    emit(&support);
                    self.justifications.add(support);
                } else {
                    self.stats.blocked += 1;
                }
                continue;
            };

            trace!(?next, open = open.len(), "expanding conclusion");
            self.stats.record("expansions", 1);
            for &inference in graph.inferences_of(next) {
                let inference = graph.inference(inference);
                let expanded = open.replace(&next, &inference.premises);
                self.produce(context, expanded, support.union(&inference.axioms));
            }
        }

        self.stats.families.merge(&self.job_keys.stats());
        self.stats.families.merge(&self.justifications.stats());
        status
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn name(&self) -> &str {
        "top-down"
    }
}
