//! Enumeration of minimal axiom sets over a proof
//!
//! Four enumerators share the [`MinimalSubsetEnumerator`] interface:
//!
//! - [`BottomUp`]: propagates justification families from axioms toward the goal
//! - [`TopDown`]: expands open conclusions of the goal in priority order
//! - [`Resolution`]: combines inferences by resolution under a [`Selection`] function
//! - [`RepairEnumerator`]: searches minimal axiom removals breaking every proof
//!
//! All of them work on the id-based [`ProofGraph`] and emit [`BloomSet`]s of
//! axiom ids. [`Enumeration`] is the front end: it indexes a proof for a goal,
//! runs the configured enumerator and passes results to a listener as slices
//! of axioms.

pub mod bottom_up;
pub mod profile;
pub mod repair;
pub mod resolution;
pub mod top_down;

pub use bottom_up::BottomUp;
pub use profile::{EnumerationProfile, SearchStats};
pub use repair::RepairEnumerator;
pub use resolution::{
    create_selection, BottomUpSelection, Resolution, Selection, ThresholdSelection,
    TopDownSelection,
};
pub use top_down::TopDown;

use crate::collections::{BloomSet, Element};
use crate::config::{EnumerationConfig, EnumerationStrategy};
use crate::error::Result;
use crate::proof::{
    AxiomId, ConclusionId, InferenceId, InferenceJustifier, Proof, ProofGraph, ProofIndex,
};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

// =============================================================================
// Job members
// =============================================================================

/// An element of a job key: jobs are compared by the set of their members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobMember {
    Conclusion(ConclusionId),
    Premise(ConclusionId),
    Axiom(AxiomId),
    Inference(InferenceId),
}

impl Element for JobMember {
    fn code(&self) -> u32 {
        match self {
            JobMember::Conclusion(c) => c.0.wrapping_mul(4),
            JobMember::Premise(c) => c.0.wrapping_mul(4) + 1,
            JobMember::Axiom(a) => a.0.wrapping_mul(4) + 2,
            JobMember::Inference(i) => i.0.wrapping_mul(4) + 3,
        }
    }
}

// =============================================================================
// Interrupt monitors
// =============================================================================

/// Polled once per dequeued job; a positive answer ends the run.
pub trait InterruptMonitor {
    fn is_interrupted(&self) -> bool;
}

/// A monitor that never interrupts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupted;

impl InterruptMonitor for NeverInterrupted {
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// Shared cancellation flag; clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl InterruptMonitor for CancellationToken {
    fn is_interrupted(&self) -> bool {
        self.is_cancelled()
    }
}

impl<F: Fn() -> bool> InterruptMonitor for F {
    fn is_interrupted(&self) -> bool {
        self()
    }
}

// =============================================================================
// Listeners
// =============================================================================

/// Receives justifications in discovery order.
pub trait JustificationListener<A> {
    fn on_justification(&mut self, axioms: &[A]);
}

/// Receives repairs (minimal axiom removals) in discovery order.
pub trait RepairListener<A> {
    fn on_repair(&mut self, axioms: &[A]);
}

impl<A, F: FnMut(&[A])> JustificationListener<A> for F {
    fn on_justification(&mut self, axioms: &[A]) {
        self(axioms)
    }
}

impl<A, F: FnMut(&[A])> RepairListener<A> for F {
    fn on_repair(&mut self, axioms: &[A]) {
        self(axioms)
    }
}

impl<A: Clone> JustificationListener<A> for Vec<Vec<A>> {
    fn on_justification(&mut self, axioms: &[A]) {
        self.push(axioms.to_vec());
    }
}

impl<A: Clone> RepairListener<A> for Vec<Vec<A>> {
    fn on_repair(&mut self, axioms: &[A]) {
        self.push(axioms.to_vec());
    }
}

// =============================================================================
// Discovery order
// =============================================================================

/// Assigns each axiom a weight; axiom sets are discovered by ascending total weight.
///
/// Weights below 1 are raised to 1, so every proper subset of a set is
/// discovered before the set itself.
pub trait DiscoveryOrder<A> {
    fn weight(&self, axiom: &A) -> u32;
}

/// Every axiom weighs 1: sets are discovered by ascending cardinality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cardinality;

impl<A> DiscoveryOrder<A> for Cardinality {
    fn weight(&self, _axiom: &A) -> u32 {
        1
    }
}

impl<A, F: Fn(&A) -> u32> DiscoveryOrder<A> for F {
    fn weight(&self, axiom: &A) -> u32 {
        self(axiom)
    }
}

/// Axiom weights indexed by [`AxiomId`].
#[derive(Debug, Clone)]
pub struct AxiomWeights {
    weights: Vec<u64>,
}

impl AxiomWeights {
    pub fn new(weights: impl IntoIterator<Item = u32>) -> Self {
        AxiomWeights {
            weights: weights.into_iter().map(|w| u64::from(w.max(1))).collect(),
        }
    }

    /// Every axiom weighs 1.
    pub fn uniform(axiom_count: usize) -> Self {
        AxiomWeights {
            weights: vec![1; axiom_count],
        }
    }

    /// Total weight of a set of axioms.
    pub fn of(&self, axioms: &BloomSet<AxiomId>) -> u64 {
        axioms.iter().map(|a| self.weights.get(a.index()).copied().unwrap_or(1)).sum()
    }
}

// =============================================================================
// Enumerator interface
// =============================================================================

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationStatus {
    /// The search space was exhausted; every result has been emitted
    Complete,
    /// The monitor interrupted the run; the results emitted so far stand
    Interrupted,
}

/// Everything an enumerator reads during a run.
pub struct SearchContext<'a> {
    pub graph: &'a ProofGraph,
    pub weights: &'a AxiomWeights,
    pub monitor: &'a dyn InterruptMonitor,
}

impl<'a> SearchContext<'a> {
    pub fn new(graph: &'a ProofGraph, weights: &'a AxiomWeights, monitor: &'a dyn InterruptMonitor) -> Self {
        SearchContext {
            graph,
            weights,
            monitor,
        }
    }
}

/// A search for minimal axiom sets of the goal of a [`ProofGraph`].
///
/// Instances hold the state of one run; create a fresh instance per run.
pub trait MinimalSubsetEnumerator {
    /// Run the search, passing every result to `emit` as soon as it is final.
    fn enumerate(
        &mut self,
        context: &SearchContext<'_>,
        emit: &mut dyn FnMut(&BloomSet<AxiomId>),
    ) -> EnumerationStatus;

    fn stats(&self) -> &SearchStats;

    /// Get the name of this enumerator
    fn name(&self) -> &str;
}

/// Create a fresh justification enumerator for the strategy.
pub fn create_enumerator(strategy: &EnumerationStrategy) -> Box<dyn MinimalSubsetEnumerator> {
    match strategy {
        EnumerationStrategy::BottomUp => Box::new(BottomUp::new()),
        EnumerationStrategy::TopDown => Box::new(TopDown::new()),
        EnumerationStrategy::Resolution(selection) => {
            Box::new(Resolution::new(create_selection(*selection)))
        }
    }
}

// =============================================================================
// Job queue
// =============================================================================

/// Min-priority queue of job positions keyed by `(weight, tie)`.
///
/// Equal keys come out in insertion order.
#[derive(Debug, Default)]
pub(crate) struct JobQueue {
    heap: BinaryHeap<Reverse<(u64, usize, u64, usize)>>,
    sequence: u64,
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, weight: u64, tie: usize, job: usize) {
        self.heap.push(Reverse((weight, tie, self.sequence, job)));
        self.sequence += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse((_, _, _, job))| job)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

// =============================================================================
// Front end
// =============================================================================

/// Result summary of one enumeration call.
#[derive(Debug, Clone)]
pub struct EnumerationReport {
    pub status: EnumerationStatus,
    /// Number of results passed to the listener
    pub emitted: usize,
    /// Present when profiling is enabled in the configuration
    pub profile: Option<EnumerationProfile>,
}

impl EnumerationReport {
    pub fn is_complete(&self) -> bool {
        self.status == EnumerationStatus::Complete
    }
}

/// Computes justifications or repairs of goals of one proof.
///
/// Every call indexes the proof afresh and runs a fresh enumerator, so calls
/// are independent of each other.
pub struct Enumeration<'a, C, A> {
    proof: &'a dyn Proof<C>,
    justifier: &'a dyn InferenceJustifier<C, A>,
    config: EnumerationConfig,
    monitor: &'a dyn InterruptMonitor,
    order: &'a dyn DiscoveryOrder<A>,
}

impl<'a, C, A> Enumeration<'a, C, A>
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    /// Fails if the configuration is invalid.
    pub fn new<P, J>(proof: &'a P, justifier: &'a J, config: &EnumerationConfig) -> Result<Self>
    where
        P: Proof<C>,
        J: InferenceJustifier<C, A>,
    {
        config.validate()?;
        Ok(Enumeration {
            proof,
            justifier,
            config: config.clone(),
            monitor: &NeverInterrupted,
            order: &Cardinality,
        })
    }

    pub fn with_monitor(mut self, monitor: &'a dyn InterruptMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_order(mut self, order: &'a dyn DiscoveryOrder<A>) -> Self {
        self.order = order;
        self
    }

    /// Enumerate the justifications of `goal` with the configured strategy.
    pub fn justifications<L>(&self, goal: &C, listener: &mut L) -> EnumerationReport
    where
        L: JustificationListener<A> + ?Sized,
    {
        let enumerator = create_enumerator(&self.config.strategy);
        self.run(goal, enumerator, &mut |axioms: &[A]| listener.on_justification(axioms))
    }

    /// Enumerate the repairs of `goal`: minimal axiom sets whose removal
    /// makes the goal underivable.
    pub fn repairs<L>(&self, goal: &C, listener: &mut L) -> EnumerationReport
    where
        L: RepairListener<A> + ?Sized,
    {
        self.run(goal, Box::new(RepairEnumerator::new()), &mut |axioms: &[A]| listener.on_repair(axioms))
    }

    fn run(
        &self,
        goal: &C,
        mut enumerator: Box<dyn MinimalSubsetEnumerator>,
        listener: &mut dyn FnMut(&[A]),
    ) -> EnumerationReport {
        let start = Instant::now();
        let index = ProofIndex::build(self.proof, self.justifier, goal);
        let index_time = start.elapsed();
        let graph = index.graph();
        debug!(
            algorithm = enumerator.name(),
            conclusions = graph.conclusion_count(),
            inferences = graph.inference_count(),
            axioms = graph.axiom_count(),
            "indexed proof"
        );

        let weights = AxiomWeights::new(index.axioms().map(|axiom| self.order.weight(axiom)));
        let context = SearchContext::new(graph, &weights, self.monitor);
        let mut emitted = 0;
        let search_start = Instant::now();
        let status = enumerator.enumerate(&context, &mut |set| {
            emitted += 1;
            listener(&index.axioms_of(set));
        });
        let search_time = search_start.elapsed();

        let stats = enumerator.stats();
        debug!(
            algorithm = enumerator.name(),
            ?status,
            emitted,
            produced = stats.jobs_produced,
            processed = stats.jobs_processed,
            pruned = stats.jobs_pruned,
            "enumeration finished"
        );

        let profile = if self.config.enable_profiling {
            Some(EnumerationProfile {
                algorithm: enumerator.name().to_string(),
                total_time: start.elapsed(),
                index_time,
                search_time,
                conclusions: graph.conclusion_count(),
                inferences: graph.inference_count(),
                axioms: graph.axiom_count(),
                search: stats.clone(),
            })
        } else {
            None
        };
        EnumerationReport {
            status,
            emitted,
            profile,
        }
    }
}

/// Index `proof` for `goal` and run the enumerator on it with default weights.
pub fn enumerate_ids<C, A, P, J>(
    proof: &P,
    justifier: &J,
    goal: &C,
    enumerator: &mut dyn MinimalSubsetEnumerator,
) -> (ProofIndex<C, A>, Vec<BloomSet<AxiomId>>)
where
    C: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
    P: Proof<C> + ?Sized,
    J: InferenceJustifier<C, A> + ?Sized,
{
    let index = ProofIndex::build(proof, justifier, goal);
    let weights = AxiomWeights::uniform(index.graph().axiom_count());
    let context = SearchContext::new(index.graph(), &weights, &NeverInterrupted);
    let mut results = Vec::new();
    enumerator.enumerate(&context, &mut |set| results.push(set.clone()));
    (index, results)
}
