//! Pinpoint: enumeration of justifications and repairs over proofs
//!
//! A proof is an AND/OR graph: an inference derives its conclusion from all of
//! its premises and support axioms, and a conclusion is derived by any of its
//! inferences. A justification of a goal is a minimal set of axioms from which
//! the goal is still derivable; a repair is a minimal set of axioms whose
//! removal makes the goal underivable. This library enumerates both with
//! several search strategies built on minimal-family collections.

pub mod collections;
pub mod collector;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod json;
pub mod proof;
pub mod scc;

// Re-export proof types
pub use proof::{
    is_derivable, AxiomId, ConclusionId, CycleRemovingProof, Inference, InferenceJustifier,
    InferenceSet, Proof, ProofIndex, ProofInfo, TautologyRemovingProof,
};

// Re-export collection types
pub use collections::{BloomSet, MinimalFamily};

// Re-export enumeration types
pub use enumerate::{
    CancellationToken, Cardinality, DiscoveryOrder, Enumeration, EnumerationProfile,
    EnumerationReport, EnumerationStatus, InterruptMonitor, JustificationListener,
    MinimalSubsetEnumerator, NeverInterrupted, RepairListener,
};

pub use collector::{collect_justifications, collect_repairs};
pub use config::{EnumerationConfig, EnumerationStrategy, SelectionStrategy};
pub use error::{PinpointError, Result};
pub use json::{load_proof, ProofJson};
pub use scc::{has_cycle, StronglyConnectedComponents};
