//! Set collections used by the enumerators
//!
//! - [`BloomSet`]: sorted exact set with an incrementally maintained signature
//! - [`MinimalFamily`]: antichain store answering subset/superset queries

pub mod bloom_set;
pub mod family;
pub mod signature;

pub use bloom_set::BloomSet;
pub use family::{FamilyStats, MinimalFamily};
pub use signature::{Element, Signature};
