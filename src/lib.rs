//! Wildscreen Toolkit
//!
//! Data pipeline behind the wildlife-on-screen dashboards: which animal
//! species appeared in which documentary episode, where, and with what IUCN
//! conservation status.
//!
//! The pipeline is a deterministic, single-pass, in-memory transform:
//! raw sheet rows -> `normalize` -> canonical appearance records ->
//! `aggregate` (per-species first/last/count and chart summaries) ->
//! `filter` (cascading multi-select narrowing) -> `present` (sorted,
//! deduplicated display rows). Every stage is a pure function over
//! immutable input; rendering is the host layer's concern.
//!
//! Binaries:
//! - `wos-csv`: runs the pipeline over CSV sheet snapshots and prints
//!   display tables and chart summaries.

pub mod aggregate;
pub mod country;
pub mod episodes;
pub mod filter;
pub mod normalize;
pub mod present;
pub mod sheet;
pub mod status;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export the types most callers touch
pub use aggregate::{SpeciesAggregate, StatusCount};
pub use filter::FilterSelection;
pub use normalize::Appearance;
pub use present::SortKey;
pub use status::IucnStatus;
