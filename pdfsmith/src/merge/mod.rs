//! Merging PDF and image sources into one document.
//!
//! - [`MergeQueue`] holds the ordered sources
//! - [`MergeEngine`] turns a queue into an output PDF
//! - [`geometry`] holds the page size and image fit rule

pub mod geometry;
pub mod merger;
pub mod queue;

pub use geometry::{PageGeometry, Placement, fit_image};
pub use merger::{MergeEngine, MergePlan, MergeReport, PlannedSource, SkippedSource};
pub use queue::{MergeQueue, SourceEntry, SourceKind};
