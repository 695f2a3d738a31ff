//! Snapshot module
//!
//! Turns one cycle's worth of provider pages into an immutable, rank-ordered
//! `Snapshot`.

mod fetcher;
mod merger;

pub use fetcher::{FetchPlan, FetchedPages, SnapshotFetcher};
pub use merger::{MergeReport, SnapshotMerger};
