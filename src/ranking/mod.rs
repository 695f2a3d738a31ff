//! Ranking module
//!
//! Orders a snapshot by a user-selected key and direction.

mod engine;
mod selection;

pub use engine::{compare_assets, rank_assets};
pub use selection::{SortKey, SortKeyError, SortOrder, SortSelection};
