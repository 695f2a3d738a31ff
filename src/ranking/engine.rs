//! Ordering a snapshot by the active selection

use super::{SortOrder, SortSelection};
use crate::market::{Asset, Snapshot};
use std::cmp::Ordering;

/// Total order between two assets under `selection`
///
/// Unavailable values compare below every real value before the direction is
/// applied, so they lead an ascending sort and trail a descending one. Ties
/// fall back to ascending rank regardless of direction.
pub fn compare_assets(a: &Asset, b: &Asset, selection: &SortSelection) -> Ordering {
    let by_key = selection.key.value(a).cmp(&selection.key.value(b));
    let directed = match selection.order {
        SortOrder::Ascending => by_key,
        SortOrder::Descending => by_key.reverse(),
    };
    directed.then_with(|| a.rank.cmp(&b.rank))
}

/// View order of a snapshot; the snapshot itself is left untouched
pub fn rank_assets<'a>(snapshot: &'a Snapshot, selection: &SortSelection) -> Vec<&'a Asset> {
    let mut view: Vec<&Asset> = snapshot.assets().iter().collect();
    view.sort_by(|a, b| compare_assets(a, b, selection));
    view
}
