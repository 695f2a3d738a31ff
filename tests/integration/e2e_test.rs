//! End-to-end screener tests over a synthetic 500-asset universe

use crate::common::{
    screener, RecordingSink, SyntheticProvider, BOUNDARY_RANK, NO_SERIES_RANK, PAGES, PER_PAGE,
};
use mover_watch::alert::CellClass;
use mover_watch::market::{Horizon, PageRequest};
use mover_watch::ranking::{SortKey, SortOrder, SortSelection};
use mover_watch::screener::CycleOutcome;
use mover_watch::snapshot::SnapshotMerger;
use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_full_universe_snapshot() {
    let provider = SyntheticProvider::new();
    let screener = screener(provider.clone(), Arc::new(RecordingSink::default()));

    let outcome = screener.run_cycle().await;

    assert!(outcome.is_updated());
    assert_eq!(provider.calls.load(Ordering::SeqCst), PAGES);

    let snapshot = screener.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), (PAGES * PER_PAGE) as usize);
    let ranks: Vec<u32> = snapshot.assets().iter().map(|a| a.rank).collect();
    assert_eq!(ranks, (1..=500).collect::<Vec<_>>());

    // Flat series at the current price
    let first = snapshot.by_rank(1).unwrap();
    assert_eq!(first.change.get(Horizon::M15), Some(dec!(0)));
    assert_eq!(first.change.get(Horizon::H4), Some(dec!(0)));

    let last = snapshot.by_rank(NO_SERIES_RANK).unwrap();
    assert_eq!(last.change.get(Horizon::M15), None);
    assert_eq!(last.change.get(Horizon::H4), None);
    assert_eq!(last.change.get(Horizon::H1), Some(dec!(0.1)));
}

#[tokio::test]
async fn test_threshold_boundary_is_flagged() {
    let screener = screener(SyntheticProvider::new(), Arc::new(RecordingSink::default()));
    screener.run_cycle().await;

    let view = screener.view().await;
    let boundary = view
        .rows
        .iter()
        .find(|r| r.asset.rank == BOUNDARY_RANK)
        .unwrap();

    assert_eq!(screener.settings().await.thresholds.get(Horizon::H24), dec!(15));
    assert_eq!(boundary.classes.get(Horizon::H24), CellClass::PositiveFlagged);

    // 24h is not a fast horizon: no alert
    assert!(!view.alert.unwrap().triggered);
    assert_eq!(view.flagged_rows().count(), 0);
}

#[tokio::test]
async fn test_unavailable_sorts_last_descending_first_ascending() {
    let screener = screener(SyntheticProvider::new(), Arc::new(RecordingSink::default()));
    screener.run_cycle().await;

    screener.select_sort(SortKey::Change(Horizon::M15)).await;
    let view = screener.view().await;
    assert_eq!(view.settings.sort.order, SortOrder::Descending);
    assert_eq!(view.rows.last().unwrap().asset.rank, NO_SERIES_RANK);
    // Ties fall back to rank ascending
    assert_eq!(view.rows[0].asset.rank, 1);
    assert_eq!(view.rows[1].asset.rank, 2);

    screener.select_sort(SortKey::Change(Horizon::M15)).await;
    let view = screener.view().await;
    assert_eq!(view.settings.sort.order, SortOrder::Ascending);
    assert_eq!(view.rows[0].asset.rank, NO_SERIES_RANK);
    assert_eq!(view.rows[1].asset.rank, 1);

    screener.select_sort(SortKey::Change(Horizon::H4)).await;
    let view = screener.view().await;
    assert_eq!(view.settings.sort.order, SortOrder::Descending);
    assert_eq!(view.rows.last().unwrap().asset.rank, NO_SERIES_RANK);
    assert_eq!(view.rows[0].asset.rank, 1);

    screener.select_sort(SortKey::Change(Horizon::H4)).await;
    let view = screener.view().await;
    assert_eq!(view.settings.sort.order, SortOrder::Ascending);
    assert_eq!(view.rows[0].asset.rank, NO_SERIES_RANK);
    assert_eq!(view.rows.last().unwrap().asset.rank, 499);
}

#[tokio::test]
async fn test_sort_by_market_cap() {
    let screener = screener(SyntheticProvider::new(), Arc::new(RecordingSink::default()));
    screener.run_cycle().await;

    screener
        .set_sort(SortSelection::new(SortKey::MarketCap, SortOrder::Ascending))
        .await;
    let view = screener.view().await;

    assert_eq!(view.rows[0].asset.rank, 500);
    assert_eq!(view.rows[499].asset.rank, 1);
}

#[tokio::test]
async fn test_page_failure_keeps_previous_snapshot() {
    let provider = SyntheticProvider::new();
    let screener = screener(provider.clone(), Arc::new(RecordingSink::default()));

    screener.run_cycle().await;
    let before = screener.snapshot().await.unwrap();
    let updated_at = screener.state().await.last_updated;

    provider.fail_page(2);
    let outcome = screener.run_cycle().await;

    match outcome {
        CycleOutcome::Failed { error } => assert!(error.contains("503")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    let state = screener.state().await;
    assert!(Arc::ptr_eq(state.snapshot.as_ref().unwrap(), &before));
    assert_eq!(state.last_updated, updated_at);
    assert!(state.error.is_some());

    // Previous rows still render alongside the error
    let view = screener.view().await;
    assert_eq!(view.rows.len(), 500);
    assert!(view.error.is_some());

    provider.heal();
    provider.set_mover(3, dec!(-5.5));
    assert!(screener.run_cycle().await.is_updated());

    let state = screener.state().await;
    assert!(state.error.is_none());
    let after = state.snapshot.unwrap();
    assert!(!Arc::ptr_eq(&after, &before));
    assert_eq!(after.by_rank(3).unwrap().change.get(Horizon::H1), Some(dec!(-5.5)));
}

#[tokio::test]
async fn test_short_page_reported_against_universe() {
    let provider = SyntheticProvider::new();
    provider.shorten_page(1);
    let screener = screener(provider, Arc::new(RecordingSink::default()));

    match screener.run_cycle().await {
        CycleOutcome::Updated { assets, merge, .. } => {
            assert_eq!(assets, 499);
            assert_eq!(merge.short_by, 1);
            assert!(merge.non_contiguous);
            assert!(!merge.is_clean());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_first_cycle_failure_leaves_no_snapshot() {
    let provider = SyntheticProvider::new();
    provider.fail_page(1);
    let screener = screener(provider, Arc::new(RecordingSink::default()));

    assert!(!screener.run_cycle().await.is_updated());

    let view = screener.view().await;
    assert!(view.rows.is_empty());
    assert!(view.last_updated.is_none());
    assert!(view.error.is_some());
}

#[tokio::test]
async fn test_one_alert_per_cycle_for_many_movers() {
    let provider = SyntheticProvider::new();
    let sink = Arc::new(RecordingSink::default());
    let screener = screener(provider.clone(), sink.clone());

    provider.set_mover(4, dec!(5));
    provider.set_mover(120, dec!(-9));
    provider.set_mover(410, dec!(12));

    match screener.run_cycle().await {
        CycleOutcome::Updated { alert, notified, .. } => {
            assert!(alert.triggered);
            assert_eq!(alert.flagged_assets, 3);
            assert_eq!(alert.flagged_cells, 3);
            assert!(notified);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink.fired.load(Ordering::SeqCst), 1);

    let view = screener.view().await;
    let flagged: Vec<u32> = view.flagged_rows().map(|r| r.asset.rank).collect();
    assert_eq!(flagged.len(), 3);
    let falling = view.rows.iter().find(|r| r.asset.rank == 120).unwrap();
    assert_eq!(falling.classes.get(Horizon::H1), CellClass::NegativeFlagged);
}

#[tokio::test]
async fn test_mute_suppresses_only_notification() {
    let provider = SyntheticProvider::new();
    let sink = Arc::new(RecordingSink::default());
    let screener = screener(provider.clone(), sink.clone());
    provider.set_mover(8, dec!(7));

    screener.set_muted(true).await;
    match screener.run_cycle().await {
        CycleOutcome::Updated { alert, notified, .. } => {
            assert!(alert.triggered);
            assert!(!notified);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink.fired.load(Ordering::SeqCst), 0);
    assert_eq!(screener.view().await.flagged_rows().count(), 1);

    screener.set_muted(false).await;
    screener.run_cycle().await;
    assert_eq!(sink.fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_threshold_change_applies_to_view_immediately() {
    let provider = SyntheticProvider::new();
    let screener = screener(provider.clone(), Arc::new(RecordingSink::default()));
    provider.set_mover(8, dec!(7));
    screener.run_cycle().await;
    assert_eq!(screener.view().await.flagged_rows().count(), 1);

    screener.set_threshold(Horizon::H1, dec!(10)).await.unwrap();

    assert_eq!(screener.view().await.flagged_rows().count(), 0);
}

#[test]
fn test_merge_invariant_under_page_order() {
    let provider = SyntheticProvider::default();
    let page = |page| {
        provider.page_rows(&PageRequest {
            page,
            per_page: PER_PAGE,
        })
    };
    let merger = SnapshotMerger::default();
    let now = chrono::Utc::now();

    let (forward, _) = merger.merge(vec![page(1), page(2)], now);
    let (reversed, report) = merger.merge(vec![page(2), page(1)], now);

    assert!(report.is_clean());
    assert_eq!(forward.assets(), reversed.assets());
}

#[test]
fn test_merge_overlapping_pages_keeps_first() {
    let provider = SyntheticProvider::default();
    let mut second = provider.page_rows(&PageRequest {
        page: 2,
        per_page: PER_PAGE,
    });
    // Rank drift between requests: page 2 repeats an id from page 1
    let mut repeat = provider.row(250);
    repeat.rank = Some(251);
    second[0] = repeat;

    let first = provider.page_rows(&PageRequest {
        page: 1,
        per_page: PER_PAGE,
    });
    let (snapshot, report) = SnapshotMerger::default().merge(vec![first, second], chrono::Utc::now());

    assert_eq!(report.duplicates, 1);
    assert!(report.non_contiguous);
    assert_eq!(snapshot.len(), 499);
    assert_eq!(snapshot.get("coin-250").unwrap().rank, 250);
}
