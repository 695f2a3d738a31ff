//! Refresh scheduler against the synthetic universe

use crate::common::{screener, RecordingSink, SyntheticProvider};
use mover_watch::scheduler::RefreshScheduler;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const INTERVAL: Duration = Duration::from_secs(60);

#[tokio::test(start_paused = true)]
async fn test_refresh_runs_on_interval() {
    let provider = SyntheticProvider::new();
    let screener = screener(provider.clone(), Arc::new(RecordingSink::default()));
    let mut handle = RefreshScheduler::new(screener.clone(), INTERVAL).start();

    assert!(handle.next_outcome().await.unwrap().is_updated());
    assert_eq!(screener.snapshot().await.unwrap().len(), 500);

    tokio::time::sleep(Duration::from_secs(185)).await;
    assert_eq!(screener.state().await.cycles, 4);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failures_retry_on_next_tick() {
    let provider = SyntheticProvider::new();
    provider.fail_page(2);
    let screener = screener(provider.clone(), Arc::new(RecordingSink::default()));
    let mut handle = RefreshScheduler::new(screener.clone(), INTERVAL).start();

    assert!(!handle.next_outcome().await.unwrap().is_updated());
    assert!(screener.snapshot().await.is_none());

    provider.heal();
    assert!(handle.next_outcome().await.unwrap().is_updated());
    assert!(screener.state().await.error.is_none());

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_mutation_after_stop() {
    let provider = SyntheticProvider::new();
    let screener = screener(provider.clone(), Arc::new(RecordingSink::default()));
    let mut handle = RefreshScheduler::new(screener.clone(), INTERVAL).start();
    handle.next_outcome().await.unwrap();
    let before = screener.snapshot().await.unwrap();

    // Next cycle is still waiting on its pages when the stop arrives
    provider.set_delay(Duration::from_secs(8));
    tokio::time::sleep(Duration::from_secs(62)).await;
    assert!(screener.is_loading());

    handle.stop().await;
    let calls = provider.calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(300)).await;

    let state = screener.state().await;
    assert!(Arc::ptr_eq(&state.snapshot.unwrap(), &before));
    assert_eq!(state.cycles, 1);
    assert!(!screener.is_loading());
    assert_eq!(provider.calls.load(Ordering::SeqCst), calls);
}
