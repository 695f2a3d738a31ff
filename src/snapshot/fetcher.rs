//! Paginated snapshot fetcher
//!
//! Issues every page request of a cycle together and waits for all of them.
//! One failed or timed-out page fails the whole fetch.

use crate::market::{FetchError, MarketDataProvider, MarketRow, PageRequest};
use crate::telemetry::{increment_counter, record_latency, CounterMetric, LatencyMetric};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which pages to request and how long each may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Number of pages, starting at page 1
    pub pages: u32,
    /// Rows per page
    pub per_page: u32,
    /// Bound on each page request
    pub timeout: Duration,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self {
            pages: 2,
            per_page: 250,
            timeout: Duration::from_secs(10),
        }
    }
}

impl FetchPlan {
    /// Number of ranks the plan covers
    pub fn universe_size(&self) -> usize {
        self.pages as usize * self.per_page as usize
    }

    fn requests(&self) -> impl Iterator<Item = PageRequest> + '_ {
        (1..=self.pages).map(|page| PageRequest {
            page,
            per_page: self.per_page,
        })
    }
}

/// All pages of one cycle, in page order
#[derive(Debug, Clone)]
pub struct FetchedPages {
    pub pages: Vec<Vec<MarketRow>>,
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPages {
    /// Total rows across pages
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

/// Fetches a complete set of pages from a provider
pub struct SnapshotFetcher<P: MarketDataProvider> {
    provider: Arc<P>,
    plan: FetchPlan,
}

impl<P: MarketDataProvider> SnapshotFetcher<P> {
    /// Create a fetcher for the given provider and plan
    pub fn new(provider: Arc<P>, plan: FetchPlan) -> Self {
        Self { provider, plan }
    }

    pub fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    /// Fetch every page concurrently
    pub async fn fetch(&self) -> Result<FetchedPages, FetchError> {
        let started = Instant::now();

        let result = try_join_all(self.plan.requests().map(|request| self.fetch_one(request))).await;
        record_latency(LatencyMetric::Fetch, started.elapsed());

        let pages = match result {
            Ok(pages) => pages,
            Err(e) => {
                increment_counter(CounterMetric::FetchFailures, 1);
                return Err(e);
            }
        };

        let fetched = FetchedPages {
            pages,
            fetched_at: Utc::now(),
        };

        tracing::debug!(
            pages = self.plan.pages,
            rows = fetched.row_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched all pages"
        );

        Ok(fetched)
    }

    /// Fetch one page under the configured timeout
    async fn fetch_one(&self, request: PageRequest) -> Result<Vec<MarketRow>, FetchError> {
        match tokio::time::timeout(self.plan.timeout, self.provider.fetch_page(&request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                page: request.page,
                after: self.plan.timeout,
            }),
        }
    }
}
