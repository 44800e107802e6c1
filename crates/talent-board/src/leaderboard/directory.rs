use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::leaderboard::domain::{Candidate, DataAvailability, DegradedReason};
use crate::leaderboard::parser::parse_tab;
use crate::leaderboard::sheets::{SheetsError, SheetsGateway};

/// The full candidate list produced by one fetch, plus how much to trust it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSnapshot {
    pub candidates: Vec<Candidate>,
    pub availability: DataAvailability,
    pub fetched_at: DateTime<Utc>,
}

impl CandidateSnapshot {
    fn degraded(reason: DegradedReason) -> Self {
        Self {
            candidates: Vec::new(),
            availability: DataAvailability::Degraded(reason),
            fetched_at: Utc::now(),
        }
    }
}

/// Time-bounded slot holding the last snapshot. Owned by the directory and
/// passed by reference, never a process-wide global. The tokio mutex is held
/// across the fetch so concurrent page renders within one window share a
/// single spreadsheet round-trip.
#[derive(Debug)]
pub struct BoardCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    stored_at: Instant,
    snapshot: CandidateSnapshot,
}

impl BoardCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }
}

/// Fetches and caches the combined candidate list across every spreadsheet
/// tab. All failure handling is fail-soft: callers always get a snapshot,
/// degraded ones carry the reason.
pub struct CandidateDirectory {
    gateway: Option<Box<dyn SheetsGateway>>,
    cache: BoardCache,
}

impl std::fmt::Debug for CandidateDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateDirectory")
            .field("configured", &self.gateway.is_some())
            .finish_non_exhaustive()
    }
}

impl CandidateDirectory {
    pub fn new(gateway: Option<Box<dyn SheetsGateway>>, cache: BoardCache) -> Self {
        Self { gateway, cache }
    }

    /// Returns the cached snapshot when it is younger than the revalidation
    /// window, otherwise refetches and stores the result.
    pub async fn snapshot(&self) -> CandidateSnapshot {
        let mut slot = self.cache.slot.lock().await;
        if let Some(entry) = slot.as_ref() {
            if entry.stored_at.elapsed() < self.cache.ttl {
                return entry.snapshot.clone();
            }
        }

        let snapshot = self.fetch_all().await;
        *slot = Some(CacheEntry {
            stored_at: Instant::now(),
            snapshot: snapshot.clone(),
        });
        snapshot
    }

    async fn fetch_all(&self) -> CandidateSnapshot {
        let Some(gateway) = self.gateway.as_deref() else {
            warn!("spreadsheet credentials not configured; serving an empty board");
            return CandidateSnapshot::degraded(DegradedReason::MissingCredentials);
        };

        let mut tabs = match gateway.list_tabs().await {
            Ok(tabs) => tabs,
            Err(err) => return degraded_from_error(err),
        };
        tabs.sort_by_key(|tab| tab.index);

        let mut candidates = Vec::new();
        for tab in &tabs {
            match gateway.read_rows(tab).await {
                Ok(rows) => candidates.extend(parse_tab(&rows)),
                // One unreadable tab never aborts the fetch.
                Err(err) => warn!(tab = %tab.title, %err, "skipping unreadable tab"),
            }
        }

        CandidateSnapshot {
            candidates,
            availability: DataAvailability::Available,
            fetched_at: Utc::now(),
        }
    }
}

fn degraded_from_error(err: SheetsError) -> CandidateSnapshot {
    let reason = match &err {
        SheetsError::Throttled(_) => DegradedReason::Throttled,
        SheetsError::PermissionDenied(_) => DegradedReason::PermissionDenied,
        SheetsError::Backend(_) => DegradedReason::Unreachable,
    };
    error!(%err, reason = reason.label(), "spreadsheet fetch failed; serving an empty board");
    CandidateSnapshot::degraded(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::sheets::SheetTab;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct CountingGateway {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SheetsGateway for CountingGateway {
        async fn list_tabs(&self) -> Result<Vec<SheetTab>, SheetsError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SheetTab {
                index: 0,
                title: "Pipeline".to_string(),
            }])
        }

        async fn read_rows(&self, _tab: &SheetTab) -> Result<Vec<Vec<String>>, SheetsError> {
            Ok(vec![
                vec!["Nome".to_string(), "Nota".to_string()],
                vec!["Ana".to_string(), "70".to_string()],
            ])
        }
    }

    #[tokio::test]
    async fn snapshot_is_reused_within_the_revalidation_window() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let gateway = Box::new(CountingGateway {
            fetches: fetches.clone(),
        });
        let directory =
            CandidateDirectory::new(Some(gateway), BoardCache::new(Duration::from_secs(60)));

        let first = directory.snapshot().await;
        let second = directory.snapshot().await;

        assert_eq!(first, second);
        assert_eq!(first.candidates.len(), 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_snapshot_triggers_a_refetch() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let gateway = Box::new(CountingGateway {
            fetches: fetches.clone(),
        });
        let directory = CandidateDirectory::new(Some(gateway), BoardCache::new(Duration::ZERO));

        directory.snapshot().await;
        directory.snapshot().await;

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_gateway_serves_degraded_empty_snapshot() {
        let directory = CandidateDirectory::new(None, BoardCache::new(Duration::from_secs(60)));
        let snapshot = directory.snapshot().await;

        assert!(snapshot.candidates.is_empty());
        assert_eq!(
            snapshot.availability,
            DataAvailability::Degraded(DegradedReason::MissingCredentials)
        );
    }
}
