//! # Run Store
//!
//! Finished pipeline runs, kept in memory under a random id so the results
//! page and every download read the same data. Runs are never modified after
//! insertion; the oldest is dropped once the store is full.

use boardscribe::EnrichmentReport;
use chrono::{DateTime, Local};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// One completed enrichment of a board.
#[derive(Debug, Clone)]
pub struct BoardRun {
    pub id: Uuid,
    /// What the user pasted, URL or bare id.
    pub input: String,
    pub created_at: DateTime<Local>,
    pub report: EnrichmentReport,
}

impl BoardRun {
    pub fn new(input: impl Into<String>, report: EnrichmentReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            input: input.into(),
            created_at: Local::now(),
            report,
        }
    }

    pub fn board_id(&self) -> &str {
        &self.report.board_id
    }
}

#[derive(Default)]
struct Inner {
    runs: HashMap<Uuid, Arc<BoardRun>>,
    order: VecDeque<Uuid>,
}

pub struct RunStore {
    inner: RwLock<Inner>,
    capacity: usize,
}

impl RunStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Stores a run and returns the shared handle to it.
    pub fn insert(&self, run: BoardRun) -> Arc<BoardRun> {
        let run = Arc::new(run);
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.order.push_back(run.id);
        inner.runs.insert(run.id, Arc::clone(&run));
        while inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.runs.remove(&evicted);
                debug!(run_id = %evicted, "Evicted oldest run");
            }
        }
        run
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<BoardRun>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.runs.get(id).cloned()
    }

    /// Up to `limit` runs, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Arc<BoardRun>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| inner.runs.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .runs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
