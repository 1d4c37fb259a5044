//! InMemoryVisitLog - 最近の記録を新しい順に保持

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::ports::VisitLog;

const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub path: String,
    pub label: String,
}

/// Most recent distinct visits, newest first, bounded.
#[derive(Debug)]
pub struct InMemoryVisitLog {
    capacity: usize,
    visits: Mutex<VecDeque<Visit>>,
}

impl InMemoryVisitLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            visits: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn recent(&self) -> Vec<Visit> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for InMemoryVisitLog {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitLog for InMemoryVisitLog {
    fn record(&self, path: &str, label: &str) {
        let mut visits = self.visits.lock().unwrap_or_else(PoisonError::into_inner);
        visits.retain(|v| !(v.path == path && v.label == label));
        visits.push_front(Visit {
            path: path.to_string(),
            label: label.to_string(),
        });
        visits.truncate(self.capacity);
    }
}
