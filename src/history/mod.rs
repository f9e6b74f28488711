//! Calculation history: the persistence collaborator boundary and the
//! fire-and-forget recording path.
//!
//! The session never talks to a store directly. It drops records into a
//! [`HistoryRecorder`] channel and moves on; a drain task owns the actual
//! store. A recording failure is a log line, never a user-facing error.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One persisted calculation. Created only for successful evaluations under
/// an authenticated session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub expression: String,
    pub result: String,
    pub timestamp_ms: u64,
}

impl HistoryRecord {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp_ms: now_ms(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append-only per-user history store.
pub trait HistoryStore: Send + Sync {
    /// Append a record. Append-only; ordering is newest first on read.
    fn record(&self, user_id: &str, record: HistoryRecord);
    /// Bulk delete everything for a user.
    fn clear(&self, user_id: &str);
    /// Current records, newest first.
    fn snapshot(&self, user_id: &str) -> Vec<HistoryRecord>;
    /// Live feed of new records for a user. Restartable: subscribing again
    /// after a disconnect just creates a fresh receiver.
    fn subscribe(&self, user_id: &str) -> flume::Receiver<HistoryRecord>;
}

/// In-process store used by the CLI and tests.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<HashMap<String, Vec<HistoryRecord>>>,
    watchers: Mutex<Vec<(String, flume::Sender<HistoryRecord>)>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn record(&self, user_id: &str, record: HistoryRecord) {
        if let Ok(mut records) = self.records.lock() {
            records
                .entry(user_id.to_string())
                .or_default()
                .insert(0, record.clone());
        }
        if let Ok(mut watchers) = self.watchers.lock() {
            watchers.retain(|(user, tx)| user != user_id || tx.send(record.clone()).is_ok());
        }
    }

    fn clear(&self, user_id: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.remove(user_id);
        }
    }

    fn snapshot(&self, user_id: &str) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .map(|records| records.get(user_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn subscribe(&self, user_id: &str) -> flume::Receiver<HistoryRecord> {
        let (tx, rx) = flume::unbounded();
        if let Ok(mut watchers) = self.watchers.lock() {
            watchers.push((user_id.to_string(), tx));
        }
        rx
    }
}

/// The session-facing half of the recording path.
#[derive(Clone)]
pub struct HistoryRecorder {
    tx: flume::Sender<(String, HistoryRecord)>,
}

impl HistoryRecorder {
    /// Create the recorder and the receiver a drain task consumes.
    pub fn channel() -> (Self, flume::Receiver<(String, HistoryRecord)>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }

    /// Fire-and-forget: a closed channel only logs.
    pub fn record(&self, user_id: &str, expression: &str, result: &str) {
        let record = HistoryRecord::new(expression, result);
        if self.tx.try_send((user_id.to_string(), record)).is_err() {
            debug!("history channel closed; dropping record");
        }
    }
}

/// Drain recorded calculations into a store until the channel closes.
pub async fn run_recorder<S: HistoryStore>(
    store: std::sync::Arc<S>,
    rx: flume::Receiver<(String, HistoryRecord)>,
) {
    while let Ok((user_id, record)) = rx.recv_async().await {
        store.record(&user_id, record);
    }
}
