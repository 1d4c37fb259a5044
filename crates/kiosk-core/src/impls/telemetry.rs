//! TelemetrySink 実装
//!
//! - **TracingTelemetry**: `kiosk::telemetry` target に info イベントとして出す
//! - **RecordingTelemetry**: 受け取ったレコードを溜めておく（テスト・デモ用）
//! - **NoopTelemetry**: 何もしない

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::ports::{TelemetryEvent, TelemetrySink};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn emit(&self, event: TelemetryEvent, attributes: Value) {
        tracing::info!(
            target: "kiosk::telemetry",
            event = event.as_str(),
            attributes = %attributes,
            "telemetry"
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn emit(&self, _event: TelemetryEvent, _attributes: Value) {}
}

/// One emitted telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub event: TelemetryEvent,
    pub attributes: Value,
}

impl TelemetryRecord {
    /// Attribute lookup by key (`Value::Null` when absent).
    pub fn attr(&self, key: &str) -> &Value {
        &self.attributes[key]
    }
}

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    records: Mutex<Vec<TelemetryRecord>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TelemetryRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.lock().clone()
    }

    /// Records of one event name, in emission order.
    pub fn of(&self, event: TelemetryEvent) -> Vec<TelemetryRecord> {
        self.lock()
            .iter()
            .filter(|r| r.event == event)
            .cloned()
            .collect()
    }

    pub fn count(&self, event: TelemetryEvent) -> usize {
        self.lock().iter().filter(|r| r.event == event).count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn emit(&self, event: TelemetryEvent, attributes: Value) {
        self.lock().push(TelemetryRecord { event, attributes });
    }
}
