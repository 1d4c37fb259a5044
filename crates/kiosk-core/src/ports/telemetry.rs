//! TelemetrySink port - 運用テレメトリの出力先
//!
//! 形は `emit(event_name, attributes)` で固定です。イベント名と属性キーは
//! ダッシュボードやテストが文字列で照合するので、変えないこと。
//!
//! # 実装
//! - **TracingTelemetry**: tracing へ流す（本番用）
//! - **RecordingTelemetry**: 記録して後から検査（テスト用）
//! - **NoopTelemetry**: 何もしない

use serde_json::Value;
use std::fmt;

/// Event names understood by the telemetry backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryEvent {
    KioskScan,
    KioskNetworkChange,
    KioskEventProcessed,
    TileClick,
}

impl TelemetryEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            TelemetryEvent::KioskScan => "kiosk_scan",
            TelemetryEvent::KioskNetworkChange => "kiosk_network_change",
            TelemetryEvent::KioskEventProcessed => "kiosk_event_processed",
            TelemetryEvent::TileClick => "tile_click",
        }
    }
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TelemetrySink は telemetry レコードを受け取る
///
/// 呼び出しは同期で、戻り値なし。送信失敗を呼び出し側に返さないこと
/// （キューの保証がテレメトリの成否に左右されてはいけない）。
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: TelemetryEvent, attributes: Value);
}
