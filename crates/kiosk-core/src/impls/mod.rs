//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryKioskQueue**: プロセス内のイベントキュー（永続化なし）
//! - **TracingTelemetry / RecordingTelemetry / NoopTelemetry**: テレメトリの出力先
//! - **SimulatedNetwork**: 手動操作できる接続状態シグナル
//! - **EnglishCatalog**: デフォルトの表示文字列
//! - **InMemoryVisitLog**: 最近の記録

pub mod catalog;
pub mod inmem_queue;
pub mod network;
pub mod telemetry;
pub mod visit_log;

// 主要な型を再エクスポート
pub use self::catalog::EnglishCatalog;
pub use self::inmem_queue::InMemoryKioskQueue;
pub use self::network::SimulatedNetwork;
pub use self::telemetry::{NoopTelemetry, RecordingTelemetry, TelemetryRecord, TracingTelemetry};
pub use self::visit_log::{InMemoryVisitLog, Visit};
