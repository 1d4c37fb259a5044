//! Ports - 抽象化レイヤー
//!
//! kiosk が外部（ブラウザ相当のプラットフォーム、テレメトリ基盤、翻訳、
//! グローバルストア）に触れる箇所をすべて trait にしています。
//!
//! # 設計原則
//! - キューと接続状態だけが共有可変状態。変更は定義された操作経由のみ
//! - どのポートも同期呼び出し。kiosk のコアはネットワーク I/O を await しない

pub mod clock;
pub mod id_generator;
pub mod network;
pub mod queue_store;
pub mod telemetry;
pub mod translator;
pub mod visit_log;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::network::{NetworkPlatform, NetworkSignal};
pub use self::queue_store::KioskQueueStore;
pub use self::telemetry::{TelemetryEvent, TelemetrySink};
pub use self::translator::{MessageKey, Translator};
pub use self::visit_log::VisitLog;
