//! kiosk-core
//!
//! Offline-aware event queue for the shop-floor kiosk screen.
//!
//! オペレーターの操作（スキャン・タイル押下）は即座にローカルキューへ積まれ、
//! online の間だけ一定間隔で 1 件ずつ処理されます。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, event, connectivity, errors）
//! - **ports**: 抽象化レイヤー（KioskQueueStore, TelemetrySink, NetworkPlatform, Translator, など）
//! - **app**: アプリケーションロジック（shell, connectivity, scan_form, tiles, reconciler, status）
//! - **impls**: 実装（InMemoryKioskQueue, TracingTelemetry, SimulatedNetwork, など）
//! - **config**: 設定（既定値 + `KIOSK_*` 環境変数 + JSON）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{KioskShell, KioskShellBuilder, KioskView};
pub use config::KioskConfig;
pub use domain::{KioskError, KioskQueueItem, NewKioskEvent};
