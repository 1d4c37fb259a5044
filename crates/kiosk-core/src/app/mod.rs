//! App - アプリケーション層
//!
//! ports を組み合わせて kiosk 画面の振る舞いを実装します。
//!
//! # 主要コンポーネント
//! - **KioskShell**: 組み立てと mount / unmount
//! - **ConnectivityTracker**: 接続状態（platform シグナル + 手動トグル）
//! - **ScanForm**: スキャン入力 → scan イベント
//! - **TileGrid**: 操作タイル → status イベント
//! - **ReconciliationLoop**: online の間、delay ごとに先頭を 1 件処理
//! - **Status / KioskView**: ステータス文字列とキューのプレビュー

mod context;

pub mod connectivity;
pub mod reconciler;
pub mod scan_form;
pub mod shell;
pub mod status;
pub mod tiles;

// 主要な型を再エクスポート
pub use self::connectivity::{ConnectivityTracker, initial_online};
pub use self::reconciler::{LoopState, ReconciliationLoop, gate};
pub use self::scan_form::{SCAN_INPUT_LABEL, ScanForm};
pub use self::shell::{KioskShell, KioskShellBuilder};
pub use self::status::{KioskView, PreviewRow, StatusBoard, short_time};
pub use self::tiles::{Accent, ActionTile, PressCallback, TileGrid};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::context::KioskContext;
    use crate::config::KioskConfig;
    use crate::impls::{EnglishCatalog, InMemoryKioskQueue, InMemoryVisitLog, RecordingTelemetry};

    /// A context wired to inspectable in-memory ports, no tasks running.
    pub(crate) struct Fixture {
        pub(crate) ctx: Arc<KioskContext>,
        pub(crate) queue: Arc<InMemoryKioskQueue>,
        pub(crate) telemetry: Arc<RecordingTelemetry>,
        pub(crate) visits: Arc<InMemoryVisitLog>,
    }

    impl Fixture {
        pub(crate) fn new(online: bool) -> Self {
            let queue = Arc::new(InMemoryKioskQueue::new());
            let telemetry = Arc::new(RecordingTelemetry::new());
            let visits = Arc::new(InMemoryVisitLog::new());
            let ctx = Arc::new(KioskContext::new(
                KioskConfig::default(),
                queue.clone(),
                telemetry.clone(),
                Arc::new(EnglishCatalog),
                visits.clone(),
                online,
            ));
            Self {
                ctx,
                queue,
                telemetry,
                visits,
            }
        }
    }
}
