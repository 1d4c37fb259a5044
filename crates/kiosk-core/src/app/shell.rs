//! KioskShell - kiosk 画面全体の組み立て
//!
//! # 学習ポイント
//! - Builder パターンでポートを差し替え可能にする
//! - mount 時検証（Fail-fast 設計）: 設定とタイルの検証は task を spawn する前に行う
//! - unmount は冪等。drop されただけでも task は止まる

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::connectivity::{ConnectivityTracker, initial_online};
use super::context::KioskContext;
use super::reconciler::{LoopState, ReconciliationLoop};
use super::scan_form::ScanForm;
use super::status::KioskView;
use super::tiles::{ActionTile, TileGrid};
use crate::config::KioskConfig;
use crate::domain::{KioskError, KioskQueueItem};
use crate::impls::{EnglishCatalog, InMemoryKioskQueue, InMemoryVisitLog, TracingTelemetry};
use crate::ports::{KioskQueueStore, NetworkPlatform, TelemetrySink, Translator, VisitLog};

/// KioskShellBuilder は kiosk シェルを構築
///
/// # 使用例
/// ```ignore
/// let shell = KioskShellBuilder::new(KioskConfig::default())
///     .platform(Arc::new(SimulatedNetwork::online()))
///     .telemetry(Arc::new(TracingTelemetry))
///     .mount()?;
/// ```
///
/// 指定しなかったポートは既定の実装（InMemoryKioskQueue, TracingTelemetry,
/// EnglishCatalog, InMemoryVisitLog）になります。platform を渡さなければ
/// 常に online として起動し、シグナルは購読しません。
pub struct KioskShellBuilder {
    config: KioskConfig,
    store: Option<Arc<dyn KioskQueueStore>>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    translator: Option<Arc<dyn Translator>>,
    visits: Option<Arc<dyn VisitLog>>,
    platform: Option<Arc<dyn NetworkPlatform>>,
    tiles: Vec<ActionTile>,
}

impl KioskShellBuilder {
    pub fn new(config: KioskConfig) -> Self {
        Self {
            config,
            store: None,
            telemetry: None,
            translator: None,
            visits: None,
            platform: None,
            tiles: ActionTile::default_grid(),
        }
    }

    pub fn store(mut self, store: Arc<dyn KioskQueueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn visits(mut self, visits: Arc<dyn VisitLog>) -> Self {
        self.visits = Some(visits);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn NetworkPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn tiles(mut self, tiles: Vec<ActionTile>) -> Self {
        self.tiles = tiles;
        self
    }

    /// Validate, seed state and start the listener and the reconciliation loop.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn mount(self) -> Result<KioskShell, KioskError> {
        self.config.validate()?;

        let online = initial_online(self.platform.as_deref());
        let max_tiles = self.config.max_tiles;
        let ctx = Arc::new(KioskContext::new(
            self.config,
            self.store
                .unwrap_or_else(|| Arc::new(InMemoryKioskQueue::new())),
            self.telemetry.unwrap_or_else(|| Arc::new(TracingTelemetry)),
            self.translator.unwrap_or_else(|| Arc::new(EnglishCatalog)),
            self.visits.unwrap_or_else(|| Arc::new(InMemoryVisitLog::new())),
            online,
        ));
        let tiles = TileGrid::new(Arc::clone(&ctx), self.tiles, max_tiles)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tracker = ConnectivityTracker::new(Arc::clone(&ctx));
        let mut tasks = Vec::with_capacity(2);
        if let Some(platform) = self.platform {
            tasks.push(tracker.listen(platform, shutdown_rx.clone()));
        }
        tasks.push(ReconciliationLoop::new(Arc::clone(&ctx)).spawn(shutdown_rx));

        info!(online, pending = ctx.store.len(), "kiosk shell mounted");

        Ok(KioskShell {
            scan_form: ScanForm::new(Arc::clone(&ctx)),
            tiles,
            tracker,
            shutdown_tx,
            tasks,
            ctx,
        })
    }
}

/// A mounted kiosk screen.
pub struct KioskShell {
    ctx: Arc<KioskContext>,
    scan_form: ScanForm,
    tiles: TileGrid,
    tracker: ConnectivityTracker,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl KioskShell {
    pub fn builder(config: KioskConfig) -> KioskShellBuilder {
        KioskShellBuilder::new(config)
    }

    pub fn scan_form(&mut self) -> &mut ScanForm {
        &mut self.scan_form
    }

    /// Type `code` into the scan field and submit.
    pub fn submit_scan(&mut self, code: &str) -> Option<KioskQueueItem> {
        self.scan_form.set_draft(code);
        self.scan_form.submit()
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn press_tile(&self, id: &str) -> Result<KioskQueueItem, KioskError> {
        self.tiles.press(id)
    }

    pub fn press_hotkey(&self, hotkey: &str) -> Result<KioskQueueItem, KioskError> {
        self.tiles.press_hotkey(hotkey)
    }

    /// Manual connectivity toggle. Returns the new value.
    pub fn toggle_network(&self) -> bool {
        self.tracker.toggle()
    }

    pub fn is_online(&self) -> bool {
        self.tracker.is_online()
    }

    pub fn status(&self) -> String {
        self.ctx.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<String> {
        self.ctx.status.subscribe()
    }

    pub fn queue_len(&self) -> usize {
        self.ctx.store.len()
    }

    pub fn queue(&self) -> Vec<KioskQueueItem> {
        self.ctx.store.items()
    }

    pub fn loop_state(&self) -> LoopState {
        *self.ctx.loop_state.borrow()
    }

    pub fn view(&self) -> KioskView {
        KioskView::capture(&self.ctx)
    }

    pub fn is_mounted(&self) -> bool {
        self.ctx.is_mounted()
    }

    /// Stop the listener and the loop and wait for both.
    ///
    /// 2 回目以降の呼び出しは何もしない。キューの中身はそのまま残る。
    pub async fn unmount(&mut self) {
        if !self.ctx.mark_unmounted() {
            return;
        }
        // ignore send error: tasks may already be gone
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        info!(pending = self.ctx.store.len(), "kiosk shell unmounted");
    }
}

impl Drop for KioskShell {
    fn drop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.ctx.mark_unmounted();
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        debug!("kiosk shell dropped without unmount; tasks aborted");
    }
}
