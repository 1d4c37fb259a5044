//! ReconciliationLoop - キューの消化ループ
//!
//! # 状態遷移
//! - **Idle**: offline、またはキューが空。タイマーなし
//! - **Scheduled**: online かつキューが空でない。タイマーはちょうど 1 本
//! - タイマー発火時: その時点の先頭を 1 件だけ処理（telemetry → ステータス → dequeue）
//!
//! 接続状態・キュー長が変わるたびに `gate(online, len)` を評価し直します。
//! Idle になった時点で待機中のタイマーは破棄（キャンセル）されます。
//! 予約後に一度でも offline を挟んだら（`Link::drops` が進んでいたら）、
//! いまが online でもそのタイマーは捨てて delay を最初から待ち直します。
//! 一度にまとめて流すことはなく、スループットは常に 1 件 / delay です。

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Sleep, sleep};
use tracing::debug;

use super::context::{KioskContext, Link};
use crate::domain::{KioskQueueItem, NewKioskEvent};
use crate::ports::{MessageKey, TelemetryEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Scheduled,
}

/// The gating condition: online with something to process.
pub fn gate(is_online: bool, queue_len: usize) -> LoopState {
    if is_online && queue_len > 0 {
        LoopState::Scheduled
    } else {
        LoopState::Idle
    }
}

pub struct ReconciliationLoop {
    ctx: Arc<KioskContext>,
    delay: Duration,
}

impl ReconciliationLoop {
    pub(crate) fn new(ctx: Arc<KioskContext>) -> Self {
        let delay = ctx.config.processing_delay();
        Self { ctx, delay }
    }

    pub(crate) fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        // 購読は spawn 前に済ませる（起動直後の変更も version 差分で拾える）
        let online_rx = self.ctx.online.subscribe();
        let len_rx = self.ctx.store.subscribe();
        tokio::spawn(self.run(online_rx, len_rx, shutdown))
    }

    async fn run(
        self,
        mut online_rx: watch::Receiver<Link>,
        mut len_rx: watch::Receiver<usize>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut timer: Option<Pin<Box<Sleep>>> = None;
        let mut armed_drops = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let link = *online_rx.borrow_and_update();
            if timer.is_some() && link.drops != armed_drops {
                debug!("connectivity dropped while armed; cancelled reconciliation timer");
                timer = None;
            }

            let state = gate(link.online, *len_rx.borrow_and_update());
            match (state, timer.is_some()) {
                (LoopState::Scheduled, false) => {
                    armed_drops = link.drops;
                    debug!(delay_ms = self.delay.as_millis() as u64, "armed reconciliation timer");
                    timer = Some(Box::pin(sleep(self.delay)));
                }
                (LoopState::Idle, true) => {
                    debug!("cancelled reconciliation timer");
                    timer = None;
                }
                _ => {}
            }
            self.ctx.loop_state.send_if_modified(|current| {
                let changed = *current != state;
                *current = state;
                changed
            });

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = len_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                () = fired(&mut timer) => {
                    timer = None;
                    self.process_head();
                }
            }
        }

        // timer はここで drop される。停止後に発火することはない
        self.ctx.loop_state.send_replace(LoopState::Idle);
    }

    /// Process whatever is at the head right now.
    ///
    /// 予約した時点の先頭ではなく、発火した時点の先頭を読む。空なら何もしない。
    fn process_head(&self) -> Option<KioskQueueItem> {
        let item = self.ctx.store.head()?;

        let mut attributes = json!({
            "eventId": item.id.to_string(),
            "type": item.kind(),
            "offline": item.offline(),
            "createdAt": item.created_at_iso(),
        });
        let message = match &item.event {
            NewKioskEvent::Scan(payload) => {
                attributes["code"] = json!(payload.code);
                MessageKey::ProcessedScan {
                    code: &payload.code,
                }
            }
            NewKioskEvent::Status(payload) => {
                attributes["action"] = json!(payload.action);
                MessageKey::ProcessedAction {
                    action: &payload.action,
                }
            }
        };
        self.ctx
            .telemetry
            .emit(TelemetryEvent::KioskEventProcessed, attributes);
        self.ctx.set_status(&message);

        let removed = self.ctx.store.dequeue();
        debug_assert_eq!(removed.as_ref().map(|r| r.id), Some(item.id));
        debug!(event_id = %item.id, kind = %item.kind(), "processed kiosk event");

        Some(item)
    }
}

async fn fired(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(armed) => armed.as_mut().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Fixture;
    use crate::ports::KioskQueueStore;
    use rstest::rstest;

    #[rstest]
    #[case(true, 1, LoopState::Scheduled)]
    #[case(true, 42, LoopState::Scheduled)]
    #[case(true, 0, LoopState::Idle)]
    #[case(false, 3, LoopState::Idle)]
    #[case(false, 0, LoopState::Idle)]
    fn gate_is_online_and_non_empty(
        #[case] online: bool,
        #[case] len: usize,
        #[case] expected: LoopState,
    ) {
        assert_eq!(gate(online, len), expected);
    }

    #[test]
    fn process_head_consumes_exactly_the_oldest() {
        let fx = Fixture::new(true);
        let first = fx.queue.enqueue(NewKioskEvent::scan("ABC123", true));
        fx.queue.enqueue(NewKioskEvent::status("start", false));
        let reconciler = ReconciliationLoop::new(fx.ctx.clone());

        let processed = reconciler.process_head().unwrap();

        assert_eq!(processed, first);
        assert_eq!(fx.queue.len(), 1);
        assert_eq!(fx.ctx.status.current(), "Processed scan ABC123");

        let records = fx.telemetry.of(TelemetryEvent::KioskEventProcessed);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attr("eventId"), first.id.to_string().as_str());
        assert_eq!(records[0].attr("type"), "scan");
        assert_eq!(records[0].attr("offline"), true);
        assert_eq!(records[0].attr("code"), "ABC123");
        assert_eq!(records[0].attr("createdAt"), first.created_at_iso().as_str());
    }

    #[test]
    fn process_head_on_empty_queue_is_a_noop() {
        let fx = Fixture::new(true);
        let status = fx.ctx.status.current();
        let reconciler = ReconciliationLoop::new(fx.ctx.clone());

        assert!(reconciler.process_head().is_none());
        assert!(fx.telemetry.is_empty());
        assert_eq!(fx.ctx.status.current(), status);
    }
}
