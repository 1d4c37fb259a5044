//! ConnectivityTracker - 接続状態の追跡
//!
//! 接続フラグを変えるのは 2 経路だけです。
//! - プラットフォームの online / offline シグナル（source = listener）
//! - オペレーターの手動トグル（source = toggle）
//!
//! どちらもキュー内のアイテムには触りません。既存アイテムの `offline` は作成時の記録のまま。

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::context::KioskContext;
use crate::domain::{ChangeSource, NetworkState};
use crate::ports::{MessageKey, NetworkPlatform, NetworkSignal, TelemetryEvent};

/// Startup connectivity. Platforms that cannot tell are treated as online.
pub fn initial_online(platform: Option<&dyn NetworkPlatform>) -> bool {
    platform
        .and_then(|p| p.current_status())
        .unwrap_or(true)
}

pub struct ConnectivityTracker {
    ctx: Arc<KioskContext>,
}

impl ConnectivityTracker {
    pub(crate) fn new(ctx: Arc<KioskContext>) -> Self {
        Self { ctx }
    }

    pub fn is_online(&self) -> bool {
        self.ctx.is_online()
    }

    /// Flip connectivity by hand. Returns the new value.
    pub fn toggle(&self) -> bool {
        if !self.ctx.is_mounted() {
            return self.ctx.is_online();
        }
        let next = !self.ctx.is_online();
        apply_change(&self.ctx, next, ChangeSource::Toggle);
        next
    }

    /// Subscribe now, then follow platform signals until `shutdown` fires.
    ///
    /// 購読はこの呼び出しの中で同期的に行うので、直後に来たシグナルも取りこぼさない。
    pub(crate) fn listen(
        &self,
        platform: Arc<dyn NetworkPlatform>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let signals = platform.subscribe();
        let ctx = Arc::clone(&self.ctx);
        tokio::spawn(listen_loop(ctx, platform, signals, shutdown))
    }
}

async fn listen_loop(
    ctx: Arc<KioskContext>,
    platform: Arc<dyn NetworkPlatform>,
    mut signals: broadcast::Receiver<NetworkSignal>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            signal = signals.recv() => match signal {
                Ok(signal) => apply_change(&ctx, signal.is_online(), ChangeSource::Listener),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // 途中のシグナルは捨てて、いまの状態だけ拾い直す
                    warn!(skipped, "network signals lagged; resyncing from platform");
                    if let Some(online) = platform.current_status() {
                        apply_change(&ctx, online, ChangeSource::Listener);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    // signals はここで drop され、購読が解除される
}

pub(crate) fn apply_change(ctx: &KioskContext, online: bool, source: ChangeSource) {
    let from = NetworkState::from_online(ctx.set_online(online));
    let to = NetworkState::from_online(online);
    info!(%from, %to, source = source.as_str(), "connectivity changed");

    ctx.telemetry.emit(
        TelemetryEvent::KioskNetworkChange,
        json!({
            "from": from,
            "to": to,
            "source": source,
        }),
    );
    ctx.set_status(&if online {
        MessageKey::NetworkRestored { source }
    } else {
        MessageKey::NetworkLost { source }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Fixture;
    use crate::domain::NewKioskEvent;
    use crate::impls::SimulatedNetwork;
    use crate::ports::KioskQueueStore;
    use std::time::Duration;

    #[test]
    fn initial_status_defaults_to_online() {
        assert!(initial_online(None));
        assert!(initial_online(Some(&SimulatedNetwork::unreported())));
        assert!(!initial_online(Some(&SimulatedNetwork::offline())));
        assert!(initial_online(Some(&SimulatedNetwork::online())));
    }

    #[test]
    fn toggle_flips_and_reports_source() {
        let fx = Fixture::new(true);
        let tracker = ConnectivityTracker::new(fx.ctx.clone());

        assert!(!tracker.toggle());
        assert!(!tracker.is_online());
        assert_eq!(fx.ctx.status.current(), "Switched to offline mode.");

        assert!(tracker.toggle());
        let changes = fx.telemetry.of(TelemetryEvent::KioskNetworkChange);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].attr("from"), "online");
        assert_eq!(changes[0].attr("to"), "offline");
        assert_eq!(changes[1].attr("to"), "online");
        assert!(changes.iter().all(|c| c.attr("source") == "toggle"));
    }

    #[test]
    fn toggling_leaves_recorded_offline_flags_alone() {
        let fx = Fixture::new(false);
        let tracker = ConnectivityTracker::new(fx.ctx.clone());
        let item = fx.queue.enqueue(NewKioskEvent::scan("A", true));

        tracker.toggle();

        assert_eq!(fx.queue.head(), Some(item));
        assert!(fx.queue.head().unwrap().offline());
    }

    #[tokio::test]
    async fn listener_applies_signals_until_shutdown() {
        let fx = Fixture::new(true);
        let network = Arc::new(SimulatedNetwork::online());
        let tracker = ConnectivityTracker::new(fx.ctx.clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut online_rx = fx.ctx.online.subscribe();

        let task = tracker.listen(network.clone(), shutdown_rx);
        assert_eq!(network.listener_count(), 1);

        network.go_offline();
        tokio::time::timeout(Duration::from_secs(1), online_rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(!tracker.is_online());
        assert_eq!(fx.ctx.status.current(), "Connection lost. Events will be queued.");
        assert_eq!(
            fx.telemetry.of(TelemetryEvent::KioskNetworkChange)[0].attr("source"),
            "listener"
        );

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
        assert_eq!(network.listener_count(), 0);
    }
}
