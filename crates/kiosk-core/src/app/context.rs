//! KioskContext - シェルの各部品が共有する状態とポート
//!
//! 共有可変状態はキュー（store）と接続フラグ（online）の 2 つだけです。
//! ステータス文字列は上書き専用の表示用の値です。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use super::reconciler::LoopState;
use super::status::StatusBoard;
use crate::config::KioskConfig;
use crate::ports::{KioskQueueStore, MessageKey, TelemetrySink, Translator, VisitLog};

/// Connectivity as seen by the reconciliation loop.
///
/// `drops` は offline への遷移回数。watch は値をまとめてしまうので、
/// online → offline → online が 1 回の poll の間に起きても drops の差で検知できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) online: bool,
    pub(crate) drops: u64,
}

pub(crate) struct KioskContext {
    pub(crate) config: KioskConfig,
    pub(crate) store: Arc<dyn KioskQueueStore>,
    pub(crate) telemetry: Arc<dyn TelemetrySink>,
    pub(crate) translator: Arc<dyn Translator>,
    pub(crate) visits: Arc<dyn VisitLog>,
    pub(crate) status: StatusBoard,
    pub(crate) online: watch::Sender<Link>,
    pub(crate) loop_state: watch::Sender<LoopState>,
    mounted: AtomicBool,
}

impl KioskContext {
    pub(crate) fn new(
        config: KioskConfig,
        store: Arc<dyn KioskQueueStore>,
        telemetry: Arc<dyn TelemetrySink>,
        translator: Arc<dyn Translator>,
        visits: Arc<dyn VisitLog>,
        initially_online: bool,
    ) -> Self {
        let seed = translator.resolve(&if initially_online {
            MessageKey::ReadyOnline
        } else {
            MessageKey::ReadyOffline
        });
        let (online, _) = watch::channel(Link {
            online: initially_online,
            drops: 0,
        });
        let (loop_state, _) = watch::channel(LoopState::Idle);

        Self {
            config,
            store,
            telemetry,
            translator,
            visits,
            status: StatusBoard::new(seed),
            online,
            loop_state,
            mounted: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_online(&self) -> bool {
        self.online.borrow().online
    }

    /// Publish a connectivity value. Returns the previous one.
    pub(crate) fn set_online(&self, online: bool) -> bool {
        let mut previous = online;
        self.online.send_modify(|link| {
            previous = link.online;
            link.online = online;
            if !online {
                link.drops += 1;
            }
        });
        previous
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Returns whether this call did the unmount.
    pub(crate) fn mark_unmounted(&self) -> bool {
        self.mounted.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn message(&self, key: &MessageKey<'_>) -> String {
        self.translator.resolve(key)
    }

    pub(crate) fn set_status(&self, key: &MessageKey<'_>) {
        self.status.set(self.message(key));
    }
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::Fixture;

    #[test]
    fn set_online_counts_every_drop() {
        let fx = Fixture::new(true);
        let mut rx = fx.ctx.online.subscribe();

        assert!(fx.ctx.set_online(false));
        assert!(!fx.ctx.set_online(true));

        let link = *rx.borrow_and_update();
        assert!(link.online);
        assert_eq!(link.drops, 1);

        fx.ctx.set_online(true);
        assert_eq!(fx.ctx.online.borrow().drops, 1);
    }
}
