//! SimulatedNetwork - 手動で操作できる NetworkPlatform
//!
//! CLI とテストで使います。`current_status` を `None` にすると
//! 「プラットフォームが接続状態を報告できない」状況を再現できます。

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::ports::{NetworkPlatform, NetworkSignal};

const SIGNAL_CAPACITY: usize = 64;

pub struct SimulatedNetwork {
    status: Mutex<Option<bool>>,
    signals: broadcast::Sender<NetworkSignal>,
}

impl SimulatedNetwork {
    pub fn new(initial: Option<bool>) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            status: Mutex::new(initial),
            signals,
        }
    }

    pub fn online() -> Self {
        Self::new(Some(true))
    }

    pub fn offline() -> Self {
        Self::new(Some(false))
    }

    /// Platform without a status API.
    pub fn unreported() -> Self {
        Self::new(None)
    }

    pub fn go_online(&self) {
        self.raise(NetworkSignal::Online);
    }

    pub fn go_offline(&self) {
        self.raise(NetworkSignal::Offline);
    }

    pub fn raise(&self, signal: NetworkSignal) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = Some(signal.is_online());
        // 購読者がいなければ捨てる（ブラウザのイベントと同じ）
        let _ = self.signals.send(signal);
    }

    pub fn listener_count(&self) -> usize {
        self.signals.receiver_count()
    }
}

impl NetworkPlatform for SimulatedNetwork {
    fn current_status(&self) -> Option<bool> {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self) -> broadcast::Receiver<NetworkSignal> {
        self.signals.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn raised_signals_reach_subscribers_and_update_status() {
        let network = SimulatedNetwork::unreported();
        assert_eq!(network.current_status(), None);

        let mut rx = network.subscribe();
        network.go_offline();
        network.go_online();

        assert_eq!(rx.recv().await.unwrap(), NetworkSignal::Offline);
        assert_eq!(rx.recv().await.unwrap(), NetworkSignal::Online);
        assert_eq!(network.current_status(), Some(true));
    }

    #[test]
    fn raising_without_listeners_is_fine() {
        let network = SimulatedNetwork::online();
        network.go_offline();
        assert_eq!(network.current_status(), Some(false));
        assert_eq!(network.listener_count(), 0);
    }
}
