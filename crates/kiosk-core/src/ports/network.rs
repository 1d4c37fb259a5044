//! NetworkPlatform port - ホスト環境の接続状態シグナル
//!
//! 起動時の同期読み取り（`current_status`）と、"online" / "offline" シグナルの購読を提供します。

use tokio::sync::broadcast;

/// A raw platform signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSignal {
    Online,
    Offline,
}

impl NetworkSignal {
    pub fn is_online(self) -> bool {
        matches!(self, NetworkSignal::Online)
    }
}

pub trait NetworkPlatform: Send + Sync {
    /// Current status, or `None` when the platform cannot tell.
    fn current_status(&self) -> Option<bool>;

    /// Subscribe to future signals. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<NetworkSignal>;
}
