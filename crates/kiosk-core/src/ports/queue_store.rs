//! KioskQueueStore port - 未同期イベントのキュー
//!
//! # 設計原則
//! - 挿入順（FIFO）のみ。並べ替え・優先度なし
//! - 上限なし（オフライン中は無制限に積まれる。backpressure もなし）
//! - 操作は同期的で失敗しない（空の dequeue は None を返すだけ）
//! - telemetry もネットワーク呼び出しもしない。純粋なキュー操作だけ
//!
//! 実装: `impls::InMemoryKioskQueue`

use tokio::sync::watch;

use crate::domain::{KioskQueueItem, NewKioskEvent};

pub trait KioskQueueStore: Send + Sync {
    /// Stamp a fresh id and `createdAt`, then append to the back.
    fn enqueue(&self, event: NewKioskEvent) -> KioskQueueItem;

    /// Remove and return the oldest item. No-op on an empty queue.
    fn dequeue(&self) -> Option<KioskQueueItem>;

    /// Oldest item without removing it.
    fn head(&self) -> Option<KioskQueueItem>;

    /// Full ordered list, oldest first.
    fn items(&self) -> Vec<KioskQueueItem>;

    /// Up to `limit` oldest items, oldest first.
    fn preview(&self, limit: usize) -> Vec<KioskQueueItem> {
        let mut items = self.items();
        items.truncate(limit);
        items
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue length, republished after every enqueue/dequeue.
    fn subscribe(&self) -> watch::Receiver<usize>;
}
