//! InMemoryKioskQueue - プロセス内の kiosk イベントキュー
//!
//! # 学習ポイント
//! - Mutex<VecDeque> による FIFO
//! - watch チャネルで長さを公開（reconciler が購読して再評価する）
//! - ロック内で await しない（すべての操作が同期で完結する）
//!
//! プロセスが終われば中身は消えます。永続化はしません。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::domain::{KioskQueueItem, NewKioskEvent};
use crate::ports::{Clock, IdGenerator, KioskQueueStore, SystemClock, UlidGenerator};

/// InMemoryKioskQueue は開発・本番共通のキュー実装
///
/// # 実装詳細
/// - VecDeque の back に積み、front から取り出す
/// - 長さの公開はロックを保持したまま行う（通知の順序が変更の順序と一致する）
///
/// # 使用例
/// ```ignore
/// let queue = InMemoryKioskQueue::new();
/// let item = queue.enqueue(NewKioskEvent::scan("ABC123", false));
/// assert_eq!(queue.dequeue(), Some(item));
/// ```
pub struct InMemoryKioskQueue {
    items: Mutex<VecDeque<KioskQueueItem>>,
    len_tx: watch::Sender<usize>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryKioskQueue {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// ID の timestamp と createdAt の両方に同じ Clock を使う
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));
        Self::with_parts(ids, clock)
    }

    pub fn with_parts(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            items: Mutex::new(VecDeque::new()),
            len_tx,
            ids,
            clock,
        }
    }

    // 中身は VecDeque だけなので、panic したスレッドが残したロックでも整合している
    fn lock(&self) -> MutexGuard<'_, VecDeque<KioskQueueItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryKioskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl KioskQueueStore for InMemoryKioskQueue {
    fn enqueue(&self, event: NewKioskEvent) -> KioskQueueItem {
        let item = KioskQueueItem::new(self.ids.generate_event_id(), event, self.clock.now());

        let mut items = self.lock();
        items.push_back(item.clone());
        self.len_tx.send_replace(items.len());
        debug!(event_id = %item.id, kind = %item.kind(), len = items.len(), "enqueued kiosk event");

        item
    }

    fn dequeue(&self) -> Option<KioskQueueItem> {
        let mut items = self.lock();
        let item = items.pop_front()?;
        self.len_tx.send_replace(items.len());
        debug!(event_id = %item.id, len = items.len(), "dequeued kiosk event");
        Some(item)
    }

    fn head(&self) -> Option<KioskQueueItem> {
        self.lock().front().cloned()
    }

    fn items(&self) -> Vec<KioskQueueItem> {
        self.lock().iter().cloned().collect()
    }

    fn preview(&self, limit: usize) -> Vec<KioskQueueItem> {
        self.lock().iter().take(limit).cloned().collect()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn subscribe(&self) -> watch::Receiver<usize> {
        self.len_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KioskEventKind;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    #[test]
    fn dequeue_returns_items_in_insertion_order() {
        let queue = InMemoryKioskQueue::new();
        let first = queue.enqueue(NewKioskEvent::scan("A", false));
        let second = queue.enqueue(NewKioskEvent::status("start", true));
        let third = queue.enqueue(NewKioskEvent::scan("B", true));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue(), Some(first));
        assert_eq!(queue.dequeue(), Some(second));
        assert_eq!(queue.dequeue(), Some(third));
        assert!(queue.is_empty());
    }

    #[test]
    fn dequeue_on_empty_is_a_noop() {
        let queue = InMemoryKioskQueue::new();
        let len_rx = queue.subscribe();

        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.len(), 0);
        assert!(!len_rx.has_changed().unwrap());
    }

    #[test]
    fn order_ignores_the_clock() {
        // 全件同じ時刻でも挿入順で出てくる
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let queue = InMemoryKioskQueue::with_clock(Arc::new(FixedClock::new(at)));

        let codes = ["1", "2", "3", "4", "5"];
        for code in codes {
            queue.enqueue(NewKioskEvent::scan(code, false));
        }

        let drained: Vec<String> = std::iter::from_fn(|| queue.dequeue())
            .map(|item| item.meta().to_string())
            .collect();
        assert_eq!(drained, codes);
    }

    #[test]
    fn ids_are_unique_and_created_at_comes_from_clock() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let queue = InMemoryKioskQueue::with_clock(Arc::new(FixedClock::new(at)));

        let ids: HashSet<_> = (0..100)
            .map(|i| queue.enqueue(NewKioskEvent::scan(i.to_string(), false)).id)
            .collect();

        assert_eq!(ids.len(), 100);
        assert!(queue.items().iter().all(|item| item.created_at == at));
    }

    #[test]
    fn head_and_preview_do_not_consume() {
        let queue = InMemoryKioskQueue::new();
        for code in ["A", "B", "C", "D", "E", "F", "G"] {
            queue.enqueue(NewKioskEvent::scan(code, false));
        }

        let head = queue.head().unwrap();
        assert_eq!(head.meta(), "A");
        assert_eq!(head.kind(), KioskEventKind::Scan);

        let preview: Vec<_> = queue.preview(5).iter().map(|i| i.meta().to_string()).collect();
        assert_eq!(preview, ["A", "B", "C", "D", "E"]);
        assert_eq!(queue.len(), 7);
    }

    #[test]
    fn subscribers_see_every_length_change() {
        let queue = InMemoryKioskQueue::new();
        let mut len_rx = queue.subscribe();
        assert_eq!(*len_rx.borrow_and_update(), 0);

        queue.enqueue(NewKioskEvent::scan("A", false));
        assert!(len_rx.has_changed().unwrap());
        assert_eq!(*len_rx.borrow_and_update(), 1);

        queue.dequeue();
        assert_eq!(*len_rx.borrow_and_update(), 0);
    }
}
