//! Status - オペレーター向けの表示
//!
//! - **StatusBoard**: 最新のステータス文字列（上書きのみ。履歴は持たない）
//! - **KioskView**: 接続状態・ステータス・キュー長・先頭数件のプレビューのスナップショット

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use super::context::KioskContext;
use super::reconciler::LoopState;
use crate::domain::{KioskEventKind, KioskQueueItem};
use crate::ports::MessageKey;

pub struct StatusBoard {
    tx: watch::Sender<String>,
}

impl StatusBoard {
    pub fn new(initial: String) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, message: String) {
        self.tx.send_replace(message);
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

/// `HH:MM:SS` in UTC.
pub fn short_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub id: String,
    pub kind: KioskEventKind,
    pub time: String,
    pub meta: String,
    pub offline: bool,
}

impl From<&KioskQueueItem> for PreviewRow {
    fn from(item: &KioskQueueItem) -> Self {
        Self {
            id: item.id.to_string(),
            kind: item.kind(),
            time: short_time(item.created_at),
            meta: item.meta().to_string(),
            offline: item.offline(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskView {
    pub online: bool,
    pub connectivity_label: String,
    pub status: String,
    pub queue_len: usize,
    /// A processing timer is armed.
    pub syncing: bool,
    pub preview: Vec<PreviewRow>,
}

impl KioskView {
    pub(crate) fn capture(ctx: &KioskContext) -> Self {
        let online = ctx.is_online();
        Self {
            online,
            connectivity_label: ctx.message(&MessageKey::ConnectivityLabel { online }),
            status: ctx.status.current(),
            queue_len: ctx.store.len(),
            syncing: *ctx.loop_state.borrow() == LoopState::Scheduled,
            preview: ctx
                .store
                .preview(ctx.config.preview_limit)
                .iter()
                .map(PreviewRow::from)
                .collect(),
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render(&self) -> String {
        let mut out = format!("[{}] {}\n", self.connectivity_label, self.status);
        out.push_str(&format!(
            "queue: {}{}\n",
            self.queue_len,
            if self.syncing { " (syncing)" } else { "" }
        ));
        for row in &self.preview {
            out.push_str(&format!(
                "  {} {:<6} {}{}\n",
                row.time,
                row.kind.as_str(),
                row.meta,
                if row.offline { "  [offline]" } else { "" }
            ));
        }
        let hidden = self.queue_len.saturating_sub(self.preview.len());
        if hidden > 0 {
            out.push_str(&format!("  ... {hidden} more\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KioskEventId, NewKioskEvent};
    use chrono::TimeZone;
    use ulid::Ulid;

    #[test]
    fn status_board_overwrites() {
        let board = StatusBoard::new("ready".to_string());
        let mut rx = board.subscribe();

        board.set("first".to_string());
        board.set("second".to_string());

        assert_eq!(board.current(), "second");
        assert_eq!(*rx.borrow_and_update(), "second");
    }

    #[test]
    fn preview_row_formats_time_and_badge() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 7, 9).unwrap();
        let item = KioskQueueItem::new(
            KioskEventId::from_ulid(Ulid::new()),
            NewKioskEvent::scan("ABC123", true),
            at,
        );

        let row = PreviewRow::from(&item);
        assert_eq!(row.time, "08:07:09");
        assert_eq!(row.meta, "ABC123");
        assert_eq!(row.kind, KioskEventKind::Scan);
        assert!(row.offline);
    }

    #[test]
    fn render_marks_offline_rows_and_hidden_tail() {
        let view = KioskView {
            online: false,
            connectivity_label: "Offline".to_string(),
            status: "Scan A saved offline.".to_string(),
            queue_len: 7,
            syncing: false,
            preview: vec![PreviewRow {
                id: "kevt-1".to_string(),
                kind: KioskEventKind::Scan,
                time: "08:00:00".to_string(),
                meta: "A".to_string(),
                offline: true,
            }],
        };

        let text = view.render();
        assert!(text.starts_with("[Offline] Scan A saved offline."));
        assert!(text.contains("queue: 7\n"));
        assert!(text.contains("[offline]"));
        assert!(text.contains("... 6 more"));
    }
}
