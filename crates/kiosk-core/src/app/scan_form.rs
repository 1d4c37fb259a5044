//! ScanForm - スキャン入力欄
//!
//! 下書きはこのフォームだけが持つローカル状態です。送信は同期的にキューへ積むだけで、
//! ネットワーク呼び出しを待つことはありません。

use std::sync::Arc;

use serde_json::json;

use super::context::KioskContext;
use crate::domain::{KioskQueueItem, NewKioskEvent};
use crate::ports::{MessageKey, TelemetryEvent};

/// Accessible label of the scan input.
pub const SCAN_INPUT_LABEL: &str = "Scan or enter code";

pub struct ScanForm {
    ctx: Arc<KioskContext>,
    draft: String,
    focused: bool,
}

impl ScanForm {
    pub(crate) fn new(ctx: Arc<KioskContext>) -> Self {
        Self {
            ctx,
            draft: String::new(),
            focused: true,
        }
    }

    pub fn label(&self) -> &'static str {
        SCAN_INPUT_LABEL
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Typing into the field (scanners send characters one by one).
    pub fn type_str(&mut self, text: &str) {
        self.draft.push_str(text);
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Submit the draft.
    ///
    /// 空白だけの入力は黙って無視します（キューもステータスも下書きも変わらない）。
    pub fn submit(&mut self) -> Option<KioskQueueItem> {
        if !self.ctx.is_mounted() {
            return None;
        }
        let code = self.draft.trim();
        if code.is_empty() {
            return None;
        }
        let code = code.to_string();
        let offline = !self.ctx.is_online();

        self.ctx.telemetry.emit(
            TelemetryEvent::KioskScan,
            json!({
                "role": self.ctx.config.role,
                "code": code,
                "offline": offline,
            }),
        );
        let item = self.ctx.store.enqueue(NewKioskEvent::scan(code.as_str(), offline));
        self.ctx.visits.record(&self.ctx.config.kiosk_path, &code);
        self.ctx.set_status(&if offline {
            MessageKey::ScanQueuedOffline { code: &code }
        } else {
            MessageKey::ScanQueuedOnline { code: &code }
        });

        self.draft.clear();
        self.focused = true;
        Some(item)
    }
}
