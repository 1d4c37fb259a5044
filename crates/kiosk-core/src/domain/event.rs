//! Kiosk events: what an operator action turns into while it waits for sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::KioskEventId;

/// Tag of a queued event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KioskEventKind {
    Scan,
    Status,
}

impl KioskEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KioskEventKind::Scan => "scan",
            KioskEventKind::Status => "status",
        }
    }
}

impl fmt::Display for KioskEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPayload {
    pub code: String,
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub action: String,
    pub offline: bool,
}

/// Tagged payload of a kiosk event.
///
/// `offline` は作成時点の接続状態の記録で、あとから書き換えられることはありません。
/// 処理するかどうかは「現在の」接続状態で決まり、この値とは無関係です。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum NewKioskEvent {
    Scan(ScanPayload),
    Status(StatusPayload),
}

impl NewKioskEvent {
    pub fn scan(code: impl Into<String>, offline: bool) -> Self {
        NewKioskEvent::Scan(ScanPayload {
            code: code.into(),
            offline,
        })
    }

    pub fn status(action: impl Into<String>, offline: bool) -> Self {
        NewKioskEvent::Status(StatusPayload {
            action: action.into(),
            offline,
        })
    }

    pub fn kind(&self) -> KioskEventKind {
        match self {
            NewKioskEvent::Scan(_) => KioskEventKind::Scan,
            NewKioskEvent::Status(_) => KioskEventKind::Status,
        }
    }

    pub fn offline(&self) -> bool {
        match self {
            NewKioskEvent::Scan(p) => p.offline,
            NewKioskEvent::Status(p) => p.offline,
        }
    }

    /// Short metadata string: the scanned code or the action id.
    pub fn meta(&self) -> &str {
        match self {
            NewKioskEvent::Scan(p) => &p.code,
            NewKioskEvent::Status(p) => &p.action,
        }
    }
}

/// A pending operator action awaiting reconciliation.
///
/// Items are never edited in place; the only way out of the queue is dequeue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskQueueItem {
    pub id: KioskEventId,
    #[serde(flatten)]
    pub event: NewKioskEvent,
    /// Display only. Queue order never looks at this.
    pub created_at: DateTime<Utc>,
}

impl KioskQueueItem {
    pub fn new(id: KioskEventId, event: NewKioskEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            event,
            created_at,
        }
    }

    pub fn kind(&self) -> KioskEventKind {
        self.event.kind()
    }

    pub fn offline(&self) -> bool {
        self.event.offline()
    }

    pub fn meta(&self) -> &str {
        self.event.meta()
    }

    /// `createdAt` as an RFC 3339 string with millisecond precision.
    pub fn created_at_iso(&self) -> String {
        self.created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn item(event: NewKioskEvent) -> KioskQueueItem {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        KioskQueueItem::new(KioskEventId::from_ulid(Ulid::new()), event, at)
    }

    #[test]
    fn scan_item_serializes_with_type_tag() {
        let item = item(NewKioskEvent::scan("ABC123", true));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["type"], "scan");
        assert_eq!(value["payload"]["code"], "ABC123");
        assert_eq!(value["payload"]["offline"], true);
        assert_eq!(value["createdAt"], "2024-05-01T08:30:00Z");
    }

    #[test]
    fn status_item_exposes_action_as_meta() {
        let item = item(NewKioskEvent::status("start", false));

        assert_eq!(item.kind(), KioskEventKind::Status);
        assert_eq!(item.meta(), "start");
        assert!(!item.offline());
        assert_eq!(item.created_at_iso(), "2024-05-01T08:30:00.000Z");
    }
}
