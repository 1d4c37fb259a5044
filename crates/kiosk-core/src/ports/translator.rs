//! Translator port - 表示文字列の解決
//!
//! キーは文字列テンプレートではなく enum で持ちます。パラメータもキーの中に入るので、
//! 存在しないキーや引数の渡し忘れはコンパイル時に弾かれます。

use crate::domain::ChangeSource;

/// Every operator-facing message the kiosk can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKey<'a> {
    /// Seeded on mount while online.
    ReadyOnline,
    /// Seeded on mount while offline.
    ReadyOffline,
    NetworkRestored { source: ChangeSource },
    NetworkLost { source: ChangeSource },
    ScanQueuedOnline { code: &'a str },
    ScanQueuedOffline { code: &'a str },
    ActionQueuedOnline { action: &'a str },
    ActionQueuedOffline { action: &'a str },
    ProcessedScan { code: &'a str },
    ProcessedAction { action: &'a str },
    /// Short connectivity label for the indicator.
    ConnectivityLabel { online: bool },
}

pub trait Translator: Send + Sync {
    fn resolve(&self, key: &MessageKey<'_>) -> String;
}
