//! EnglishCatalog - デフォルトの Translator

use crate::domain::ChangeSource;
use crate::ports::{MessageKey, Translator};

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl Translator for EnglishCatalog {
    fn resolve(&self, key: &MessageKey<'_>) -> String {
        match key {
            MessageKey::ReadyOnline => "Online. Events sync automatically.".to_string(),
            MessageKey::ReadyOffline => "Offline. Events are stored on this device.".to_string(),
            MessageKey::NetworkRestored {
                source: ChangeSource::Listener,
            } => "Connection restored. Syncing queued events.".to_string(),
            MessageKey::NetworkRestored {
                source: ChangeSource::Toggle,
            } => "Switched to online mode.".to_string(),
            MessageKey::NetworkLost {
                source: ChangeSource::Listener,
            } => "Connection lost. Events will be queued.".to_string(),
            MessageKey::NetworkLost {
                source: ChangeSource::Toggle,
            } => "Switched to offline mode.".to_string(),
            MessageKey::ScanQueuedOnline { code } => format!("Scan {code} queued for sync."),
            MessageKey::ScanQueuedOffline { code } => {
                format!("Scan {code} saved offline. It will sync when back online.")
            }
            MessageKey::ActionQueuedOnline { action } => {
                format!("Action {action} queued for sync.")
            }
            MessageKey::ActionQueuedOffline { action } => {
                format!("Action {action} saved offline. It will sync when back online.")
            }
            MessageKey::ProcessedScan { code } => format!("Processed scan {code}"),
            MessageKey::ProcessedAction { action } => format!("Processed action {action}"),
            MessageKey::ConnectivityLabel { online: true } => "Online".to_string(),
            MessageKey::ConnectivityLabel { online: false } => "Offline".to_string(),
        }
    }
}
