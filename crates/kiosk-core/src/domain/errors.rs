//! Errors - エラー型
//!
//! キュー操作そのものは失敗しません（空の dequeue も no-op）。
//! ここにあるのは構築時・操作時に呼び出し側へ返すものだけです。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KioskError {
    #[error("unknown tile id={0}")]
    UnknownTile(String),

    #[error("no tile bound to hotkey={0}")]
    UnknownHotkey(String),

    #[error("duplicate tile id={0}")]
    DuplicateTile(String),

    #[error("too many tiles: {count} (max {max})")]
    TooManyTiles { count: usize, max: usize },

    #[error("kiosk shell is unmounted")]
    Unmounted,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
