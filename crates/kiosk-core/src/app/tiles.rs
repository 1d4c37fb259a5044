//! Tiles - 操作タイル（最大 6 枚、3x2）
//!
//! タイル固有の業務ロジックは持ちません。押されたら `id` から status イベントを作って
//! キューに積み、そのあとでタイル自身のコールバックを呼ぶだけです。

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use super::context::KioskContext;
use crate::domain::{KioskError, KioskQueueItem, NewKioskEvent};
use crate::ports::{MessageKey, TelemetryEvent};

/// Tiles per grid row.
pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Neutral,
    Primary,
    Success,
    Warning,
    Danger,
}

/// Runs after the tile's event has been queued.
pub type PressCallback = Arc<dyn Fn(&ActionTile) + Send + Sync>;

#[derive(Clone)]
pub struct ActionTile {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub hotkey: Option<String>,
    pub accent: Accent,
    on_press: Option<PressCallback>,
}

impl ActionTile {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            hotkey: None,
            accent: Accent::Neutral,
            on_press: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkey = Some(hotkey.into());
        self
    }

    pub fn accent(mut self, accent: Accent) -> Self {
        self.accent = accent;
        self
    }

    pub fn on_press<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ActionTile) + Send + Sync + 'static,
    {
        self.on_press = Some(Arc::new(callback));
        self
    }

    /// The production floor tiles.
    pub fn default_grid() -> Vec<ActionTile> {
        vec![
            ActionTile::new("start", "Start production")
                .description("Begin the current work order")
                .hotkey("F1")
                .accent(Accent::Success),
            ActionTile::new("pause", "Pause")
                .description("Hold the line without closing the order")
                .hotkey("F2")
                .accent(Accent::Warning),
            ActionTile::new("resume", "Resume")
                .description("Continue a paused work order")
                .hotkey("F3")
                .accent(Accent::Primary),
            ActionTile::new("complete", "Complete")
                .description("Close the work order")
                .hotkey("F4")
                .accent(Accent::Success),
            ActionTile::new("report_issue", "Report issue")
                .description("Flag a quality or machine problem")
                .hotkey("F5")
                .accent(Accent::Danger),
            ActionTile::new("call_supervisor", "Call supervisor")
                .hotkey("F6"),
        ]
    }
}

impl fmt::Debug for ActionTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTile")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("hotkey", &self.hotkey)
            .field("accent", &self.accent)
            .field("on_press", &self.on_press.is_some())
            .finish()
    }
}

pub struct TileGrid {
    ctx: Arc<KioskContext>,
    tiles: Vec<ActionTile>,
}

impl TileGrid {
    pub(crate) fn new(
        ctx: Arc<KioskContext>,
        tiles: Vec<ActionTile>,
        max: usize,
    ) -> Result<Self, KioskError> {
        if tiles.len() > max {
            return Err(KioskError::TooManyTiles {
                count: tiles.len(),
                max,
            });
        }
        for (i, tile) in tiles.iter().enumerate() {
            if tiles[..i].iter().any(|t| t.id == tile.id) {
                return Err(KioskError::DuplicateTile(tile.id.clone()));
            }
        }
        Ok(Self { ctx, tiles })
    }

    pub fn tiles(&self) -> &[ActionTile] {
        &self.tiles
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, ActionTile> {
        self.tiles.chunks(GRID_COLUMNS)
    }

    pub fn press(&self, id: &str) -> Result<KioskQueueItem, KioskError> {
        let tile = self
            .tiles
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| KioskError::UnknownTile(id.to_string()))?;
        self.dispatch(tile)
    }

    pub fn press_hotkey(&self, hotkey: &str) -> Result<KioskQueueItem, KioskError> {
        let tile = self
            .tiles
            .iter()
            .find(|t| {
                t.hotkey
                    .as_deref()
                    .is_some_and(|k| k.eq_ignore_ascii_case(hotkey))
            })
            .ok_or_else(|| KioskError::UnknownHotkey(hotkey.to_string()))?;
        self.dispatch(tile)
    }

    fn dispatch(&self, tile: &ActionTile) -> Result<KioskQueueItem, KioskError> {
        if !self.ctx.is_mounted() {
            return Err(KioskError::Unmounted);
        }
        let offline = !self.ctx.is_online();

        self.ctx.telemetry.emit(
            TelemetryEvent::TileClick,
            json!({
                "role": self.ctx.config.role,
                "tileId": tile.id,
                "offline": offline,
            }),
        );
        let item = self
            .ctx
            .store
            .enqueue(NewKioskEvent::status(tile.id.as_str(), offline));
        self.ctx.set_status(&if offline {
            MessageKey::ActionQueuedOffline { action: &tile.id }
        } else {
            MessageKey::ActionQueuedOnline { action: &tile.id }
        });

        if let Some(callback) = &tile.on_press {
            callback(tile);
        }
        Ok(item)
    }
}
