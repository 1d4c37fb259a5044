//! Connectivity vocabulary shared by the tracker, the telemetry and the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network direction as it appears in `kiosk_network_change` (`from` / `to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkState {
    Online,
    Offline,
}

impl NetworkState {
    pub fn from_online(is_online: bool) -> Self {
        if is_online {
            NetworkState::Online
        } else {
            NetworkState::Offline
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, NetworkState::Online)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkState::Online => "online",
            NetworkState::Offline => "offline",
        }
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who changed connectivity: the platform listener or the operator toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Listener,
    Toggle,
}

impl ChangeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeSource::Listener => "listener",
            ChangeSource::Toggle => "toggle",
        }
    }
}
