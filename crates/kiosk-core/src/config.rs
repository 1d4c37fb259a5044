//! KioskConfig - kiosk シェルの設定
//!
//! 既定値 → 環境変数（`KIOSK_*`）の順に重ねます。JSON からも読めます。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

/// Delay between two processed events while online.
pub const DEFAULT_PROCESSING_DELAY_MS: u64 = 600;
/// Oldest pending items shown in the preview.
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;
/// The tile grid is 3x2.
pub const MAX_TILES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    pub processing_delay_ms: u64,
    pub preview_limit: usize,
    pub max_tiles: usize,
    /// `role` attribute on operator telemetry.
    pub role: String,
    /// Path recorded in the visit log on each scan.
    pub kiosk_path: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: DEFAULT_PROCESSING_DELAY_MS,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            max_tiles: MAX_TILES,
            role: "operator".to_string(),
            kiosk_path: "/kiosk".to_string(),
        }
    }
}

impl KioskConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Layer `KIOSK_*` values from `lookup` over the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("KIOSK_PROCESSING_DELAY_MS") {
            config.processing_delay_ms = parse_number("processing_delay_ms", &raw)?;
        }
        if let Some(raw) = lookup("KIOSK_PREVIEW_LIMIT") {
            config.preview_limit = parse_number("preview_limit", &raw)?;
        }
        if let Some(raw) = lookup("KIOSK_MAX_TILES") {
            config.max_tiles = parse_number("max_tiles", &raw)?;
        }
        if let Some(role) = lookup("KIOSK_ROLE") {
            config.role = role;
        }
        if let Some(path) = lookup("KIOSK_PATH") {
            config.kiosk_path = path;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing_delay_ms == 0 {
            return Err(ConfigError::invalid("processing_delay_ms", "must be > 0"));
        }
        if self.preview_limit == 0 {
            return Err(ConfigError::invalid("preview_limit", "must be > 0"));
        }
        if self.max_tiles == 0 || self.max_tiles > MAX_TILES {
            return Err(ConfigError::invalid(
                "max_tiles",
                format!("must be within 1..={MAX_TILES}"),
            ));
        }
        if self.role.trim().is_empty() {
            return Err(ConfigError::invalid("role", "must not be blank"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("{raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_kiosk_contract() {
        let config = KioskConfig::default();
        assert_eq!(config.processing_delay(), Duration::from_millis(600));
        assert_eq!(config.preview_limit, 5);
        assert_eq!(config.max_tiles, 6);
        assert_eq!(config.role, "operator");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_values_override_defaults() {
        let config = KioskConfig::from_lookup(lookup(&[
            ("KIOSK_PROCESSING_DELAY_MS", "250"),
            ("KIOSK_ROLE", "supervisor"),
        ]))
        .unwrap();

        assert_eq!(config.processing_delay_ms, 250);
        assert_eq!(config.role, "supervisor");
        assert_eq!(config.preview_limit, DEFAULT_PREVIEW_LIMIT);
    }

    #[rstest]
    #[case("KIOSK_PROCESSING_DELAY_MS", "0")]
    #[case("KIOSK_PROCESSING_DELAY_MS", "soon")]
    #[case("KIOSK_PREVIEW_LIMIT", "0")]
    #[case("KIOSK_MAX_TILES", "7")]
    #[case("KIOSK_ROLE", "  ")]
    fn invalid_env_values_are_rejected(#[case] key: &str, #[case] value: &str) {
        let err = KioskConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = KioskConfig::from_json_str(r#"{ "preview_limit": 3 }"#).unwrap();
        assert_eq!(config.preview_limit, 3);
        assert_eq!(config.processing_delay_ms, DEFAULT_PROCESSING_DELAY_MS);
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let err = KioskConfig::from_json_str(r#"{ "queue_cap": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
