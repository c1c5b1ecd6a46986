use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

// ═══════════════════════════════════════════════════════════════
//  Cursor Config
// ═══════════════════════════════════════════════════════════════

/// What to do with a zone suffix embedded in timestamp text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedZonePolicy {
    /// A suffix is a malformed literal: the session zone is authoritative.
    #[default]
    Reject,
    /// A parseable offset suffix overrides the session zone.
    Honor,
}

/// Decoder settings as written in TOML.
///
/// ```toml
/// time_zone = "+08:00"
/// embedded_zone = "honor"
/// null_text_is_null = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Session zone for date/time/timestamp accessors without an explicit zone.
    pub time_zone: String,
    pub embedded_zone: EmbeddedZonePolicy,
    /// Treat the text `null` (any case) in a timestamp column as NULL.
    pub null_text_is_null: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            embedded_zone: EmbeddedZonePolicy::Reject,
            null_text_is_null: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config (read): '{path}': {source}")]
    Read { path: String, source: std::io::Error },

    #[error("config (parse): {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config: unrecognized time zone '{0}'")]
    InvalidTimeZone(String),
}

impl CursorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate and convert into the settings a cursor runs with.
    pub fn resolve(&self) -> Result<CursorOptions, ConfigError> {
        let zone = rowset_decode::parse_offset(&self.time_zone)
            .ok_or_else(|| ConfigError::InvalidTimeZone(self.time_zone.clone()))?;
        Ok(CursorOptions {
            zone,
            embedded_zone: self.embedded_zone,
            null_text_is_null: self.null_text_is_null,
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  Cursor Options
// ═══════════════════════════════════════════════════════════════

/// Validated decoder settings, fixed for the cursor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    pub zone: FixedOffset,
    pub embedded_zone: EmbeddedZonePolicy,
    pub null_text_is_null: bool,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            zone: Utc.fix(),
            embedded_zone: EmbeddedZonePolicy::Reject,
            null_text_is_null: true,
        }
    }
}

impl CursorOptions {
    pub fn with_zone(mut self, zone: FixedOffset) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_embedded_zone(mut self, policy: EmbeddedZonePolicy) -> Self {
        self.embedded_zone = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let cfg = CursorConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.time_zone, "UTC");
        assert_eq!(cfg.resolve().unwrap(), CursorOptions::default());
    }

    #[test]
    fn full_config() {
        let cfg = CursorConfig::from_toml_str(
            r#"
            time_zone = "-05:00"
            embedded_zone = "honor"
            null_text_is_null = false
            "#,
        )
        .unwrap();
        let opts = cfg.resolve().unwrap();
        assert_eq!(opts.zone, FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(opts.embedded_zone, EmbeddedZonePolicy::Honor);
        assert!(!opts.null_text_is_null);
    }

    #[test]
    fn bad_zone_and_bad_policy() {
        let cfg = CursorConfig::from_toml_str(r#"time_zone = "Mars/Olympus""#).unwrap();
        assert!(matches!(cfg.resolve(), Err(ConfigError::InvalidTimeZone(_))));
        assert!(matches!(
            CursorConfig::from_toml_str(r#"embedded_zone = "sometimes""#),
            Err(ConfigError::Parse(_))
        ));
    }
}
