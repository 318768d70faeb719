//! Serializable scan configuration.
//!
//! A scan config file looks like:
//!
//! ```toml
//! preset = "Cleaner signals"
//! lookback_bars = 160
//! alert_threshold = 80
//! max_threads = 4
//!
//! [sessions]
//! allow_opening = true
//! allow_midday = false
//! allow_power = true
//!
//! [session_windows]
//! opening_start = "09:30"
//! midday_start = "11:00"
//! power_start = "15:00"
//! close = "16:00"
//!
//! [[presets]]
//! name = "Momentum only"
//! min_actionable_score = 60
//! volume_multiplier = 1.2
//! require_macd_turn = true
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use scalpscore_core::engine::{EngineConfig, SignalEngine, DEFAULT_LOOKBACK_BARS};
use scalpscore_core::presets::{
    MandatoryChecks, Preset, PresetError, PresetRegistry, DEFAULT_PRESET,
};
use scalpscore_core::session::{RegularHours, SessionError, SessionFilter, SessionWindows};

/// Score at or above which a directional signal counts as an alert.
pub const DEFAULT_ALERT_THRESHOLD: u8 = 80;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid time for {field}: '{value}' (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },

    #[error("lookback_bars must be at least 1")]
    ZeroLookback,

    #[error("max_threads must be at least 1")]
    ZeroThreads,

    #[error("alert_threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(u8),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid preset '{name}': {source}")]
    Preset {
        name: String,
        #[source]
        source: PresetError,
    },
}

/// Complete configuration for scoring one symbol or scanning a watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Preset name; unknown names fall back to "Cleaner signals".
    pub preset: String,
    pub lookback_bars: usize,
    pub sessions: SessionFilter,
    pub session_windows: Option<SessionWindowsConfig>,
    /// Scan worker cap. `None` uses every available core.
    pub max_threads: Option<usize>,
    pub alert_threshold: u8,
    /// Custom presets, registered alongside the built-ins.
    pub presets: Vec<PresetConfig>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            lookback_bars: DEFAULT_LOOKBACK_BARS,
            sessions: SessionFilter::default(),
            session_windows: None,
            max_threads: None,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            presets: Vec::new(),
        }
    }
}

/// Session boundaries as "HH:MM" strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionWindowsConfig {
    pub opening_start: String,
    pub midday_start: String,
    pub power_start: String,
    pub close: String,
}

impl Default for SessionWindowsConfig {
    fn default() -> Self {
        Self {
            opening_start: "09:30".into(),
            midday_start: "11:00".into(),
            power_start: "15:00".into(),
            close: "16:00".into(),
        }
    }
}

impl SessionWindowsConfig {
    pub fn parse(&self) -> Result<SessionWindows, ConfigError> {
        let windows = SessionWindows {
            opening_start: parse_time("opening_start", &self.opening_start)?,
            midday_start: parse_time("midday_start", &self.midday_start)?,
            power_start: parse_time("power_start", &self.power_start)?,
            close: parse_time("close", &self.close)?,
        };
        windows.validate()?;
        Ok(windows)
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| ConfigError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// A custom preset definition. Mandatory checks default to off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PresetConfig {
    pub name: String,
    pub min_actionable_score: u32,
    pub volume_multiplier: f64,
    #[serde(default)]
    pub require_vwap_event: bool,
    #[serde(default)]
    pub require_rsi_event: bool,
    #[serde(default)]
    pub require_macd_turn: bool,
    #[serde(default)]
    pub require_volume: bool,
}

impl PresetConfig {
    pub fn build(&self) -> Result<Preset, ConfigError> {
        let mandatory = MandatoryChecks {
            vwap_event: self.require_vwap_event,
            rsi_event: self.require_rsi_event,
            macd_turn: self.require_macd_turn,
            volume: self.require_volume,
        };
        Preset::new(
            self.name.clone(),
            self.min_actionable_score,
            self.volume_multiplier,
            mandatory,
        )
        .map_err(|source| ConfigError::Preset {
            name: self.name.clone(),
            source,
        })
    }
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_bars == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if self.max_threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if self.alert_threshold > 100 {
            return Err(ConfigError::ThresholdOutOfRange(self.alert_threshold));
        }
        self.classifier()?;
        self.registry()?;
        Ok(())
    }

    /// Built-in presets plus every `[[presets]]` entry.
    pub fn registry(&self) -> Result<PresetRegistry, ConfigError> {
        let mut registry = PresetRegistry::new();
        for preset in &self.presets {
            registry.register(preset.build()?);
        }
        Ok(registry)
    }

    pub fn classifier(&self) -> Result<RegularHours, ConfigError> {
        match &self.session_windows {
            Some(windows) => Ok(RegularHours::new(windows.parse()?)?),
            None => Ok(RegularHours::default()),
        }
    }

    /// The configured preset, or "Cleaner signals" when the name is unknown.
    pub fn resolve_preset(&self) -> Result<Preset, ConfigError> {
        let registry = self.registry()?;
        if registry.get(&self.preset).is_none() {
            warn!(
                preset = %self.preset,
                fallback = DEFAULT_PRESET,
                "unknown preset, using fallback"
            );
        }
        Ok(registry.lookup(&self.preset).clone())
    }

    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        Ok(EngineConfig {
            preset: self.resolve_preset()?,
            sessions: self.sessions,
            lookback_bars: self.lookback_bars,
        })
    }

    pub fn build_engine(&self) -> Result<SignalEngine, ConfigError> {
        Ok(SignalEngine::with_classifier(
            self.engine_config()?,
            self.classifier()?,
        ))
    }

    /// BLAKE3 over the canonical JSON form of this config.
    ///
    /// Two scans with identical configs share a hash, so a report can be
    /// traced back to the exact settings that produced it.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
