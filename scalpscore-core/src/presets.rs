//! Preset registry: immutable, validated scoring configurations.
//!
//! Two built-ins ship with the engine: "Fast scalp" and "Cleaner signals".
//! Looking up an unknown name never fails; it resolves to "Cleaner signals".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Factor;

pub const FAST_SCALP: &str = "Fast scalp";
pub const CLEANER_SIGNALS: &str = "Cleaner signals";

/// Name the registry falls back to for unknown lookups.
pub const DEFAULT_PRESET: &str = CLEANER_SIGNALS;

#[derive(Debug, Error, PartialEq)]
pub enum PresetError {
    #[error("preset name must not be empty")]
    EmptyName,
    #[error("minimum actionable score {0} is outside 0..=100")]
    ScoreOutOfRange(u32),
    #[error("volume multiplier must be finite and positive, got {0}")]
    InvalidVolumeMultiplier(f64),
}

/// Confirmation categories a preset can require before any direction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryChecks {
    pub vwap_event: bool,
    pub rsi_event: bool,
    pub macd_turn: bool,
    pub volume: bool,
}

impl MandatoryChecks {
    pub const NONE: MandatoryChecks = MandatoryChecks {
        vwap_event: false,
        rsi_event: false,
        macd_turn: false,
        volume: false,
    };

    /// Mandatory categories in gating order.
    pub fn required(&self) -> impl Iterator<Item = Factor> + '_ {
        [
            (Factor::Vwap, self.vwap_event),
            (Factor::Rsi, self.rsi_event),
            (Factor::Macd, self.macd_turn),
            (Factor::Volume, self.volume),
        ]
        .into_iter()
        .filter_map(|(factor, required)| required.then_some(factor))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    name: String,
    min_actionable_score: u32,
    volume_multiplier: f64,
    mandatory: MandatoryChecks,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        min_actionable_score: u32,
        volume_multiplier: f64,
        mandatory: MandatoryChecks,
    ) -> Result<Self, PresetError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PresetError::EmptyName);
        }
        if min_actionable_score > 100 {
            return Err(PresetError::ScoreOutOfRange(min_actionable_score));
        }
        if !volume_multiplier.is_finite() || volume_multiplier <= 0.0 {
            return Err(PresetError::InvalidVolumeMultiplier(volume_multiplier));
        }
        Ok(Self {
            name,
            min_actionable_score,
            volume_multiplier,
            mandatory,
        })
    }

    /// More frequent triggers, volume confirmation optional.
    pub fn fast_scalp() -> Self {
        Self {
            name: FAST_SCALP.into(),
            min_actionable_score: 70,
            volume_multiplier: 1.15,
            mandatory: MandatoryChecks {
                vwap_event: true,
                rsi_event: true,
                macd_turn: true,
                volume: false,
            },
        }
    }

    /// Fewer, higher-conviction triggers; volume confirmation mandatory.
    pub fn cleaner_signals() -> Self {
        Self {
            name: CLEANER_SIGNALS.into(),
            min_actionable_score: 80,
            volume_multiplier: 1.35,
            mandatory: MandatoryChecks {
                vwap_event: true,
                rsi_event: true,
                macd_turn: true,
                volume: true,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_actionable_score(&self) -> u32 {
        self.min_actionable_score
    }

    pub fn volume_multiplier(&self) -> f64 {
        self.volume_multiplier
    }

    pub fn mandatory(&self) -> &MandatoryChecks {
        &self.mandatory
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::cleaner_signals()
    }
}

/// Built-in presets plus any registered custom presets.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<Preset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self {
            presets: vec![Preset::fast_scalp(), Preset::cleaner_signals()],
        }
    }

    /// Add a custom preset, replacing any existing one with the same name.
    pub fn register(&mut self, preset: Preset) {
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    /// Exact-name lookup; `None` when unknown.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Lookup that never fails: unknown names resolve to "Cleaner signals".
    pub fn lookup(&self, name: &str) -> &Preset {
        self.get(name)
            .or_else(|| self.get(DEFAULT_PRESET))
            .unwrap_or(&self.presets[0])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a built-in preset by name, falling back to "Cleaner signals".
pub fn preset_for(name: &str) -> Preset {
    match name {
        FAST_SCALP => Preset::fast_scalp(),
        _ => Preset::cleaner_signals(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micro_structure_is_never_mandatory() {
        let all = MandatoryChecks {
            vwap_event: true,
            rsi_event: true,
            macd_turn: true,
            volume: true,
        };
        let required: Vec<Factor> = all.required().collect();
        assert_eq!(
            required,
            vec![Factor::Vwap, Factor::Rsi, Factor::Macd, Factor::Volume]
        );
        assert!(!required.contains(&Factor::MicroStructure));
    }

    #[test]
    fn builtin_values() {
        let fast = Preset::fast_scalp();
        assert_eq!(fast.min_actionable_score(), 70);
        assert_eq!(fast.volume_multiplier(), 1.15);
        assert!(!fast.mandatory().volume);

        let clean = Preset::cleaner_signals();
        assert_eq!(clean.min_actionable_score(), 80);
        assert_eq!(clean.volume_multiplier(), 1.35);
        assert!(clean.mandatory().volume);

        for p in [&fast, &clean] {
            let m = p.mandatory();
            assert!(m.vwap_event && m.rsi_event && m.macd_turn);
        }
    }

    #[test]
    fn unknown_name_falls_back_to_cleaner() {
        assert_eq!(preset_for("Turbo"), Preset::cleaner_signals());
        assert_eq!(preset_for(""), Preset::cleaner_signals());
        assert_eq!(preset_for(FAST_SCALP), Preset::fast_scalp());

        let registry = PresetRegistry::new();
        assert_eq!(registry.lookup("nope").name(), CLEANER_SIGNALS);
        assert_eq!(registry.lookup(FAST_SCALP).name(), FAST_SCALP);
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = PresetRegistry::new();
        assert_eq!(registry.lookup("fast scalp").name(), CLEANER_SIGNALS);
    }

    #[test]
    fn custom_preset_validation() {
        assert_eq!(
            Preset::new("", 50, 1.0, MandatoryChecks::NONE),
            Err(PresetError::EmptyName)
        );
        assert_eq!(
            Preset::new("x", 101, 1.0, MandatoryChecks::NONE),
            Err(PresetError::ScoreOutOfRange(101))
        );
        assert!(matches!(
            Preset::new("x", 50, 0.0, MandatoryChecks::NONE),
            Err(PresetError::InvalidVolumeMultiplier(_))
        ));
        assert!(matches!(
            Preset::new("x", 50, f64::NAN, MandatoryChecks::NONE),
            Err(PresetError::InvalidVolumeMultiplier(_))
        ));
        assert!(Preset::new("x", 100, 2.0, MandatoryChecks::NONE).is_ok());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = PresetRegistry::new();
        let loose = Preset::new("Loose", 40, 1.0, MandatoryChecks::NONE).unwrap();
        registry.register(loose.clone());
        assert_eq!(registry.lookup("Loose"), &loose);

        let stricter = Preset::new("Loose", 60, 1.0, MandatoryChecks::NONE).unwrap();
        registry.register(stricter);
        assert_eq!(registry.lookup("Loose").min_actionable_score(), 60);
        assert_eq!(registry.names().count(), 3);
    }

    #[test]
    fn mandatory_order_is_fixed() {
        let all = MandatoryChecks {
            vwap_event: true,
            rsi_event: true,
            macd_turn: true,
            volume: true,
        };
        let order: Vec<Factor> = all.required().collect();
        assert_eq!(
            order,
            vec![Factor::Vwap, Factor::Rsi, Factor::Macd, Factor::Volume]
        );
        assert_eq!(MandatoryChecks::NONE.required().count(), 0);
    }
}
