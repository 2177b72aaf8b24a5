//! Driver settings
//!
//! Gameplay constants are fixed in `consts`; these only control how the
//! native driver runs a session. Stored as JSON.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::SkillChoice;

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "malformed settings json: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed; `None` derives one from the clock
    pub seed: Option<u64>,
    /// Stop the driver after this many ticks
    pub max_ticks: u64,
    /// Let the built-in pilot play
    pub autopilot: bool,
    /// Skill picked whenever the menu comes up
    pub preferred_skill: SkillChoice,
    /// Cap on ticks simulated per frame
    pub max_substeps: u32,
    /// Log a snapshot summary every N ticks (0 = never)
    pub snapshot_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 15_000,
            autopilot: true,
            preferred_skill: SkillChoice::Reflector,
            max_substeps: crate::consts::MAX_SUBSTEPS,
            snapshot_every: 500,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Like `load`, but any failure falls back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_ticks == 0 {
            return Err(SettingsError::Invalid {
                field: "max_ticks",
                reason: "must be at least 1",
            });
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid {
                field: "max_substeps",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "preferred_skill": "Patroller" }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.preferred_skill, SkillChoice::Patroller);
        assert_eq!(settings.max_ticks, Settings::default().max_ticks);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: Some(99),
            autopilot: false,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_zero_substeps() {
        let err = Settings::from_json(r#"{ "max_substeps": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "max_substeps", .. }));
        assert!(err.to_string().contains("max_substeps"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }
}
