//! Run configuration for the emergency-department model.
//!
//! Rates are patients per minute, durations are mean minutes. Every field has a
//! default so a JSON config file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErConfig {
    /// Walk-in arrivals per minute
    pub walkin_rate: f64,
    /// Ambulance arrivals per minute
    pub ambulance_rate: f64,
    pub mean_triage_duration: f64,
    pub mean_initial_assessment_duration: f64,
    pub mean_test_duration: f64,
    pub mean_follow_up_duration: f64,
    pub mean_hospital_stay: f64,
    pub mean_severity: f64,
    pub severity_std_dev: f64,
    /// Coefficient of variation for every normally distributed service time
    pub duration_cv: f64,
    pub doctors: u32,
    pub nurses: u32,
    pub exam_rooms: u32,
    pub labs: u32,
    pub hospital_rooms: u32,
    /// Capacity of the active-patient pool
    pub max_patients: u32,
    pub admit_probability: f64,
    pub specialist_probability: f64,
    pub goal_patients: u64,
    pub seed: Option<u64>,
}

impl Default for ErConfig {
    fn default() -> Self {
        Self {
            walkin_rate: 0.05,
            ambulance_rate: 0.01,
            mean_triage_duration: 5.0,
            mean_initial_assessment_duration: 10.0,
            mean_test_duration: 15.0,
            mean_follow_up_duration: 10.0,
            mean_hospital_stay: 240.0,
            mean_severity: 5.0,
            severity_std_dev: 2.0,
            duration_cv: 0.25,
            doctors: 10,
            nurses: 5,
            exam_rooms: 10,
            labs: 10,
            hospital_rooms: 20,
            max_patients: 100,
            admit_probability: 0.2,
            specialist_probability: 0.1,
            goal_patients: 100,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a positive rate with a finite mean interarrival time, got {value}")]
    NonPositiveRate { field: &'static str, value: f64 },

    #[error("{field} must be a positive duration in minutes, got {value}")]
    NonPositiveDuration { field: &'static str, value: f64 },

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidSpread { field: &'static str, value: f64 },

    #[error("{field} must be greater than 0")]
    ZeroCapacity { field: &'static str },

    #[error("goal_patients must be greater than 0")]
    ZeroGoal,

    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("admit_probability + specialist_probability must be below 1.0, got {admit} + {specialist}")]
    ProbabilitySum { admit: f64, specialist: f64 },
}

impl ConfigError {
    /// Probability errors get their own exit code at the CLI boundary.
    pub fn is_probability(&self) -> bool {
        matches!(
            self,
            ConfigError::ProbabilityOutOfRange { .. } | ConfigError::ProbabilitySum { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("malformed override {0:?} (expected key=value)")]
    BadOverride(String),
}

impl ErConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Apply textual `key=value` overrides. Values are read as JSON scalars, so
    /// `seed=null` clears the seed.
    pub fn with_overrides<K: AsRef<str>, V: AsRef<str>>(
        &self,
        overrides: &[(K, V)],
    ) -> Result<Self, ConfigLoadError> {
        let mut value = serde_json::to_value(self)?;
        let Value::Object(fields) = &mut value else {
            unreachable!("ErConfig serializes to an object");
        };
        for (key, raw) in overrides {
            let key = key.as_ref();
            let raw = raw.as_ref();
            let slot = fields
                .get_mut(key)
                .ok_or_else(|| ConfigLoadError::UnknownKey(key.to_string()))?;
            *slot = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse one `key=value key=value ...` line into override pairs.
    pub fn parse_override_line(line: &str) -> Result<Vec<(String, String)>, ConfigLoadError> {
        line.split_whitespace()
            .map(|tok| match tok.split_once('=') {
                Some((k, v)) if !k.is_empty() && !v.is_empty() => {
                    Ok((k.to_string(), v.to_string()))
                }
                _ => Err(ConfigLoadError::BadOverride(tok.to_string())),
            })
            .collect()
    }

    pub fn mean_walkin_interarrival(&self) -> f64 {
        1.0 / self.walkin_rate
    }

    pub fn mean_ambulance_interarrival(&self) -> f64 {
        1.0 / self.ambulance_rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("walkin_rate", self.walkin_rate),
            ("ambulance_rate", self.ambulance_rate),
        ] {
            // 过小的速率取倒数后溢出为 inf
            if !(value.is_finite() && value > 0.0 && value.recip().is_finite()) {
                return Err(ConfigError::NonPositiveRate { field, value });
            }
        }

        for (field, value) in [
            ("mean_triage_duration", self.mean_triage_duration),
            ("mean_initial_assessment_duration", self.mean_initial_assessment_duration),
            ("mean_test_duration", self.mean_test_duration),
            ("mean_follow_up_duration", self.mean_follow_up_duration),
            ("mean_hospital_stay", self.mean_hospital_stay),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDuration { field, value });
            }
        }

        if !self.mean_severity.is_finite() {
            return Err(ConfigError::InvalidSpread {
                field: "mean_severity",
                value: self.mean_severity,
            });
        }
        for (field, value) in [
            ("severity_std_dev", self.severity_std_dev),
            ("duration_cv", self.duration_cv),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidSpread { field, value });
            }
        }

        for (field, value) in [
            ("doctors", self.doctors),
            ("nurses", self.nurses),
            ("exam_rooms", self.exam_rooms),
            ("labs", self.labs),
            ("hospital_rooms", self.hospital_rooms),
            ("max_patients", self.max_patients),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCapacity { field });
            }
        }

        if self.goal_patients == 0 {
            return Err(ConfigError::ZeroGoal);
        }

        check_probabilities(self.admit_probability, self.specialist_probability)
    }
}

/// Follow-up probabilities: each in `[0, 1]`, sum strictly below 1.
pub fn check_probabilities(admit: f64, specialist: f64) -> Result<(), ConfigError> {
    for (field, value) in [
        ("admit_probability", admit),
        ("specialist_probability", specialist),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ProbabilityOutOfRange { field, value });
        }
    }
    if admit + specialist >= 1.0 {
        return Err(ConfigError::ProbabilitySum { admit, specialist });
    }
    Ok(())
}
