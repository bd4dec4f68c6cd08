//! Severity and routing policy.
//!
//! Urgency is expressed only through the delay before initial assessment; the
//! event queue itself is never reordered.

use super::event::ArrivalChannel;
use crate::sim::{ConfigError, ErConfig, check_probabilities};
use serde::{Deserialize, Serialize};

/// Severity above which a patient skips the assessment wait.
pub const SEVERITY_THRESHOLD: f64 = 8.0;
/// Multiplier applied to ambulance patients' drawn severity.
pub const AMBULANCE_SEVERITY: f64 = 1.25;
/// Minimum duration of any process, in minutes.
pub const MIN_DURATION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Urgent,
    Routine,
}

impl Urgency {
    /// A severity exactly at the threshold is routine.
    pub fn from_severity(severity: f64) -> Self {
        if severity > SEVERITY_THRESHOLD {
            Urgency::Urgent
        } else {
            Urgency::Routine
        }
    }
}

pub fn effective_severity(drawn: f64, channel: ArrivalChannel) -> f64 {
    match channel {
        ArrivalChannel::WalkIn => drawn,
        ArrivalChannel::Ambulance => drawn * AMBULANCE_SEVERITY,
    }
}

/// Floor a drawn duration at `MIN_DURATION`. NaN also maps to the floor.
pub fn floor_duration(minutes: f64) -> f64 {
    minutes.max(MIN_DURATION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpOutcome {
    Admit,
    Specialist,
    DirectExit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingPolicy {
    admit_probability: f64,
    specialist_probability: f64,
}

impl RoutingPolicy {
    pub fn new(admit_probability: f64, specialist_probability: f64) -> Result<Self, ConfigError> {
        check_probabilities(admit_probability, specialist_probability)?;
        Ok(Self {
            admit_probability,
            specialist_probability,
        })
    }

    /// `cfg` must already have passed `ErConfig::validate`.
    pub(crate) fn from_config(cfg: &ErConfig) -> Self {
        Self {
            admit_probability: cfg.admit_probability,
            specialist_probability: cfg.specialist_probability,
        }
    }

    /// Partition of a uniform draw `u` in `[0, 1)`:
    /// `(.., p_admit]` admits, `(p_admit, p_admit + p_specialist]` loops back
    /// through a specialist cycle, anything above exits directly.
    pub fn outcome(&self, u: f64) -> FollowUpOutcome {
        if u <= self.admit_probability {
            FollowUpOutcome::Admit
        } else if u <= self.admit_probability + self.specialist_probability {
            FollowUpOutcome::Specialist
        } else {
            FollowUpOutcome::DirectExit
        }
    }
}
