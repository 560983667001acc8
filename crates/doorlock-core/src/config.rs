//! Controller configuration.
//!
//! The deployed lock units differ in entry protocol, rangefinder thresholds
//! and relock behaviour. All of those differences are expressed here so the
//! controller logic stays free of per-unit constants.
//!
//! # Examples
//!
//! ```
//! use doorlock_core::{ControllerConfig, Protocol};
//!
//! let config = ControllerConfig {
//!     protocol: Protocol::SingleCode,
//!     code_len: 6,
//!     ..ControllerConfig::default()
//! };
//! config.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLEAR_PATH_THRESHOLD_CM, DEFAULT_CODE_LEN, DEFAULT_COOLDOWN_MS,
    DEFAULT_FORCE_OPEN_KEY, DEFAULT_MAX_ID_LEN, DEFAULT_MESSAGE_DURATION_MS,
    DEFAULT_OBSTRUCTION_RANGE_CM, DEFAULT_RESET_KEY, DEFAULT_SUBMIT_KEY,
};
use crate::types::KeyAction;
use crate::{Error, Result};

/// Entry protocol spoken to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// Passcode only, sent as `CODE:<passcode>`.
    SingleCode,

    /// Identifier then passcode, sent as `CHECK:<identifier>:<passcode>`.
    #[default]
    IdentifierAndCode,
}

/// Door-contact driven relock behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelockPolicy {
    /// Never relock automatically.
    #[default]
    Disabled,

    /// Relock once the door has been sensed closed while unlocked for at
    /// least `grace_ms`. Never in the tick of a force open.
    AfterGrace { grace_ms: u64 },
}

/// Assignment of the reserved control keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub reset: char,
    pub submit: char,
    pub force_open: char,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            reset: DEFAULT_RESET_KEY,
            submit: DEFAULT_SUBMIT_KEY,
            force_open: DEFAULT_FORCE_OPEN_KEY,
        }
    }
}

impl KeyMap {
    /// Classify a printed key character.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::{KeyAction, KeyMap};
    ///
    /// let keys = KeyMap::default();
    /// assert_eq!(keys.classify('7'), KeyAction::Digit('7'));
    /// assert_eq!(keys.classify('#'), KeyAction::Submit);
    /// assert_eq!(keys.classify('A'), KeyAction::Ignored);
    /// ```
    #[must_use]
    pub fn classify(&self, key: char) -> KeyAction {
        if key == self.reset {
            KeyAction::Reset
        } else if key == self.submit {
            KeyAction::Submit
        } else if key == self.force_open {
            KeyAction::ForceOpen
        } else if key.is_ascii_digit() {
            KeyAction::Digit(key)
        } else {
            KeyAction::Ignored
        }
    }

    fn validate(&self) -> Result<()> {
        let assigned = [
            ("reset", self.reset),
            ("submit", self.submit),
            ("force_open", self.force_open),
        ];

        for (name, key) in assigned {
            if key.is_ascii_digit() {
                return Err(Error::Config(format!(
                    "{name} key must not be a digit, got '{key}'"
                )));
            }
        }

        for (i, (first, a)) in assigned.iter().enumerate() {
            if let Some((second, _)) = assigned[i + 1..].iter().find(|(_, b)| b == a) {
                return Err(Error::KeyConflict {
                    key: *a,
                    first: *first,
                    second: *second,
                });
            }
        }

        Ok(())
    }
}

/// Tunables for one lock unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub protocol: Protocol,
    pub clear_path_threshold_cm: f32,
    pub obstruction_range_cm: f32,
    pub cooldown_ms: u64,
    pub max_id_len: usize,
    pub code_len: usize,
    pub message_duration_ms: u64,
    pub keys: KeyMap,
    pub relock: RelockPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            clear_path_threshold_cm: DEFAULT_CLEAR_PATH_THRESHOLD_CM,
            obstruction_range_cm: DEFAULT_OBSTRUCTION_RANGE_CM,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            max_id_len: DEFAULT_MAX_ID_LEN,
            code_len: DEFAULT_CODE_LEN,
            message_duration_ms: DEFAULT_MESSAGE_DURATION_MS,
            keys: KeyMap::default(),
            relock: RelockPolicy::default(),
        }
    }
}

impl ControllerConfig {
    /// Check the configuration for values the controller cannot run with.
    ///
    /// # Errors
    /// Returns `Error::Config` or `Error::KeyConflict` describing the first
    /// problem found.
    pub fn validate(&self) -> Result<()> {
        if self.code_len == 0 {
            return Err(Error::Config("code_len must be at least 1".to_string()));
        }
        if self.max_id_len == 0 {
            return Err(Error::Config("max_id_len must be at least 1".to_string()));
        }
        if self.message_duration_ms == 0 {
            return Err(Error::Config(
                "message_duration_ms must be greater than zero".to_string(),
            ));
        }
        for (name, value) in [
            ("clear_path_threshold_cm", self.clear_path_threshold_cm),
            ("obstruction_range_cm", self.obstruction_range_cm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        self.keys.validate()
    }
}
