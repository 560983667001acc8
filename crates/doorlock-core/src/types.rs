use crate::{
    Result,
    constants::{PROMPT_ENTER_CODE, PROMPT_ENTER_ID},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which accumulator receives digit input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStage {
    /// Digits go to the identifier.
    CapturingId,

    /// Digits go to the passcode.
    CapturingCode,
}

impl EntryStage {
    /// Prompt text shown on the first LCD line for this stage.
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self {
            EntryStage::CapturingId => PROMPT_ENTER_ID,
            EntryStage::CapturingCode => PROMPT_ENTER_CODE,
        }
    }
}

impl fmt::Display for EntryStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryStage::CapturingId => write!(f, "CapturingId"),
            EntryStage::CapturingCode => write!(f, "CapturingCode"),
        }
    }
}

/// Bounded accumulator for keypad digits.
///
/// Digits beyond the capacity are dropped rather than queued, so the
/// length can never exceed `capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: String,
    capacity: usize,
}

impl DigitBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            digits: String::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a digit if there is room.
    ///
    /// Returns `true` when the digit was accepted. Non-digit characters are
    /// never accepted.
    pub fn push(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || self.is_full() {
            return false;
        }
        self.digits.push(digit);
        true
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

/// Numeric identifier submitted with a verification request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from a digit string.
    ///
    /// # Errors
    /// Returns `Error::InvalidIdentifier` if the value is empty or contains
    /// anything other than ASCII digits.
    pub fn new(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::InvalidIdentifier("identifier is empty".to_string()));
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidIdentifier(format!(
                "identifier must be digits only, got {value:?}"
            )));
        }
        Ok(Identifier(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-length numeric passcode.
///
/// `Debug` output is redacted so passcodes never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passcode(String);

impl Passcode {
    /// Create a passcode that must be exactly `expected_len` digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidPasscode` on a length mismatch or non-digit input.
    pub fn new(value: &str, expected_len: usize) -> Result<Self> {
        if value.len() != expected_len {
            return Err(Error::InvalidPasscode(format!(
                "passcode must be {expected_len} digits, got {}",
                value.len()
            )));
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidPasscode(
                "passcode must be digits only".to_string(),
            ));
        }
        Ok(Passcode(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Passcode({})", "*".repeat(self.0.len()))
    }
}

/// Completed entry ready to be sent to the host.
///
/// Produced once per entry cycle and consumed by the serial transport.
/// `identifier` is absent for the single-code protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    identifier: Option<Identifier>,
    passcode: Passcode,
}

impl VerificationRequest {
    /// Request carrying both an identifier and a passcode.
    #[must_use]
    pub fn new(identifier: Identifier, passcode: Passcode) -> Self {
        Self {
            identifier: Some(identifier),
            passcode,
        }
    }

    /// Request carrying only a passcode.
    #[must_use]
    pub fn code_only(passcode: Passcode) -> Self {
        Self {
            identifier: None,
            passcode,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    #[must_use]
    pub fn passcode(&self) -> &Passcode {
        &self.passcode
    }
}

/// Logical state of the lock mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    #[default]
    Locked,
    Unlocked,
}

impl LockState {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked)
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LockState::Locked => write!(f, "Locked"),
            LockState::Unlocked => write!(f, "Unlocked"),
        }
    }
}

/// Result of a single rangefinder measurement.
///
/// `NoEcho` means nothing reflected the pulse within the measurement bound.
/// It is distinct from an object right in front of the sensor and must never
/// be treated as a zero distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceReading {
    NoEcho,
    Echo(f32),
}

impl DistanceReading {
    /// Create an echo reading in centimeters.
    ///
    /// # Errors
    /// Returns `Error::InvalidDistance` for negative or non-finite values.
    pub fn echo(centimeters: f32) -> Result<Self> {
        if !centimeters.is_finite() || centimeters < 0.0 {
            return Err(Error::InvalidDistance(format!(
                "distance must be a non-negative number of centimeters, got {centimeters}"
            )));
        }
        Ok(DistanceReading::Echo(centimeters))
    }

    #[must_use]
    pub fn centimeters(&self) -> Option<f32> {
        match self {
            DistanceReading::NoEcho => None,
            DistanceReading::Echo(cm) => Some(*cm),
        }
    }

    /// Whether an object was detected closer than `range_cm`.
    #[must_use]
    pub fn is_within(&self, range_cm: f32) -> bool {
        matches!(self, DistanceReading::Echo(cm) if *cm < range_cm)
    }

    /// Whether the path is clear at `threshold_cm`.
    ///
    /// No echo counts as clear.
    #[must_use]
    pub fn is_clear_of(&self, threshold_cm: f32) -> bool {
        match self {
            DistanceReading::NoEcho => true,
            DistanceReading::Echo(cm) => *cm >= threshold_cm,
        }
    }
}

impl fmt::Display for DistanceReading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DistanceReading::NoEcho => write!(f, "no echo"),
            DistanceReading::Echo(cm) => write!(f, "{cm:.1}cm"),
        }
    }
}

/// Rate limiter for one class of telemetry.
///
/// Holds the timestamp of the last emission. Two emissions are always more
/// than `interval_ms` apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownTimer {
    interval_ms: u64,
    last_emission: Option<u64>,
}

impl CooldownTimer {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emission: None,
        }
    }

    /// Whether an emission at `now_ms` would respect the cooldown.
    #[must_use]
    pub fn is_ready(&self, now_ms: u64) -> bool {
        self.last_emission
            .is_none_or(|last| now_ms.saturating_sub(last) > self.interval_ms)
    }

    /// Record an emission at `now_ms` if the cooldown allows it.
    ///
    /// Returns `true` when the caller should emit.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if !self.is_ready(now_ms) {
            return false;
        }
        self.last_emission = Some(now_ms);
        true
    }

    #[must_use]
    pub fn last_emission(&self) -> Option<u64> {
        self.last_emission
    }

    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

/// What a key press means to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Digit(char),
    Reset,
    Submit,
    ForceOpen,
    Ignored,
}
