//! Core constants for the door lock controller.
//!
//! Defaults for every tunable in [`ControllerConfig`](crate::ControllerConfig)
//! live here, together with the fixed text shown on the LCD. The values were
//! taken from the deployed lock units and match their observed behaviour.
//!
//! # Keypad Layout
//!
//! The controller is built for a 4x4 membrane keypad:
//!
//! ```text
//! 1 2 3 A
//! 4 5 6 B
//! 7 8 9 C
//! * 0 # D
//! ```
//!
//! `*` resets the entry, `#` submits the current stage and `D` requests a
//! forced open. `A`, `B` and `C` are unassigned and ignored.
//!
//! # Usage
//!
//! ```
//! use doorlock_core::constants::*;
//!
//! assert_eq!(DEFAULT_CODE_LEN, 4);
//! assert!(DEFAULT_CLEAR_PATH_THRESHOLD_CM < DEFAULT_OBSTRUCTION_RANGE_CM);
//! ```

// ============================================================================
// Entry Limits
// ============================================================================

/// Maximum number of digits accepted for an identifier.
///
/// Digits pressed once the identifier is full are dropped silently.
///
/// # Value: 8 digits
pub const DEFAULT_MAX_ID_LEN: usize = 8;

/// Exact number of digits a passcode must have to be submitted.
///
/// # Value: 4 digits
pub const DEFAULT_CODE_LEN: usize = 4;

// ============================================================================
// Reserved Keys
// ============================================================================

/// Key that clears the entry and returns to the identifier prompt.
pub const DEFAULT_RESET_KEY: char = '*';

/// Key that completes the current entry stage.
pub const DEFAULT_SUBMIT_KEY: char = '#';

/// Key that requests a forced open, gated by the clear-path check.
pub const DEFAULT_FORCE_OPEN_KEY: char = 'D';

// ============================================================================
// Rangefinder Thresholds
// ============================================================================

/// Minimum distance (centimeters) treated as a clear path for a forced open.
///
/// A reading at or beyond this distance, or no echo at all, allows the
/// override to unlock.
///
/// # Value: 26 cm
pub const DEFAULT_CLEAR_PATH_THRESHOLD_CM: f32 = 26.0;

/// Distance (centimeters) below which an object counts as an obstruction
/// for telemetry purposes.
///
/// # Value: 30 cm
pub const DEFAULT_OBSTRUCTION_RANGE_CM: f32 = 30.0;

// ============================================================================
// Timing
// ============================================================================

/// Minimum gap between two obstruction alerts (milliseconds).
///
/// # Value: 500 ms
pub const DEFAULT_COOLDOWN_MS: u64 = 500;

/// How long a transient message stays on the LCD (milliseconds).
///
/// # Value: 800 ms
pub const DEFAULT_MESSAGE_DURATION_MS: u64 = 800;

/// Default relock grace period when relocking is enabled (milliseconds).
///
/// # Value: 5000 ms
pub const DEFAULT_RELOCK_GRACE_MS: u64 = 5_000;

// ============================================================================
// Display
// ============================================================================

/// Number of lines on the character LCD.
pub const LCD_LINES: usize = 2;

/// Number of characters per LCD line.
pub const LCD_COLUMNS: usize = 16;

/// Prompt shown while capturing the identifier.
pub const PROMPT_ENTER_ID: &str = "Enter ID:";

/// Prompt shown while capturing the passcode.
pub const PROMPT_ENTER_CODE: &str = "Enter Code:";

// ============================================================================
// Transient Messages
// ============================================================================

/// Shown when `#` is pressed with an empty identifier.
pub const MSG_ENTER_ID_FIRST: &str = "Enter ID first";

/// Shown after a verification request has been sent.
pub const MSG_CHECKING: &str = "Checking...";

/// Shown when a passcode is submitted with the wrong length.
pub const MSG_INCOMPLETE: &str = "Incomplete";

/// Shown when a forced open unlocks the door.
pub const MSG_FORCE_OPEN: &str = "Force Open";

/// Shown when a forced open is refused because the path is blocked.
pub const MSG_OBJECT_DETECTED: &str = "Object Detected";

/// Shown when the host accepts the submitted credentials.
pub const MSG_ACCESS_GRANTED: &str = "Access Granted";

/// Shown when the host rejects the submitted passcode.
pub const MSG_WRONG_CODE: &str = "Wrong Code";

/// Shown when the host has no record for the submitted identifier.
pub const MSG_UNKNOWN_ID: &str = "Unknown ID";

/// Shown when the host failed to evaluate the request.
pub const MSG_HOST_ERROR: &str = "Host Error";
