//! Force-open override.
//!
//! The reserved force-open key unlocks the door without credentials, but
//! only when the rangefinder sees a clear path. A missing echo counts as a
//! clear path, so a dead sensor lets the override through.

use doorlock_core::constants::{MSG_FORCE_OPEN, MSG_OBJECT_DETECTED};
use doorlock_core::{DistanceReading, LockState};
use doorlock_hardware::{LockDevice, RangeFinderDevice};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::actuation::drive_lock;
use crate::screen::Screen;

/// What the override decided for one key press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideOutcome {
    /// Path clear, unlock commanded and acknowledged.
    Opened(DistanceReading),

    /// Path clear, but the actuator rejected the unlock.
    ActuatorFailed(DistanceReading),

    /// Something is closer than the clear-path threshold.
    Obstructed(DistanceReading),
}

impl OverrideOutcome {
    pub fn reading(&self) -> DistanceReading {
        match self {
            OverrideOutcome::Opened(r)
            | OverrideOutcome::ActuatorFailed(r)
            | OverrideOutcome::Obstructed(r) => *r,
        }
    }
}

/// Distance-gated force-open handler.
///
/// # Examples
///
/// ```
/// use doorlock_controller::OverrideController;
/// use doorlock_core::DistanceReading;
///
/// let gate = OverrideController::new(26.0);
/// assert!(gate.is_path_clear(DistanceReading::NoEcho));
/// assert!(gate.is_path_clear(DistanceReading::Echo(26.0)));
/// assert!(!gate.is_path_clear(DistanceReading::Echo(10.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideController {
    clear_path_threshold_cm: f32,
}

impl OverrideController {
    pub fn new(clear_path_threshold_cm: f32) -> Self {
        Self {
            clear_path_threshold_cm,
        }
    }

    pub fn is_path_clear(&self, reading: DistanceReading) -> bool {
        reading.is_clear_of(self.clear_path_threshold_cm)
    }

    /// Handle one press of the force-open key.
    ///
    /// Takes a single measurement. A clear path unlocks regardless of the
    /// door contact. The entry prompt, including any digits already typed,
    /// comes back after the message.
    pub fn on_force_key(
        &self,
        range_finder: &mut dyn RangeFinderDevice,
        lock: &mut dyn LockDevice,
        lock_state: &mut LockState,
        screen: &mut Screen,
        now_ms: u64,
    ) -> OverrideOutcome {
        let reading = range_finder.measure_distance();

        if !self.is_path_clear(reading) {
            info!(%reading, threshold_cm = self.clear_path_threshold_cm, "Force open refused, object detected");
            screen.show_transient(MSG_OBJECT_DETECTED, now_ms);
            return OverrideOutcome::Obstructed(reading);
        }

        if !drive_lock(lock, lock_state, LockState::Unlocked) {
            return OverrideOutcome::ActuatorFailed(reading);
        }

        info!(%reading, "Force open");
        screen.show_transient(MSG_FORCE_OPEN, now_ms);
        OverrideOutcome::Opened(reading)
    }
}
