//! Pairing of logical lock state with actuator commands.

use doorlock_core::LockState;
use doorlock_hardware::LockDevice;
use tracing::{info, warn};

/// Command the mechanism to `target` and record the new logical state.
///
/// The command is always sent, even if `state` already equals `target`.
/// On failure the logical state is left alone so it never claims a position
/// the mechanism was not driven to. Returns whether the command succeeded.
pub fn drive_lock(lock: &mut dyn LockDevice, state: &mut LockState, target: LockState) -> bool {
    let result = match target {
        LockState::Locked => lock.lock(),
        LockState::Unlocked => lock.unlock(),
    };

    match result {
        Ok(()) => {
            if *state != target {
                info!(from = %state, to = %target, "Lock state changed");
            }
            *state = target;
            true
        }
        Err(e) => {
            warn!(error = %e, target = %target, "Lock actuator command failed");
            false
        }
    }
}
