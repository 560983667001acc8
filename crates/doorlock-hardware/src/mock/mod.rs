//! Mock device implementations for testing and development.
//!
//! Each mock comes with a handle that can be cloned and kept by the test or
//! the simulator to drive the device and observe what the controller did.

pub mod display;
pub mod keypad;
pub mod lock;
pub mod sensors;
pub mod serial;

use std::sync::{Mutex, MutexGuard, PoisonError};

// Re-export commonly used types
pub use display::{MockLcd, MockLcdHandle};
pub use keypad::{KEY_BUFFER, MockKeypad, MockKeypadHandle};
pub use lock::{MockLock, MockLockHandle};
pub use sensors::{MockDoorSensor, MockDoorSensorHandle, MockRangeFinder, MockRangeFinderHandle};
pub use serial::{MockSerial, MockSerialHandle};

/// Lock a shared mock state, ignoring poisoning from a panicked test thread.
pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
