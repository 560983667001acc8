//! Hardware device trait definitions.
//!
//! These traits are the contract between the lock controller and its
//! peripherals. The controller runs from a cooperative polling loop, so every
//! method is synchronous and returns promptly: key and serial polls return
//! `None` when nothing is pending, and a distance measurement is bounded by
//! the rangefinder's echo timeout.
//!
//! Because the methods are plain `fn`s the traits are object-safe, and the
//! controller holds its peripherals as `Box<dyn ...>` inside
//! [`Peripherals`](crate::Peripherals).

use doorlock_core::{DistanceReading, EntryStage};

use crate::error::Result;
use crate::types::KeyEvent;

/// Source of discrete, debounced key presses.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockKeypad;
/// use doorlock_hardware::traits::KeypadDevice;
///
/// let (mut keypad, handle) = MockKeypad::new();
/// assert!(keypad.poll_key().is_none());
///
/// handle.press('7').unwrap();
/// assert_eq!(keypad.poll_key().map(|e| e.key()), Some('7'));
/// ```
pub trait KeypadDevice: Send {
    /// Return the next pending key press, or `None` when idle.
    ///
    /// Presses are returned in the order they happened, one per call.
    fn poll_key(&mut self) -> Option<KeyEvent>;
}

/// Ultrasonic rangefinder facing the door opening.
pub trait RangeFinderDevice: Send {
    /// Take one measurement.
    ///
    /// Blocks for at most the echo timeout. A timeout is reported as
    /// [`DistanceReading::NoEcho`], never as an error or a zero distance.
    fn measure_distance(&mut self) -> DistanceReading;
}

/// Magnetic contact on the door frame.
pub trait DoorSensorDevice: Send {
    /// Whether the magnet is present, i.e. the door is shut.
    fn is_door_closed(&self) -> bool;
}

/// Lock mechanism (relay or continuous-rotation servo).
///
/// Both commands are idempotent: locking a locked door is harmless.
pub trait LockDevice: Send {
    /// Engage the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be delivered.
    fn lock(&mut self) -> Result<()>;

    /// Release the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be delivered.
    fn unlock(&mut self) -> Result<()>;
}

/// Two-line character display.
///
/// Message durations are not the display's concern: the controller decides
/// when to put the prompt back.
pub trait DisplayDevice: Send {
    /// Show the prompt for `stage` with the digits entered so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the display could not be updated.
    fn show_prompt(&mut self, stage: EntryStage, entered: &str) -> Result<()>;

    /// Replace the screen with a single-line message.
    ///
    /// # Errors
    ///
    /// Returns an error if the display could not be updated.
    fn show_message(&mut self, text: &str) -> Result<()>;
}

/// Line-oriented serial link to the host.
pub trait SerialDevice: Send {
    /// Write one line. The implementation appends the terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is closed or the write fails.
    fn send_line(&mut self, line: &str) -> Result<()>;

    /// Return the next complete line received from the host, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the port fails.
    fn poll_line(&mut self) -> Result<Option<String>>;
}
