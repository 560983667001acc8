//! Hardware abstraction layer for the door-lock controller.
//!
//! This crate defines the peripherals the controller talks to as small
//! synchronous traits, along with mock implementations used by the tests and
//! the desktop simulator.
//!
//! # Design
//!
//! - **Poll-driven**: the controller runs a cooperative loop and calls each
//!   device once per tick, so no method waits for input. Keys and serial
//!   lines are polled, sensors are sampled.
//! - **Object-safe**: every trait can be used as `Box<dyn Trait>`, which is
//!   how [`Peripherals`] holds them.
//! - **Error-aware**: actuators and links return [`Result<T>`][error::Result];
//!   sensors report absence of data as a value (for example
//!   [`DistanceReading::NoEcho`](doorlock_core::DistanceReading::NoEcho)).
//!
//! # Devices
//!
//! | Trait | Hardware | Mock |
//! |-------|----------|------|
//! | [`KeypadDevice`] | 4x4 matrix keypad | [`MockKeypad`](mock::MockKeypad) |
//! | [`RangeFinderDevice`] | ultrasonic sensor | [`MockRangeFinder`](mock::MockRangeFinder) |
//! | [`DoorSensorDevice`] | magnetic contact | [`MockDoorSensor`](mock::MockDoorSensor) |
//! | [`LockDevice`] | relay or servo | [`MockLock`](mock::MockLock) |
//! | [`DisplayDevice`] | 16x2 LCD | [`MockLcd`](mock::MockLcd) |
//! | [`SerialDevice`] | UART to the host | [`MockSerial`](mock::MockSerial) |
//!
//! # Examples
//!
//! ```
//! use doorlock_hardware::Peripherals;
//!
//! let (mut peripherals, handles) = Peripherals::mock();
//! handles.keypad.press('1').unwrap();
//!
//! assert_eq!(peripherals.keypad.poll_key().map(|e| e.key()), Some('1'));
//! ```

pub mod error;
pub mod lcd;
pub mod mock;
pub mod peripherals;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use peripherals::{MockPeripherals, Peripherals};
pub use traits::{
    DisplayDevice, DoorSensorDevice, KeypadDevice, LockDevice, RangeFinderDevice, SerialDevice,
};
pub use types::{ActuatorCommand, KeyEvent};
