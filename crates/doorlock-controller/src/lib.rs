//! Door-lock access controller.
//!
//! This crate holds the sequencing logic of the lock: keypad entry, the
//! force-open override, lock reconciliation with obstruction telemetry, and
//! the [`AccessController`] that ties them together behind a single
//! cooperative [`tick`](AccessController::tick).
//!
//! # Examples
//!
//! ```
//! use doorlock_controller::AccessController;
//! use doorlock_core::ControllerConfig;
//! use doorlock_hardware::Peripherals;
//!
//! let (peripherals, mock) = Peripherals::mock();
//! let mut controller = AccessController::new(ControllerConfig::default(), peripherals).unwrap();
//! controller.start();
//!
//! mock.keypad.type_keys("123#4567#").unwrap();
//! for tick in 0..9 {
//!     controller.tick(tick * 50);
//! }
//!
//! assert_eq!(mock.serial.sent_lines(), vec!["CHECK:123:4567".to_string()]);
//! ```

pub mod actuation;
pub mod controller;
pub mod entry;
pub mod forced_open;
pub mod reconciler;
pub mod screen;

pub use controller::{AccessController, TickReport};
pub use entry::EntryStateMachine;
pub use forced_open::{OverrideController, OverrideOutcome};
pub use reconciler::{LockReconciler, ReconcileIo, ReconcileReport};
pub use screen::Screen;
