//! The full set of devices attached to one lock unit.

use std::fmt;

use crate::mock::{
    MockDoorSensor, MockDoorSensorHandle, MockKeypad, MockKeypadHandle, MockLcd, MockLcdHandle,
    MockLock, MockLockHandle, MockRangeFinder, MockRangeFinderHandle, MockSerial,
    MockSerialHandle,
};
use crate::traits::{
    DisplayDevice, DoorSensorDevice, KeypadDevice, LockDevice, RangeFinderDevice, SerialDevice,
};

/// Devices owned by the controller.
///
/// Fields are public so callers can mix real drivers with mocks, e.g. a real
/// serial port in front of simulated sensors.
pub struct Peripherals {
    pub keypad: Box<dyn KeypadDevice>,
    pub range_finder: Box<dyn RangeFinderDevice>,
    pub door_sensor: Box<dyn DoorSensorDevice>,
    pub lock: Box<dyn LockDevice>,
    pub display: Box<dyn DisplayDevice>,
    pub serial: Box<dyn SerialDevice>,
}

impl Peripherals {
    /// Build a complete set of mock devices.
    ///
    /// Returns the peripherals together with the handles that drive and
    /// observe them.
    pub fn mock() -> (Self, MockPeripherals) {
        let (keypad, keypad_handle) = MockKeypad::new();
        let (range_finder, range_finder_handle) = MockRangeFinder::new();
        let (door_sensor, door_sensor_handle) = MockDoorSensor::new();
        let (lock, lock_handle) = MockLock::new();
        let (display, display_handle) = MockLcd::new();
        let (serial, serial_handle) = MockSerial::new();

        let peripherals = Self {
            keypad: Box::new(keypad),
            range_finder: Box::new(range_finder),
            door_sensor: Box::new(door_sensor),
            lock: Box::new(lock),
            display: Box::new(display),
            serial: Box::new(serial),
        };
        let handles = MockPeripherals {
            keypad: keypad_handle,
            range_finder: range_finder_handle,
            door_sensor: door_sensor_handle,
            lock: lock_handle,
            display: display_handle,
            serial: serial_handle,
        };

        (peripherals, handles)
    }
}

impl fmt::Debug for Peripherals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peripherals").finish_non_exhaustive()
    }
}

/// Handles for a set of mock peripherals.
#[derive(Debug, Clone)]
pub struct MockPeripherals {
    pub keypad: MockKeypadHandle,
    pub range_finder: MockRangeFinderHandle,
    pub door_sensor: MockDoorSensorHandle,
    pub lock: MockLockHandle,
    pub display: MockLcdHandle,
    pub serial: MockSerialHandle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_core::{DistanceReading, EntryStage, LockState};

    #[test]
    fn test_mock_handles_drive_devices() {
        let (mut peripherals, handles) = Peripherals::mock();

        handles.range_finder.set_distance(15.0).unwrap();
        assert_eq!(
            peripherals.range_finder.measure_distance(),
            DistanceReading::Echo(15.0)
        );

        handles.door_sensor.set_closed(false);
        assert!(!peripherals.door_sensor.is_door_closed());

        peripherals.lock.unlock().unwrap();
        assert_eq!(handles.lock.state(), LockState::Unlocked);

        peripherals
            .display
            .show_prompt(EntryStage::CapturingCode, "")
            .unwrap();
        assert_eq!(handles.display.lines()[0], "Enter Code:");

        peripherals.serial.send_line("ULTRA:1").unwrap();
        assert_eq!(handles.serial.sent_lines(), vec!["ULTRA:1".to_string()]);
    }

    #[test]
    fn test_debug_does_not_require_device_debug() {
        let (peripherals, _handles) = Peripherals::mock();
        assert!(format!("{peripherals:?}").starts_with("Peripherals"));
    }
}
