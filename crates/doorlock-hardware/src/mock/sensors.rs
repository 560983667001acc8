//! Mock rangefinder and door contact.
//!
//! Both sensors publish their current value through a `tokio::sync::watch`
//! channel: the handle sets what the sensor "sees", the device reads the
//! latest value on every measurement.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use doorlock_core::DistanceReading;
use tokio::sync::watch;

use crate::Result;
use crate::traits::{DoorSensorDevice, RangeFinderDevice};

/// Mock ultrasonic rangefinder.
///
/// Starts with [`DistanceReading::NoEcho`], i.e. nothing in range.
///
/// # Examples
///
/// ```
/// use doorlock_core::DistanceReading;
/// use doorlock_hardware::mock::MockRangeFinder;
/// use doorlock_hardware::traits::RangeFinderDevice;
///
/// let (mut sensor, handle) = MockRangeFinder::new();
/// assert_eq!(sensor.measure_distance(), DistanceReading::NoEcho);
///
/// handle.set_distance(12.0).unwrap();
/// assert_eq!(sensor.measure_distance(), DistanceReading::Echo(12.0));
/// assert_eq!(handle.measurement_count(), 2);
/// ```
#[derive(Debug)]
pub struct MockRangeFinder {
    reading_rx: watch::Receiver<DistanceReading>,
    measurements: Arc<AtomicUsize>,
}

impl MockRangeFinder {
    /// Create a new mock rangefinder and its control handle.
    pub fn new() -> (Self, MockRangeFinderHandle) {
        let (reading_tx, reading_rx) = watch::channel(DistanceReading::NoEcho);
        let measurements = Arc::new(AtomicUsize::new(0));

        let sensor = Self {
            reading_rx,
            measurements: Arc::clone(&measurements),
        };
        let handle = MockRangeFinderHandle {
            reading_tx: Arc::new(reading_tx),
            measurements,
        };

        (sensor, handle)
    }
}

impl RangeFinderDevice for MockRangeFinder {
    fn measure_distance(&mut self) -> DistanceReading {
        self.measurements.fetch_add(1, Ordering::Relaxed);
        *self.reading_rx.borrow()
    }
}

/// Handle for controlling a mock rangefinder.
#[derive(Debug, Clone)]
pub struct MockRangeFinderHandle {
    reading_tx: Arc<watch::Sender<DistanceReading>>,
    measurements: Arc<AtomicUsize>,
}

impl MockRangeFinderHandle {
    /// Place an object `centimeters` away from the sensor.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite distances.
    pub fn set_distance(&self, centimeters: f32) -> Result<()> {
        let reading = DistanceReading::echo(centimeters)
            .map_err(|e| crate::HardwareError::invalid_data(e.to_string()))?;
        self.set_reading(reading);
        Ok(())
    }

    /// Make every following measurement time out.
    pub fn set_no_echo(&self) {
        self.set_reading(DistanceReading::NoEcho);
    }

    pub fn set_reading(&self, reading: DistanceReading) {
        self.reading_tx.send_replace(reading);
    }

    /// Current simulated reading.
    pub fn reading(&self) -> DistanceReading {
        *self.reading_tx.borrow()
    }

    /// Number of measurements taken so far.
    pub fn measurement_count(&self) -> usize {
        self.measurements.load(Ordering::Relaxed)
    }
}

/// Mock magnetic door contact. Starts closed.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockDoorSensor;
/// use doorlock_hardware::traits::DoorSensorDevice;
///
/// let (sensor, handle) = MockDoorSensor::new();
/// assert!(sensor.is_door_closed());
///
/// handle.set_closed(false);
/// assert!(!sensor.is_door_closed());
/// ```
#[derive(Debug)]
pub struct MockDoorSensor {
    closed_rx: watch::Receiver<bool>,
}

impl MockDoorSensor {
    /// Create a new mock door contact and its control handle.
    pub fn new() -> (Self, MockDoorSensorHandle) {
        let (closed_tx, closed_rx) = watch::channel(true);
        (
            Self { closed_rx },
            MockDoorSensorHandle {
                closed_tx: Arc::new(closed_tx),
            },
        )
    }
}

impl DoorSensorDevice for MockDoorSensor {
    fn is_door_closed(&self) -> bool {
        *self.closed_rx.borrow()
    }
}

/// Handle for opening and closing the simulated door.
#[derive(Debug, Clone)]
pub struct MockDoorSensorHandle {
    closed_tx: Arc<watch::Sender<bool>>,
}

impl MockDoorSensorHandle {
    pub fn set_closed(&self, closed: bool) {
        self.closed_tx.send_replace(closed);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }
}
