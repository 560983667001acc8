//! Lock reconciliation and obstruction telemetry.
//!
//! Runs once per tick, independent of keypad input:
//!
//! 1. Measures the distance in front of the door. While an object is closer
//!    than the obstruction range, an `ULTRA:1` line goes to the host at most
//!    once per cooldown window. The alert repeats for as long as the object
//!    stays, it is not tied to the object arriving.
//! 2. Applies the [`RelockPolicy`]: with `AfterGrace`, a door that has been
//!    sensed closed for the whole grace period while unlocked is locked
//!    again. A pass that runs in the same tick as a successful force open
//!    never relocks.

use doorlock_core::{
    ControllerConfig, CooldownTimer, DistanceReading, LockState, RelockPolicy,
};
use doorlock_hardware::{DoorSensorDevice, LockDevice, RangeFinderDevice, SerialDevice};
use doorlock_protocol::OutboundMessage;
use tracing::{debug, info, warn};

use crate::actuation::drive_lock;

/// What one reconciler pass did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileReport {
    pub reading: DistanceReading,
    pub alert_sent: bool,
    pub relocked: bool,
}

/// Devices the reconciler reads and drives during a pass.
pub struct ReconcileIo<'a> {
    pub range_finder: &'a mut dyn RangeFinderDevice,
    pub door_sensor: &'a dyn DoorSensorDevice,
    pub lock: &'a mut dyn LockDevice,
    pub serial: &'a mut dyn SerialDevice,
    /// The override released the lock earlier in this tick.
    pub override_fired: bool,
}

/// Keeps telemetry and lock state in line with the sensors.
#[derive(Debug, Clone, PartialEq)]
pub struct LockReconciler {
    obstruction_range_cm: f32,
    cooldown: CooldownTimer,
    relock: RelockPolicy,
    /// When the door was first seen closed during the current unlocked spell.
    closed_since: Option<u64>,
}

impl LockReconciler {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            obstruction_range_cm: config.obstruction_range_cm,
            cooldown: CooldownTimer::new(config.cooldown_ms),
            relock: config.relock,
            closed_since: None,
        }
    }

    /// Timestamp of the last obstruction alert.
    pub fn last_alert(&self) -> Option<u64> {
        self.cooldown.last_emission()
    }

    /// Run one pass.
    pub fn tick(
        &mut self,
        now_ms: u64,
        io: ReconcileIo<'_>,
        lock_state: &mut LockState,
    ) -> ReconcileReport {
        let reading = io.range_finder.measure_distance();
        let alert_sent = self.check_obstruction(now_ms, reading, io.serial);
        let relocked = if io.override_fired {
            debug!("Force open this tick, relock skipped");
            false
        } else {
            self.check_relock(now_ms, io.door_sensor, io.lock, lock_state)
        };

        ReconcileReport {
            reading,
            alert_sent,
            relocked,
        }
    }

    fn check_obstruction(
        &mut self,
        now_ms: u64,
        reading: DistanceReading,
        serial: &mut dyn SerialDevice,
    ) -> bool {
        if !reading.is_within(self.obstruction_range_cm) || !self.cooldown.try_fire(now_ms) {
            return false;
        }

        info!(%reading, "Obstruction detected");
        // Best effort: a failed write still consumes the cooldown window.
        if let Err(e) = serial.send_line(&OutboundMessage::Obstruction.to_string()) {
            warn!(error = %e, "Failed to send obstruction alert");
        }
        true
    }

    fn check_relock(
        &mut self,
        now_ms: u64,
        door_sensor: &dyn DoorSensorDevice,
        lock: &mut dyn LockDevice,
        lock_state: &mut LockState,
    ) -> bool {
        let RelockPolicy::AfterGrace { grace_ms } = self.relock else {
            return false;
        };

        if lock_state.is_locked() || !door_sensor.is_door_closed() {
            self.closed_since = None;
            return false;
        }

        let since = *self.closed_since.get_or_insert(now_ms);
        if now_ms.saturating_sub(since) < grace_ms {
            return false;
        }

        debug!(closed_for_ms = now_ms - since, "Door closed past grace period, relocking");
        if drive_lock(lock, lock_state, LockState::Locked) {
            self.closed_since = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_hardware::mock::{
        MockDoorSensor, MockDoorSensorHandle, MockLock, MockLockHandle, MockRangeFinder,
        MockRangeFinderHandle, MockSerial, MockSerialHandle,
    };
    use rstest::rstest;

    struct Rig {
        reconciler: LockReconciler,
        range_finder: MockRangeFinder,
        range: MockRangeFinderHandle,
        door_sensor: MockDoorSensor,
        door: MockDoorSensorHandle,
        lock: MockLock,
        lock_handle: MockLockHandle,
        serial: MockSerial,
        host: MockSerialHandle,
        state: LockState,
    }

    impl Rig {
        fn new(config: &ControllerConfig) -> Self {
            let (range_finder, range) = MockRangeFinder::new();
            let (door_sensor, door) = MockDoorSensor::new();
            let (lock, lock_handle) = MockLock::new();
            let (serial, host) = MockSerial::new();
            Self {
                reconciler: LockReconciler::new(config),
                range_finder,
                range,
                door_sensor,
                door,
                lock,
                lock_handle,
                serial,
                host,
                state: LockState::Locked,
            }
        }

        fn tick(&mut self, now_ms: u64) -> ReconcileReport {
            self.pass(now_ms, false)
        }

        fn pass(&mut self, now_ms: u64, override_fired: bool) -> ReconcileReport {
            let io = ReconcileIo {
                range_finder: &mut self.range_finder,
                door_sensor: &self.door_sensor,
                lock: &mut self.lock,
                serial: &mut self.serial,
                override_fired,
            };
            self.reconciler.tick(now_ms, io, &mut self.state)
        }
    }

    fn relocking(grace_ms: u64) -> ControllerConfig {
        ControllerConfig {
            relock: RelockPolicy::AfterGrace { grace_ms },
            ..ControllerConfig::default()
        }
    }

    #[test]
    fn test_first_detection_alerts_immediately() {
        let mut rig = Rig::new(&ControllerConfig::default());
        rig.range.set_distance(12.0).unwrap();

        assert!(rig.tick(0).alert_sent);
        assert_eq!(rig.host.sent_lines(), vec!["ULTRA:1".to_string()]);
        assert_eq!(rig.reconciler.last_alert(), Some(0));
    }

    #[test]
    fn test_continuous_detection_respects_cooldown() {
        let mut rig = Rig::new(&ControllerConfig::default());
        rig.range.set_distance(12.0).unwrap();

        let alerts: Vec<u64> = (0..40)
            .map(|i| i * 50)
            .filter(|now| rig.tick(*now).alert_sent)
            .collect();

        assert_eq!(alerts, vec![0, 550, 1100, 1650]);
        assert_eq!(rig.host.sent_lines().len(), 4);
    }

    #[rstest]
    #[case(DistanceReading::NoEcho, false)]
    #[case(DistanceReading::Echo(30.0), false)]
    #[case(DistanceReading::Echo(29.9), true)]
    #[case(DistanceReading::Echo(0.0), true)]
    fn test_obstruction_range(#[case] reading: DistanceReading, #[case] alerts: bool) {
        let mut rig = Rig::new(&ControllerConfig::default());
        rig.range.set_reading(reading);

        assert_eq!(rig.tick(0).alert_sent, alerts);
    }

    #[test]
    fn test_relock_disabled_by_default() {
        let mut rig = Rig::new(&ControllerConfig::default());
        rig.state = LockState::Unlocked;

        for now in (0..60_000).step_by(1_000) {
            assert!(!rig.tick(now).relocked);
        }
        assert_eq!(rig.state, LockState::Unlocked);
    }

    #[test]
    fn test_relock_after_grace() {
        let mut rig = Rig::new(&relocking(5_000));
        rig.state = LockState::Unlocked;

        assert!(!rig.tick(1_000).relocked);
        assert!(!rig.tick(5_999).relocked);
        assert!(rig.tick(6_000).relocked);

        assert_eq!(rig.state, LockState::Locked);
        assert_eq!(rig.lock_handle.state(), LockState::Locked);
    }

    #[test]
    fn test_opening_door_restarts_grace() {
        let mut rig = Rig::new(&relocking(5_000));
        rig.state = LockState::Unlocked;

        rig.tick(0);
        rig.door.set_closed(false);
        rig.tick(3_000);
        rig.door.set_closed(true);

        assert!(!rig.tick(5_000).relocked);
        assert!(!rig.tick(7_999).relocked);
        assert!(rig.tick(10_000).relocked);
    }

    #[test]
    fn test_relock_skipped_in_override_tick() {
        let mut rig = Rig::new(&relocking(0));
        rig.state = LockState::Unlocked;

        let report = rig.pass(0, true);
        assert!(!report.relocked);
        assert!(!report.alert_sent);
        assert_eq!(rig.state, LockState::Unlocked);
        assert!(rig.lock_handle.commands().is_empty());

        assert!(rig.tick(50).relocked);
    }

    #[test]
    fn test_report_carries_reading() {
        let mut rig = Rig::new(&ControllerConfig::default());
        assert_eq!(rig.tick(0).reading, DistanceReading::NoEcho);

        rig.range.set_distance(42.0).unwrap();
        assert_eq!(rig.tick(50).reading, DistanceReading::Echo(42.0));
    }

    #[test]
    fn test_failed_relock_retried() {
        let mut rig = Rig::new(&relocking(1_000));
        rig.state = LockState::Unlocked;
        rig.lock_handle.set_failing(true);

        rig.tick(0);
        assert!(!rig.tick(1_000).relocked);
        assert_eq!(rig.state, LockState::Unlocked);

        rig.lock_handle.set_failing(false);
        assert!(rig.tick(1_050).relocked);
    }
}
