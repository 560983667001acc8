//! Property-based tests for the entry and telemetry invariants.

use doorlock_controller::{EntryStateMachine, LockReconciler, ReconcileIo, Screen};
use doorlock_core::{ControllerConfig, EntryStage, KeyAction, KeyMap, LockState};
use doorlock_hardware::mock::{MockDoorSensor, MockLcd, MockLock, MockRangeFinder, MockSerial};
use proptest::prelude::*;

fn machine() -> (EntryStateMachine, Screen) {
    let config = ControllerConfig::default();
    let (lcd, _handle) = MockLcd::new();
    (
        EntryStateMachine::new(&config),
        Screen::new(Box::new(lcd), config.message_duration_ms),
    )
}

fn keypad_key() -> impl Strategy<Value = char> {
    prop::sample::select(vec![
        '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', '*', '#',
    ])
}

proptest! {
    #[test]
    fn prop_accumulators_never_exceed_limits(keys in prop::collection::vec(keypad_key(), 0..64)) {
        let (mut machine, mut screen) = machine();
        let keymap = KeyMap::default();

        for key in keys {
            machine.on_key(keymap.classify(key), &mut screen, 0);
            prop_assert!(machine.identifier().len() <= 8);
            prop_assert!(machine.passcode().len() <= 4);
        }
    }

    #[test]
    fn prop_identifier_grows_by_one_until_full(digits in "[0-9]{0,20}") {
        let (mut machine, mut screen) = machine();

        for (i, digit) in digits.chars().enumerate() {
            machine.on_key(KeyAction::Digit(digit), &mut screen, 0);
            prop_assert_eq!(machine.identifier().len(), (i + 1).min(8));
        }
        prop_assert_eq!(machine.identifier(), &digits[..digits.len().min(8)]);
    }

    #[test]
    fn prop_reset_always_returns_to_start(keys in prop::collection::vec(keypad_key(), 0..32)) {
        let (mut machine, mut screen) = machine();
        let keymap = KeyMap::default();

        for key in keys {
            machine.on_key(keymap.classify(key), &mut screen, 0);
        }
        machine.on_key(KeyAction::Reset, &mut screen, 0);

        prop_assert_eq!(machine.stage(), EntryStage::CapturingId);
        prop_assert_eq!(machine.identifier(), "");
        prop_assert_eq!(machine.passcode(), "");
    }

    #[test]
    fn prop_complete_entry_yields_exact_request(id in "[0-9]{1,8}", code in "[0-9]{4}") {
        let (mut machine, mut screen) = machine();
        let keymap = KeyMap::default();
        let keys = format!("{id}#{code}#");

        let requests: Vec<_> = keys
            .chars()
            .filter_map(|key| machine.on_key(keymap.classify(key), &mut screen, 0))
            .collect();

        prop_assert_eq!(requests.len(), 1);
        prop_assert_eq!(requests[0].identifier().map(|i| i.as_str()), Some(id.as_str()));
        prop_assert_eq!(requests[0].passcode().as_str(), code.as_str());
        prop_assert!(machine.is_idle());
    }

    #[test]
    fn prop_short_code_never_yields_request(id in "[0-9]{1,8}", code in "[0-9]{0,3}") {
        let (mut machine, mut screen) = machine();
        let keymap = KeyMap::default();
        let keys = format!("{id}#{code}#");

        let sent = keys
            .chars()
            .filter_map(|key| machine.on_key(keymap.classify(key), &mut screen, 0))
            .count();

        prop_assert_eq!(sent, 0);
        prop_assert!(machine.is_idle());
    }

    #[test]
    fn prop_alerts_spaced_beyond_cooldown(
        cooldown_ms in 1u64..2_000,
        tick_ms in 1u64..200,
        ticks in 1usize..200,
    ) {
        let config = ControllerConfig { cooldown_ms, ..ControllerConfig::default() };
        let mut reconciler = LockReconciler::new(&config);
        let (mut range_finder, range) = MockRangeFinder::new();
        let (door_sensor, _door) = MockDoorSensor::new();
        let (mut lock, _lock) = MockLock::new();
        let (mut serial, _host) = MockSerial::new();
        let mut state = LockState::Locked;
        range.set_distance(5.0).unwrap();

        let mut alerts = Vec::new();
        for i in 0..ticks as u64 {
            let now = i * tick_ms;
            let io = ReconcileIo {
                range_finder: &mut range_finder,
                door_sensor: &door_sensor,
                lock: &mut lock,
                serial: &mut serial,
                override_fired: false,
            };
            if reconciler.tick(now, io, &mut state).alert_sent {
                alerts.push(now);
            }
        }

        prop_assert!(!alerts.is_empty());
        for pair in alerts.windows(2) {
            prop_assert!(pair[1] - pair[0] > cooldown_ms);
        }
    }
}
