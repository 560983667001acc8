//! The composite access controller.
//!
//! [`AccessController`] owns every peripheral and all mutable state of the
//! lock. An external loop calls [`AccessController::tick`] repeatedly with a
//! monotonic millisecond clock; each tick:
//!
//! 1. expires a transient message whose deadline has passed,
//! 2. takes at most one key press and routes it to the entry state machine
//!    or the force-open override,
//! 3. drains host replies from the serial link,
//! 4. runs the lock reconciler. A force open that released the lock in this
//!    tick holds against relocking until the next one.
//!
//! Nothing in a tick is fatal. Device failures are logged and the tick
//! carries on.

use doorlock_core::constants::{
    MSG_ACCESS_GRANTED, MSG_HOST_ERROR, MSG_UNKNOWN_ID, MSG_WRONG_CODE,
};
use doorlock_core::{ControllerConfig, EntryStage, KeyAction, LockState, Result};
use doorlock_hardware::{
    DoorSensorDevice, KeypadDevice, LockDevice, Peripherals, RangeFinderDevice, SerialDevice,
};
use doorlock_protocol::{HostReply, OutboundMessage};
use tracing::{debug, info, trace, warn};

use crate::actuation::drive_lock;
use crate::entry::EntryStateMachine;
use crate::forced_open::{OverrideController, OverrideOutcome};
use crate::reconciler::{LockReconciler, ReconcileIo, ReconcileReport};
use crate::screen::Screen;

/// Upper bound on host lines handled in one tick.
const MAX_REPLIES_PER_TICK: usize = 8;

/// Everything observable that happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Key press handled this tick.
    pub key: Option<char>,
    /// Verification request sent to the host.
    pub request_sent: bool,
    pub override_outcome: Option<OverrideOutcome>,
    pub host_replies: Vec<HostReply>,
    pub reconcile: ReconcileReport,
}

/// Result of routing one key press.
#[derive(Debug, Default)]
struct KeyOutcome {
    request_sent: bool,
    override_outcome: Option<OverrideOutcome>,
}

/// Door-lock access controller.
pub struct AccessController {
    config: ControllerConfig,
    keypad: Box<dyn KeypadDevice>,
    range_finder: Box<dyn RangeFinderDevice>,
    door_sensor: Box<dyn DoorSensorDevice>,
    lock: Box<dyn LockDevice>,
    serial: Box<dyn SerialDevice>,
    screen: Screen,
    entry: EntryStateMachine,
    override_gate: OverrideController,
    reconciler: LockReconciler,
    lock_state: LockState,
}

impl AccessController {
    /// Build a controller around `peripherals`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: ControllerConfig, peripherals: Peripherals) -> Result<Self> {
        config.validate()?;

        let Peripherals {
            keypad,
            range_finder,
            door_sensor,
            lock,
            display,
            serial,
        } = peripherals;

        Ok(Self {
            screen: Screen::new(display, config.message_duration_ms),
            entry: EntryStateMachine::new(&config),
            override_gate: OverrideController::new(config.clear_path_threshold_cm),
            reconciler: LockReconciler::new(&config),
            lock_state: LockState::Locked,
            config,
            keypad,
            range_finder,
            door_sensor,
            lock,
            serial,
        })
    }

    /// Put the hardware in its initial state: lock engaged, first prompt
    /// shown.
    pub fn start(&mut self) {
        info!(
            protocol = ?self.config.protocol,
            relock = ?self.config.relock,
            "Access controller starting"
        );
        drive_lock(&mut *self.lock, &mut self.lock_state, LockState::Locked);
        self.entry.reset(&mut self.screen);
    }

    /// Run one scheduler pass.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        self.screen.update(now_ms);

        let mut key = None;
        let mut outcome = KeyOutcome::default();
        if let Some(event) = self.keypad.poll_key() {
            key = Some(event.key());
            outcome = self.handle_key(event.key(), now_ms);
        }

        let mut host_replies = Vec::new();
        for _ in 0..MAX_REPLIES_PER_TICK {
            match self.serial.poll_line() {
                Ok(Some(line)) => {
                    let reply = HostReply::parse(&line);
                    self.on_host_reply(&reply, now_ms);
                    host_replies.push(reply);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read from host link");
                    break;
                }
            }
        }

        let override_fired =
            matches!(outcome.override_outcome, Some(OverrideOutcome::Opened(_)));
        let io = ReconcileIo {
            range_finder: &mut *self.range_finder,
            door_sensor: &*self.door_sensor,
            lock: &mut *self.lock,
            serial: &mut *self.serial,
            override_fired,
        };
        let reconcile = self.reconciler.tick(now_ms, io, &mut self.lock_state);

        TickReport {
            key,
            request_sent: outcome.request_sent,
            override_outcome: outcome.override_outcome,
            host_replies,
            reconcile,
        }
    }

    /// Apply a reply received from the host.
    pub fn on_host_reply(&mut self, reply: &HostReply, now_ms: u64) {
        debug!(%reply, "Host reply");
        match reply {
            HostReply::Match => {
                if drive_lock(&mut *self.lock, &mut self.lock_state, LockState::Unlocked) {
                    self.screen.show_transient(MSG_ACCESS_GRANTED, now_ms);
                }
            }
            HostReply::NoMatch => self.screen.show_transient(MSG_WRONG_CODE, now_ms),
            HostReply::NoListing => self.screen.show_transient(MSG_UNKNOWN_ID, now_ms),
            HostReply::Error => self.screen.show_transient(MSG_HOST_ERROR, now_ms),
            HostReply::Lock => {
                drive_lock(&mut *self.lock, &mut self.lock_state, LockState::Locked);
            }
            HostReply::Unknown(line) => {
                warn!(line = line.as_str(), "Ignoring unrecognised host line");
            }
        }
    }

    fn handle_key(&mut self, key: char, now_ms: u64) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();
        let action = self.config.keys.classify(key);
        if action == KeyAction::Ignored {
            trace!(key = %key, "Ignoring unassigned key");
            return outcome;
        }

        if self.screen.dismiss() {
            trace!("Transient message dismissed by key press");
        }

        if action == KeyAction::ForceOpen {
            outcome.override_outcome = Some(self.override_gate.on_force_key(
                &mut *self.range_finder,
                &mut *self.lock,
                &mut self.lock_state,
                &mut self.screen,
                now_ms,
            ));
            return outcome;
        }

        if let Some(request) = self.entry.on_key(action, &mut self.screen, now_ms) {
            let message = OutboundMessage::from_request(&request);
            info!(
                kind = message.kind(),
                identifier = request.identifier().map(|id| id.as_str()),
                passcode_len = request.passcode().len(),
                "Sending verification request"
            );
            match self.serial.send_line(&message.to_string()) {
                Ok(()) => outcome.request_sent = true,
                Err(e) => warn!(error = %e, "Failed to send verification request"),
            }
        }
        outcome
    }

    pub fn lock_state(&self) -> LockState {
        self.lock_state
    }

    pub fn stage(&self) -> EntryStage {
        self.entry.stage()
    }

    pub fn entry(&self) -> &EntryStateMachine {
        &self.entry
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn reconciler(&self) -> &LockReconciler {
        &self.reconciler
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

impl std::fmt::Debug for AccessController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessController")
            .field("lock_state", &self.lock_state)
            .field("entry", &self.entry)
            .field("screen", &self.screen)
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}
