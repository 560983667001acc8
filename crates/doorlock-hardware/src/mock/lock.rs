//! Mock lock mechanism.

use std::sync::{Arc, Mutex};

use doorlock_core::LockState;

use super::lock_state;
use crate::types::ActuatorCommand;
use crate::{HardwareError, Result, traits::LockDevice};

#[derive(Debug, Default)]
struct LockInner {
    state: LockState,
    commands: Vec<ActuatorCommand>,
    failing: bool,
}

/// Mock lock actuator that records every command it receives.
///
/// A failing lock still records the attempted command but leaves its state
/// unchanged.
///
/// # Examples
///
/// ```
/// use doorlock_core::LockState;
/// use doorlock_hardware::mock::MockLock;
/// use doorlock_hardware::traits::LockDevice;
/// use doorlock_hardware::types::ActuatorCommand;
///
/// let (mut lock, handle) = MockLock::new();
/// lock.unlock().unwrap();
///
/// assert_eq!(handle.state(), LockState::Unlocked);
/// assert_eq!(handle.commands(), vec![ActuatorCommand::Unlock]);
/// ```
#[derive(Debug)]
pub struct MockLock {
    inner: Arc<Mutex<LockInner>>,
}

impl MockLock {
    /// Create a locked mock actuator and its handle.
    pub fn new() -> (Self, MockLockHandle) {
        let inner = Arc::new(Mutex::new(LockInner::default()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            MockLockHandle { inner },
        )
    }

    fn apply(&self, command: ActuatorCommand) -> Result<()> {
        let mut inner = lock_state(&self.inner);
        inner.commands.push(command);
        if inner.failing {
            return Err(HardwareError::communication("Lock relay not responding"));
        }
        inner.state = match command {
            ActuatorCommand::Lock => LockState::Locked,
            ActuatorCommand::Unlock => LockState::Unlocked,
        };
        Ok(())
    }
}

impl LockDevice for MockLock {
    fn lock(&mut self) -> Result<()> {
        self.apply(ActuatorCommand::Lock)
    }

    fn unlock(&mut self) -> Result<()> {
        self.apply(ActuatorCommand::Unlock)
    }
}

/// Handle for observing a mock lock.
#[derive(Debug, Clone)]
pub struct MockLockHandle {
    inner: Arc<Mutex<LockInner>>,
}

impl MockLockHandle {
    /// Physical state of the mechanism.
    pub fn state(&self) -> LockState {
        lock_state(&self.inner).state
    }

    /// Every command received, including failed ones.
    pub fn commands(&self) -> Vec<ActuatorCommand> {
        lock_state(&self.inner).commands.clone()
    }

    pub fn unlock_count(&self) -> usize {
        lock_state(&self.inner)
            .commands
            .iter()
            .filter(|c| **c == ActuatorCommand::Unlock)
            .count()
    }

    pub fn set_failing(&self, failing: bool) {
        lock_state(&self.inner).failing = failing;
    }
}
