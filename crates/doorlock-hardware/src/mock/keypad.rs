//! Mock keypad implementation for testing and development.

use tokio::sync::mpsc;

use crate::{HardwareError, Result, traits::KeypadDevice, types::KeyEvent};

/// Capacity of the simulated key buffer.
pub const KEY_BUFFER: usize = 32;

/// Mock keypad device.
///
/// Key presses are delivered through an internal channel and read back with
/// a non-blocking poll, so tests and the simulator can queue presses ahead
/// of the controller's ticks.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockKeypad;
/// use doorlock_hardware::traits::KeypadDevice;
///
/// let (mut keypad, handle) = MockKeypad::new();
/// handle.type_keys("12#").unwrap();
///
/// let keys: Vec<char> = std::iter::from_fn(|| keypad.poll_key())
///     .map(|event| event.key())
///     .collect();
/// assert_eq!(keys, vec!['1', '2', '#']);
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    input_rx: mpsc::Receiver<KeyEvent>,
}

impl MockKeypad {
    /// Create a new mock keypad and the handle that feeds it.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::channel(KEY_BUFFER);
        (Self { input_rx }, MockKeypadHandle { input_tx })
    }
}

impl KeypadDevice for MockKeypad {
    fn poll_key(&mut self) -> Option<KeyEvent> {
        // Empty and disconnected both read as idle.
        self.input_rx.try_recv().ok()
    }
}

/// Handle for pressing keys on a mock keypad.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    input_tx: mpsc::Sender<KeyEvent>,
}

impl MockKeypadHandle {
    /// Press a key without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not printable, the buffer is full or
    /// the keypad has been dropped.
    pub fn press(&self, key: char) -> Result<()> {
        let event = KeyEvent::new(key)?;
        self.input_tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                HardwareError::communication("Keypad buffer full")
            }
            mpsc::error::TrySendError::Closed(_) => {
                HardwareError::disconnected("Keypad input channel closed")
            }
        })
    }

    /// Press every character of `keys` in order.
    ///
    /// Either every key is queued or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if any key is not printable or the buffer lacks room
    /// for the whole sequence.
    pub fn type_keys(&self, keys: &str) -> Result<()> {
        let events = keys.chars().map(KeyEvent::new).collect::<Result<Vec<_>>>()?;
        let room = self.input_tx.capacity();
        if events.len() > room {
            return Err(HardwareError::communication(format!(
                "Keypad buffer has room for {room} keys, got {}",
                events.len()
            )));
        }
        events.into_iter().try_for_each(|event| {
            self.input_tx.try_send(event).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    HardwareError::communication("Keypad buffer full")
                }
                mpsc::error::TrySendError::Closed(_) => {
                    HardwareError::disconnected("Keypad input channel closed")
                }
            })
        })
    }

    /// Press a key, waiting for buffer space.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not printable or the keypad has been
    /// dropped.
    pub async fn send_key(&self, key: char) -> Result<()> {
        let event = KeyEvent::new(key)?;
        self.input_tx
            .send(event)
            .await
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }
}
