//! Mock serial link to the host.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::lock_state;
use crate::{HardwareError, Result, traits::SerialDevice};

/// Capacity of the simulated receive buffer, in lines.
const RX_BUFFER: usize = 16;

/// Mock serial port.
///
/// Outgoing lines are captured for inspection. Incoming lines are queued by
/// the handle and returned one per poll, as if the host had replied.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockSerial;
/// use doorlock_hardware::traits::SerialDevice;
///
/// let (mut serial, handle) = MockSerial::new();
/// serial.send_line("CHECK:123:4567").unwrap();
/// assert_eq!(handle.sent_lines(), vec!["CHECK:123:4567".to_string()]);
///
/// handle.reply("MATCH").unwrap();
/// assert_eq!(serial.poll_line().unwrap().as_deref(), Some("MATCH"));
/// assert_eq!(serial.poll_line().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct MockSerial {
    sent: Arc<Mutex<Vec<String>>>,
    rx: mpsc::Receiver<String>,
}

impl MockSerial {
    /// Create a mock port and the handle playing the host.
    pub fn new() -> (Self, MockSerialHandle) {
        let (tx, rx) = mpsc::channel(RX_BUFFER);
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sent: Arc::clone(&sent),
                rx,
            },
            MockSerialHandle { sent, tx },
        )
    }
}

impl SerialDevice for MockSerial {
    fn send_line(&mut self, line: &str) -> Result<()> {
        // Lines are stored without their terminator.
        lock_state(&self.sent).push(line.trim_end_matches(['\r', '\n']).to_string());
        Ok(())
    }

    fn poll_line(&mut self) -> Result<Option<String>> {
        match self.rx.try_recv() {
            Ok(line) => Ok(Some(line)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Ok(None),
        }
    }
}

/// Host side of a mock serial link.
#[derive(Debug, Clone)]
pub struct MockSerialHandle {
    sent: Arc<Mutex<Vec<String>>>,
    tx: mpsc::Sender<String>,
}

impl MockSerialHandle {
    /// Lines the controller has written so far.
    pub fn sent_lines(&self) -> Vec<String> {
        lock_state(&self.sent).clone()
    }

    /// Drain the lines written so far.
    pub fn take_sent(&self) -> Vec<String> {
        std::mem::take(&mut *lock_state(&self.sent))
    }

    /// Queue a line from the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the receive buffer is full or the port has been
    /// dropped.
    pub fn reply(&self, line: &str) -> Result<()> {
        self.tx.try_send(line.to_string()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                HardwareError::communication("Serial receive buffer full")
            }
            mpsc::error::TrySendError::Closed(_) => {
                HardwareError::disconnected("Serial port closed")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_strips_terminator() {
        let (mut serial, handle) = MockSerial::new();
        serial.send_line("ULTRA:1\n").unwrap();
        assert_eq!(handle.sent_lines(), vec!["ULTRA:1".to_string()]);
    }

    #[test]
    fn test_take_sent_drains() {
        let (mut serial, handle) = MockSerial::new();
        serial.send_line("CODE:1234").unwrap();

        assert_eq!(handle.take_sent().len(), 1);
        assert!(handle.sent_lines().is_empty());
    }

    #[test]
    fn test_replies_in_order() {
        let (mut serial, handle) = MockSerial::new();
        handle.reply("NO_MATCH").unwrap();
        handle.reply("LOCK").unwrap();

        assert_eq!(serial.poll_line().unwrap().as_deref(), Some("NO_MATCH"));
        assert_eq!(serial.poll_line().unwrap().as_deref(), Some("LOCK"));
        assert_eq!(serial.poll_line().unwrap(), None);
    }

    #[test]
    fn test_reply_after_port_dropped() {
        let (serial, handle) = MockSerial::new();
        drop(serial);
        assert!(matches!(
            handle.reply("MATCH"),
            Err(HardwareError::Disconnected { .. })
        ));
    }
}
