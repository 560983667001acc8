//! Common types shared across hardware device implementations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{HardwareError, Result};

/// One debounced key press, identified by the character printed on the key.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::types::KeyEvent;
///
/// let event = KeyEvent::new('#').unwrap();
/// assert_eq!(event.key(), '#');
///
/// assert!(KeyEvent::new('\n').is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent(char);

impl KeyEvent {
    /// Create a key event.
    ///
    /// # Errors
    ///
    /// Returns an error unless the key is printable ASCII.
    pub fn new(key: char) -> Result<Self> {
        if !key.is_ascii_graphic() {
            return Err(HardwareError::invalid_data(format!(
                "Key must be printable ASCII, got {key:?}"
            )));
        }
        Ok(Self(key))
    }

    pub fn key(&self) -> char {
        self.0
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command sent to the lock mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorCommand {
    Lock,
    Unlock,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('0')]
    #[case('D')]
    #[case('*')]
    fn test_key_event_accepts_keypad_legends(#[case] key: char) {
        assert_eq!(KeyEvent::new(key).unwrap().key(), key);
    }

    #[rstest]
    #[case(' ')]
    #[case('\t')]
    #[case('é')]
    fn test_key_event_rejects_unprintable(#[case] key: char) {
        assert!(KeyEvent::new(key).is_err());
    }

    #[test]
    fn test_actuator_command_serialization() {
        let json = serde_json::to_string(&ActuatorCommand::Unlock).unwrap();
        assert_eq!(json, "\"unlock\"");
        let command: ActuatorCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(command, ActuatorCommand::Unlock);
    }
}
