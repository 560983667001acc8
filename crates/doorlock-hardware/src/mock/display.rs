//! Mock LCD backed by a [`VirtualLcd`] buffer.

use std::sync::{Arc, Mutex};

use doorlock_core::EntryStage;
use doorlock_core::constants::{LCD_COLUMNS, LCD_LINES};

use super::lock_state;
use crate::lcd::VirtualLcd;
use crate::{HardwareError, Result, traits::DisplayDevice};

#[derive(Debug)]
struct LcdState {
    screen: VirtualLcd,
    messages: Vec<String>,
    updates: usize,
    failing: bool,
}

/// Mock 16x2 character display.
///
/// Renders into a shared [`VirtualLcd`] and keeps a history of every message
/// shown, so tests can assert on transient messages even after the prompt
/// has been redrawn.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockLcd;
/// use doorlock_hardware::traits::DisplayDevice;
///
/// let (mut lcd, handle) = MockLcd::new();
/// lcd.show_message("Checking...").unwrap();
///
/// assert_eq!(handle.line(0).trim_end(), "Checking...");
/// assert_eq!(handle.messages(), vec!["Checking...".to_string()]);
/// ```
#[derive(Debug)]
pub struct MockLcd {
    state: Arc<Mutex<LcdState>>,
}

impl MockLcd {
    /// Create a blank display and its inspection handle.
    pub fn new() -> (Self, MockLcdHandle) {
        let state = Arc::new(Mutex::new(LcdState {
            screen: VirtualLcd::new(LCD_LINES, LCD_COLUMNS),
            messages: Vec::new(),
            updates: 0,
            failing: false,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockLcdHandle { state },
        )
    }

    fn update(&self, draw: impl FnOnce(&mut LcdState)) -> Result<()> {
        let mut state = lock_state(&self.state);
        if state.failing {
            return Err(HardwareError::communication("LCD not acknowledging"));
        }
        draw(&mut state);
        state.updates += 1;
        Ok(())
    }
}

impl DisplayDevice for MockLcd {
    fn show_prompt(&mut self, stage: EntryStage, entered: &str) -> Result<()> {
        self.update(|state| state.screen.render_prompt(stage, entered))
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        self.update(|state| {
            state.screen.render_message(text);
            state.messages.push(text.to_string());
        })
    }
}

/// Handle for inspecting a mock display.
#[derive(Debug, Clone)]
pub struct MockLcdHandle {
    state: Arc<Mutex<LcdState>>,
}

impl MockLcdHandle {
    /// Contents of one line, padded to the display width.
    ///
    /// Out of range lines read as empty.
    pub fn line(&self, line: usize) -> String {
        lock_state(&self.state)
            .screen
            .line(line)
            .unwrap_or_default()
            .to_string()
    }

    /// All lines with trailing padding removed.
    pub fn lines(&self) -> Vec<String> {
        lock_state(&self.state)
            .screen
            .lines()
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    /// Every message shown so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        lock_state(&self.state).messages.clone()
    }

    pub fn last_message(&self) -> Option<String> {
        lock_state(&self.state).messages.last().cloned()
    }

    /// Number of successful redraws.
    pub fn update_count(&self) -> usize {
        lock_state(&self.state).updates
    }

    /// Make every following update fail.
    pub fn set_failing(&self, failing: bool) {
        lock_state(&self.state).failing = failing;
    }
}
