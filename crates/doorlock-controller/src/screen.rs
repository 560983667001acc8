//! Non-blocking display state.
//!
//! The lock shows two kinds of content: the entry prompt, which always
//! reflects the current stage and digits, and short transient messages such
//! as "Checking...". A transient message is held until its display-until
//! deadline and the prompt is then redrawn by [`Screen::update`], so nothing
//! ever sleeps inside a tick.
//!
//! Prompt changes requested while a message is up are remembered and drawn
//! when the message goes away.
//!
//! # Examples
//!
//! ```
//! use doorlock_controller::Screen;
//! use doorlock_core::EntryStage;
//! use doorlock_hardware::mock::MockLcd;
//!
//! let (lcd, handle) = MockLcd::new();
//! let mut screen = Screen::new(Box::new(lcd), 800);
//!
//! screen.show_transient("Checking...", 1_000);
//! screen.show_prompt(EntryStage::CapturingId, "");
//! assert_eq!(handle.lines()[0], "Checking...");
//!
//! screen.update(1_800);
//! assert_eq!(handle.lines()[0], "Enter ID:");
//! ```

use doorlock_core::EntryStage;
use doorlock_hardware::DisplayDevice;
use tracing::{trace, warn};

/// Transient message currently on the display.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Transient {
    text: String,
    until_ms: u64,
}

/// Owner of the display device.
pub struct Screen {
    display: Box<dyn DisplayDevice>,
    message_duration_ms: u64,
    stage: EntryStage,
    entered: String,
    transient: Option<Transient>,
}

impl Screen {
    /// Wrap a display. Nothing is drawn until the first prompt or message.
    pub fn new(display: Box<dyn DisplayDevice>, message_duration_ms: u64) -> Self {
        Self {
            display,
            message_duration_ms,
            stage: EntryStage::CapturingId,
            entered: String::new(),
            transient: None,
        }
    }

    /// Set the entry prompt.
    ///
    /// Drawn immediately unless a transient message is showing, in which
    /// case it appears once the message expires or is dismissed.
    pub fn show_prompt(&mut self, stage: EntryStage, entered: &str) {
        self.stage = stage;
        self.entered.clear();
        self.entered.push_str(entered);

        if self.transient.is_none() {
            self.draw_prompt();
        }
    }

    /// Show `text` until `now_ms` plus the configured message duration.
    ///
    /// A newer message replaces an older one and restarts the deadline.
    pub fn show_transient(&mut self, text: &str, now_ms: u64) {
        let until_ms = now_ms.saturating_add(self.message_duration_ms);
        trace!(text, until_ms, "Showing transient message");

        if let Err(e) = self.display.show_message(text) {
            warn!(error = %e, text, "Failed to show message");
        }
        self.transient = Some(Transient {
            text: text.to_string(),
            until_ms,
        });
    }

    /// Restore the prompt once the transient deadline has passed.
    pub fn update(&mut self, now_ms: u64) {
        if self
            .transient
            .as_ref()
            .is_some_and(|t| now_ms >= t.until_ms)
        {
            self.transient = None;
            self.draw_prompt();
        }
    }

    /// Drop the transient message early and redraw the prompt.
    ///
    /// Returns `true` if a message was showing.
    pub fn dismiss(&mut self) -> bool {
        if self.transient.take().is_none() {
            return false;
        }
        self.draw_prompt();
        true
    }

    /// Text of the transient message currently showing, if any.
    pub fn transient_message(&self) -> Option<&str> {
        self.transient.as_ref().map(|t| t.text.as_str())
    }

    pub fn display_until(&self) -> Option<u64> {
        self.transient.as_ref().map(|t| t.until_ms)
    }

    fn draw_prompt(&mut self) {
        if let Err(e) = self.display.show_prompt(self.stage, &self.entered) {
            warn!(error = %e, stage = %self.stage, "Failed to draw prompt");
        }
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("message_duration_ms", &self.message_duration_ms)
            .field("stage", &self.stage)
            .field("transient", &self.transient)
            .finish_non_exhaustive()
    }
}
