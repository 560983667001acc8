//! Virtual character LCD.
//!
//! A `lines` x `columns` text buffer that behaves like the HD44780 panel on
//! the lock: text is ASCII only, control characters are dropped and anything
//! past the last column is cut off. Used by [`MockLcd`](crate::mock::MockLcd)
//! and by the simulator to render the screen.
//!
//! # Examples
//!
//! ```
//! use doorlock_core::EntryStage;
//! use doorlock_hardware::lcd::VirtualLcd;
//!
//! let mut lcd = VirtualLcd::new(2, 16);
//! lcd.render_prompt(EntryStage::CapturingId, "123");
//!
//! assert_eq!(lcd.line(0).unwrap().trim_end(), "Enter ID:");
//! assert_eq!(lcd.line(1).unwrap().trim_end(), "123");
//! ```

use doorlock_core::EntryStage;

use crate::{HardwareError, Result};

/// Text alignment within a display line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Text starts at column 0, padded with spaces on the right.
    Left,
    /// Text centered, extra space on the right if odd.
    Center,
}

/// Character LCD buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualLcd {
    columns: usize,
    buffer: Vec<String>,
}

impl VirtualLcd {
    /// Create a blank display.
    pub fn new(lines: usize, columns: usize) -> Self {
        Self {
            columns,
            buffer: vec![" ".repeat(columns); lines],
        }
    }

    /// Fill every line with spaces.
    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
    }

    /// Set text on a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn set_line(&mut self, line: usize, text: &str, align: Alignment) -> Result<()> {
        let columns = self.columns;
        let slot = self.buffer.get_mut(line).ok_or_else(|| {
            HardwareError::invalid_data(format!("LCD has no line {line}"))
        })?;
        *slot = align_text(&sanitize_text(text), columns, align);
        Ok(())
    }

    /// Draw the entry prompt: stage label on the first line, digits on the second.
    pub fn render_prompt(&mut self, stage: EntryStage, entered: &str) {
        self.clear();
        let _ = self.set_line(0, stage.prompt(), Alignment::Left);
        let _ = self.set_line(1, entered, Alignment::Left);
    }

    /// Clear the screen and show a single message on the first line.
    pub fn render_message(&mut self, text: &str) {
        self.clear();
        let _ = self.set_line(0, text, Alignment::Left);
    }

    /// Get a line, padded to the column width.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.buffer.get(line).map(String::as_str)
    }

    pub fn lines(&self) -> Vec<&str> {
        self.buffer.iter().map(String::as_str).collect()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

/// Truncate ASCII text to a maximum number of characters.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::lcd::truncate_text;
///
/// assert_eq!(truncate_text("Object Detected!", 6), "Object");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Align text within a fixed width, padding with spaces.
///
/// The result is always exactly `width` characters.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::lcd::{Alignment, align_text};
///
/// assert_eq!(align_text("OK", 6, Alignment::Left), "OK    ");
/// assert_eq!(align_text("OK", 6, Alignment::Center), "  OK  ");
/// ```
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let truncated = truncate_text(text, width);
    let len = truncated.chars().count();
    let padding = width - len;

    match alignment {
        Alignment::Left => format!("{}{}", truncated, " ".repeat(padding)),
        Alignment::Center => {
            let left = padding / 2;
            let right = padding - left;
            format!("{}{}{}", " ".repeat(left), truncated, " ".repeat(right))
        }
    }
}

/// Keep printable ASCII only; the panel's character ROM has nothing else.
fn sanitize_text(text: &str) -> String {
    text.chars().filter(|c| matches!(c, ' '..='~')).collect()
}
