//! Keypad entry state machine.
//!
//! Captures an identifier and a passcode in two phases:
//!
//! ```text
//!            digit (≤ max_id_len)          digit (≤ code_len)
//!               ┌─────┐                        ┌─────┐
//!               ▼     │        submit          ▼     │
//!   ───► CapturingId ─┴──(id non-empty)──► CapturingCode ─┘
//!          ▲     │                              │
//!          │     └─submit, id empty:            │ submit:
//!          │       "Enter ID first"             │  complete   → "Checking...", emit request
//!          │                                    │  incomplete → "Incomplete"
//!          └──────────── reset / after submit ──┘
//! ```
//!
//! There is no backspace: an incomplete submission throws away the whole
//! entry and starts over from the identifier.
//!
//! Under [`Protocol::SingleCode`] the identifier phase is skipped and the
//! machine lives in `CapturingCode`.

use doorlock_core::constants::{MSG_CHECKING, MSG_ENTER_ID_FIRST, MSG_INCOMPLETE};
use doorlock_core::{
    ControllerConfig, DigitBuffer, EntryStage, Identifier, KeyAction, Passcode, Protocol,
    VerificationRequest,
};
use tracing::{debug, info, trace, warn};

use crate::screen::Screen;

/// Accumulates keypad digits into a verification request.
#[derive(Debug, Clone)]
pub struct EntryStateMachine {
    protocol: Protocol,
    stage: EntryStage,
    identifier: DigitBuffer,
    passcode: DigitBuffer,
}

impl EntryStateMachine {
    pub fn new(config: &ControllerConfig) -> Self {
        let protocol = config.protocol;
        Self {
            protocol,
            stage: Self::initial_stage(protocol),
            identifier: DigitBuffer::new(config.max_id_len),
            passcode: DigitBuffer::new(config.code_len),
        }
    }

    /// Stage a fresh entry cycle starts in.
    pub fn initial_stage(protocol: Protocol) -> EntryStage {
        match protocol {
            Protocol::IdentifierAndCode => EntryStage::CapturingId,
            Protocol::SingleCode => EntryStage::CapturingCode,
        }
    }

    pub fn stage(&self) -> EntryStage {
        self.stage
    }

    /// Identifier digits entered so far.
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Passcode digits entered so far.
    pub fn passcode(&self) -> &str {
        self.passcode.as_str()
    }

    /// Digits of the accumulator currently receiving input.
    pub fn entered(&self) -> &str {
        match self.stage {
            EntryStage::CapturingId => self.identifier.as_str(),
            EntryStage::CapturingCode => self.passcode.as_str(),
        }
    }

    /// Whether no digits have been captured in this cycle.
    pub fn is_idle(&self) -> bool {
        self.stage == Self::initial_stage(self.protocol)
            && self.identifier.is_empty()
            && self.passcode.is_empty()
    }

    /// Process one key action.
    ///
    /// Returns a request only when a complete entry was submitted. Force-open
    /// and unassigned keys leave the entry untouched.
    pub fn on_key(
        &mut self,
        action: KeyAction,
        screen: &mut Screen,
        now_ms: u64,
    ) -> Option<VerificationRequest> {
        match action {
            KeyAction::Digit(digit) => {
                self.on_digit(digit, screen);
                None
            }
            KeyAction::Reset => {
                debug!("Entry reset by keypad");
                self.reset(screen);
                None
            }
            KeyAction::Submit => self.on_submit(screen, now_ms),
            KeyAction::ForceOpen | KeyAction::Ignored => None,
        }
    }

    /// Clear both accumulators and show the first prompt.
    pub fn reset(&mut self, screen: &mut Screen) {
        self.identifier.clear();
        self.passcode.clear();
        self.stage = Self::initial_stage(self.protocol);
        screen.show_prompt(self.stage, "");
    }

    fn on_digit(&mut self, digit: char, screen: &mut Screen) {
        let buffer = match self.stage {
            EntryStage::CapturingId => &mut self.identifier,
            EntryStage::CapturingCode => &mut self.passcode,
        };

        if buffer.push(digit) {
            screen.show_prompt(self.stage, self.entered());
        } else {
            trace!(stage = %self.stage, "Digit dropped, accumulator full");
        }
    }

    fn on_submit(&mut self, screen: &mut Screen, now_ms: u64) -> Option<VerificationRequest> {
        match self.stage {
            EntryStage::CapturingId => {
                if self.identifier.is_empty() {
                    screen.show_transient(MSG_ENTER_ID_FIRST, now_ms);
                    screen.show_prompt(self.stage, "");
                } else {
                    self.stage = EntryStage::CapturingCode;
                    debug!(identifier = self.identifier.as_str(), "Identifier captured");
                    screen.show_prompt(self.stage, "");
                }
                None
            }
            EntryStage::CapturingCode => {
                let request = self.build_request();
                match &request {
                    Some(_) => screen.show_transient(MSG_CHECKING, now_ms),
                    None => {
                        info!(
                            passcode_len = self.passcode.len(),
                            "Incomplete entry submitted"
                        );
                        screen.show_transient(MSG_INCOMPLETE, now_ms);
                    }
                }
                self.reset(screen);
                request
            }
        }
    }

    fn build_request(&self) -> Option<VerificationRequest> {
        if self.passcode.len() != self.passcode.capacity() {
            return None;
        }

        let passcode = match Passcode::new(self.passcode.as_str(), self.passcode.capacity()) {
            Ok(passcode) => passcode,
            Err(e) => {
                warn!(error = %e, "Rejected captured passcode");
                return None;
            }
        };

        match self.protocol {
            Protocol::SingleCode => Some(VerificationRequest::code_only(passcode)),
            Protocol::IdentifierAndCode => match Identifier::new(self.identifier.as_str()) {
                Ok(identifier) => Some(VerificationRequest::new(identifier, passcode)),
                Err(e) => {
                    debug!(error = %e, "No identifier for request");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_hardware::mock::{MockLcd, MockLcdHandle};
    use rstest::rstest;

    fn setup(protocol: Protocol) -> (EntryStateMachine, Screen, MockLcdHandle) {
        let config = ControllerConfig {
            protocol,
            ..ControllerConfig::default()
        };
        let (lcd, handle) = MockLcd::new();
        let screen = Screen::new(Box::new(lcd), config.message_duration_ms);
        (EntryStateMachine::new(&config), screen, handle)
    }

    fn press(
        machine: &mut EntryStateMachine,
        screen: &mut Screen,
        keys: &str,
    ) -> Vec<VerificationRequest> {
        let keymap = doorlock_core::KeyMap::default();
        keys.chars()
            .filter_map(|key| machine.on_key(keymap.classify(key), screen, 0))
            .collect()
    }

    #[test]
    fn test_complete_entry_emits_request() {
        let (mut machine, mut screen, lcd) = setup(Protocol::IdentifierAndCode);

        let requests = press(&mut machine, &mut screen, "123#4567#");

        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.identifier().map(|id| id.as_str()), Some("123"));
        assert_eq!(request.passcode().as_str(), "4567");

        assert!(machine.is_idle());
        assert_eq!(lcd.last_message().as_deref(), Some("Checking..."));
    }

    #[test]
    fn test_submit_without_identifier() {
        let (mut machine, mut screen, lcd) = setup(Protocol::IdentifierAndCode);

        assert!(press(&mut machine, &mut screen, "#").is_empty());
        assert_eq!(machine.stage(), EntryStage::CapturingId);
        assert_eq!(lcd.last_message().as_deref(), Some("Enter ID first"));
    }

    #[test]
    fn test_entry_continues_after_empty_submit() {
        let (mut machine, mut screen, _lcd) = setup(Protocol::IdentifierAndCode);

        press(&mut machine, &mut screen, "#12");
        assert_eq!(machine.identifier(), "12");
    }

    #[rstest]
    #[case("1##")]
    #[case("1#456#")]
    #[case("12#45#")]
    fn test_incomplete_code_resets_everything(#[case] keys: &str) {
        let (mut machine, mut screen, lcd) = setup(Protocol::IdentifierAndCode);

        assert!(press(&mut machine, &mut screen, keys).is_empty());
        assert!(machine.is_idle());
        assert_eq!(machine.stage(), EntryStage::CapturingId);
        assert_eq!(lcd.last_message().as_deref(), Some("Incomplete"));
    }

    #[test]
    fn test_identifier_capped_at_max_len() {
        let (mut machine, mut screen, _lcd) = setup(Protocol::IdentifierAndCode);

        press(&mut machine, &mut screen, "1234567890");
        assert_eq!(machine.identifier(), "12345678");
    }

    #[test]
    fn test_passcode_capped_at_code_len() {
        let (mut machine, mut screen, _lcd) = setup(Protocol::IdentifierAndCode);

        let requests = press(&mut machine, &mut screen, "7#123456#");
        assert_eq!(requests[0].passcode().as_str(), "1234");
    }

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("123#45")]
    fn test_reset_from_any_state(#[case] keys: &str) {
        let (mut machine, mut screen, lcd) = setup(Protocol::IdentifierAndCode);

        press(&mut machine, &mut screen, keys);
        press(&mut machine, &mut screen, "*");

        assert!(machine.is_idle());
        assert_eq!(lcd.lines(), vec!["Enter ID:", ""]);
    }

    #[test]
    fn test_digits_echoed_to_prompt() {
        let (mut machine, mut screen, lcd) = setup(Protocol::IdentifierAndCode);

        press(&mut machine, &mut screen, "42#7");
        assert_eq!(lcd.lines(), vec!["Enter Code:", "7"]);
    }

    #[rstest]
    #[case('A')]
    #[case('B')]
    #[case('C')]
    #[case('D')]
    fn test_non_entry_keys_have_no_effect(#[case] key: char) {
        let (mut machine, mut screen, lcd) = setup(Protocol::IdentifierAndCode);
        press(&mut machine, &mut screen, "12");
        let updates = lcd.update_count();

        press(&mut machine, &mut screen, &key.to_string());

        assert_eq!(machine.identifier(), "12");
        assert_eq!(lcd.update_count(), updates);
    }

    #[test]
    fn test_single_code_protocol() {
        let (mut machine, mut screen, _lcd) = setup(Protocol::SingleCode);
        assert_eq!(machine.stage(), EntryStage::CapturingCode);

        let requests = press(&mut machine, &mut screen, "9876#");
        assert_eq!(requests.len(), 1);
        assert!(requests[0].identifier().is_none());
        assert_eq!(requests[0].passcode().as_str(), "9876");
        assert_eq!(machine.stage(), EntryStage::CapturingCode);
    }

    #[test]
    fn test_single_code_incomplete() {
        let (mut machine, mut screen, lcd) = setup(Protocol::SingleCode);

        assert!(press(&mut machine, &mut screen, "98#").is_empty());
        assert!(machine.is_idle());
        assert_eq!(lcd.last_message().as_deref(), Some("Incomplete"));
    }
}
