//! Line messages exchanged with the host.

use std::fmt;

use doorlock_core::VerificationRequest;
use serde::{Deserialize, Serialize};

use crate::{FIELD_SEPARATOR, LINE_TERMINATOR};

/// Tag of a two-phase verification request.
pub const CHECK_TAG: &str = "CHECK";

/// Tag of a single-code verification request.
pub const CODE_TAG: &str = "CODE";

/// Full text of the obstruction telemetry line.
pub const OBSTRUCTION_LINE: &str = "ULTRA:1";

/// Message sent from the controller to the host.
///
/// `Display` renders the line text without its terminator.
///
/// # Examples
///
/// ```
/// use doorlock_protocol::OutboundMessage;
///
/// let msg = OutboundMessage::Check {
///     identifier: "123".to_string(),
///     passcode: "4567".to_string(),
/// };
/// assert_eq!(msg.to_string(), "CHECK:123:4567");
/// assert_eq!(msg.encode_line(), "CHECK:123:4567\n");
/// assert_eq!(OutboundMessage::Obstruction.to_string(), "ULTRA:1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// `CHECK:<identifier>:<passcode>`
    Check { identifier: String, passcode: String },

    /// `CODE:<passcode>`
    Code { passcode: String },

    /// `ULTRA:1`
    Obstruction,
}

impl OutboundMessage {
    /// Build the wire message for a completed entry.
    ///
    /// Requests with an identifier use `CHECK`, code-only requests use `CODE`.
    #[must_use]
    pub fn from_request(request: &VerificationRequest) -> Self {
        let passcode = request.passcode().as_str().to_string();
        match request.identifier() {
            Some(identifier) => OutboundMessage::Check {
                identifier: identifier.as_str().to_string(),
                passcode,
            },
            None => OutboundMessage::Code { passcode },
        }
    }

    /// Line text including the terminator.
    #[must_use]
    pub fn encode_line(&self) -> String {
        format!("{self}{LINE_TERMINATOR}")
    }

    /// Short label for logging that never includes credentials.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Check { .. } => CHECK_TAG,
            OutboundMessage::Code { .. } => CODE_TAG,
            OutboundMessage::Obstruction => "ULTRA",
        }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundMessage::Check {
                identifier,
                passcode,
            } => write!(
                f,
                "{CHECK_TAG}{FIELD_SEPARATOR}{identifier}{FIELD_SEPARATOR}{passcode}"
            ),
            OutboundMessage::Code { passcode } => {
                write!(f, "{CODE_TAG}{FIELD_SEPARATOR}{passcode}")
            }
            OutboundMessage::Obstruction => f.write_str(OBSTRUCTION_LINE),
        }
    }
}

/// Line received from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostReply {
    /// Credentials accepted; the door should unlock.
    Match,

    /// Passcode did not match the identifier.
    NoMatch,

    /// No record exists for the identifier.
    NoListing,

    /// Host failed while evaluating the request.
    Error,

    /// Host asks for the door to be locked.
    Lock,

    /// Anything else, kept verbatim for logging.
    Unknown(String),
}

impl HostReply {
    /// Parse one host line. Surrounding whitespace and `\r` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_protocol::HostReply;
    ///
    /// assert_eq!(HostReply::parse("MATCH\r"), HostReply::Match);
    /// assert_eq!(HostReply::parse("NO_LISTING"), HostReply::NoListing);
    /// assert_eq!(HostReply::parse("HELLO"), HostReply::Unknown("HELLO".to_string()));
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "MATCH" => HostReply::Match,
            "NO_MATCH" => HostReply::NoMatch,
            "NO_LISTING" => HostReply::NoListing,
            "ERROR" => HostReply::Error,
            "LOCK" => HostReply::Lock,
            other => HostReply::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for HostReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostReply::Match => f.write_str("MATCH"),
            HostReply::NoMatch => f.write_str("NO_MATCH"),
            HostReply::NoListing => f.write_str("NO_LISTING"),
            HostReply::Error => f.write_str("ERROR"),
            HostReply::Lock => f.write_str("LOCK"),
            HostReply::Unknown(line) => f.write_str(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_core::{Identifier, Passcode};
    use rstest::rstest;

    #[test]
    fn test_check_from_request() {
        let request = VerificationRequest::new(
            Identifier::new("123").unwrap(),
            Passcode::new("4567", 4).unwrap(),
        );
        let msg = OutboundMessage::from_request(&request);
        assert_eq!(msg.encode_line(), "CHECK:123:4567\n");
        assert_eq!(msg.kind(), "CHECK");
    }

    #[test]
    fn test_code_from_request() {
        let request = VerificationRequest::code_only(Passcode::new("0042", 4).unwrap());
        let msg = OutboundMessage::from_request(&request);
        assert_eq!(msg.encode_line(), "CODE:0042\n");
    }

    #[test]
    fn test_obstruction_line() {
        assert_eq!(OutboundMessage::Obstruction.encode_line(), "ULTRA:1\n");
    }

    #[rstest]
    #[case("MATCH", HostReply::Match)]
    #[case("NO_MATCH", HostReply::NoMatch)]
    #[case("NO_LISTING", HostReply::NoListing)]
    #[case("ERROR", HostReply::Error)]
    #[case("LOCK", HostReply::Lock)]
    #[case("  MATCH \r", HostReply::Match)]
    #[case("match", HostReply::Unknown("match".to_string()))]
    fn test_parse_host_reply(#[case] line: &str, #[case] expected: HostReply) {
        assert_eq!(HostReply::parse(line), expected);
    }
}
