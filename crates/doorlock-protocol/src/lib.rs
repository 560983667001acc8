//! Serial line protocol between the lock controller and its host.
//!
//! Every message is one newline-terminated ASCII line:
//!
//! ```text
//! controller -> host   CHECK:<identifier>:<passcode>
//!                      CODE:<passcode>
//!                      ULTRA:1
//! host -> controller   MATCH | NO_MATCH | NO_LISTING | ERROR | LOCK
//! ```
//!
//! The transport is fire-and-forget: nothing is acknowledged or retried.

pub mod codec;
pub mod error;
pub mod message;

pub use codec::LineCodec;
pub use error::{ProtocolError, Result};
pub use message::{HostReply, OutboundMessage};

/// Separator between the message tag and its fields.
pub const FIELD_SEPARATOR: char = ':';

/// Line terminator appended to every outbound message.
pub const LINE_TERMINATOR: &str = "\n";
