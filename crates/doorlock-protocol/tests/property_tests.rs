//! Property-based tests for the serial line protocol.

use bytes::BytesMut;
use doorlock_core::{Identifier, Passcode, VerificationRequest};
use doorlock_protocol::{HostReply, LineCodec, OutboundMessage};
use proptest::prelude::*;
use tokio_util::codec::Decoder;

/// Identifiers are 1-8 digits.
fn valid_identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{1,8}").expect("Failed to create identifier strategy")
}

/// Passcodes are exactly 4 digits.
fn valid_passcode() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{4}").expect("Failed to create passcode strategy")
}

/// Arbitrary printable host lines without a newline.
fn host_line() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,40}").expect("Failed to create host line strategy")
}

proptest! {
    /// Property: a CHECK line has exactly three colon-separated fields and a
    /// single terminator.
    #[test]
    fn prop_check_line_shape(identifier in valid_identifier(), passcode in valid_passcode()) {
        let request = VerificationRequest::new(
            Identifier::new(&identifier).unwrap(),
            Passcode::new(&passcode, 4).unwrap(),
        );
        let line = OutboundMessage::from_request(&request).encode_line();

        prop_assert!(line.is_ascii());
        prop_assert_eq!(line.matches('\n').count(), 1);
        prop_assert!(line.ends_with('\n'));

        let fields: Vec<&str> = line.trim_end().split(':').collect();
        prop_assert_eq!(fields, vec!["CHECK", identifier.as_str(), passcode.as_str()]);
    }

    /// Property: the decoder yields one reply per non-blank line, in order,
    /// regardless of how the bytes are chunked.
    #[test]
    fn prop_decoder_chunking_invariant(
        lines in prop::collection::vec(host_line(), 0..8),
        chunk in 1usize..16,
    ) {
        let wire: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let expected: Vec<HostReply> = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| HostReply::parse(l))
            .collect();

        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();

        for piece in wire.as_bytes().chunks(chunk) {
            buf.extend_from_slice(piece);
            while let Some(reply) = codec.decode(&mut buf).unwrap() {
                decoded.push(reply);
            }
        }

        prop_assert_eq!(decoded, expected);
        prop_assert!(buf.is_empty());
    }
}
