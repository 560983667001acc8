//! Tokio codec for the newline-delimited serial protocol.
//!
//! `LineCodec` decodes host lines into [`HostReply`] values and encodes
//! [`OutboundMessage`] values with their terminator. It can drive a
//! `tokio_util::codec::Framed` stream, or be fed a [`BytesMut`] directly from
//! a polling loop since `decode` never blocks.
//!
//! # DoS Protection
//!
//! Lines longer than the configured maximum are rejected with
//! [`ProtocolError::LineTooLong`]. The codec then discards input up to and
//! including the next newline before decoding resumes.
//!
//! # Examples
//!
//! ```
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//! use doorlock_protocol::{HostReply, LineCodec};
//!
//! let mut codec = LineCodec::new();
//! let mut buf = BytesMut::from("MAT");
//! assert_eq!(codec.decode(&mut buf).unwrap(), None);
//!
//! buf.extend_from_slice(b"CH\r\n");
//! assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::Match));
//! ```

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{HostReply, OutboundMessage, ProtocolError, Result};

/// Default maximum line length in bytes, excluding the terminator.
const DEFAULT_MAX_LINE_LENGTH: usize = 256;

/// Newline-delimited codec for controller/host traffic.
#[derive(Debug)]
pub struct LineCodec {
    /// Bytes already scanned for a newline, so each byte is scanned once.
    next_index: usize,

    max_line_length: usize,

    /// Set after an oversize line until its terminator has been skipped.
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default 256 byte line limit.
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec with a custom line limit.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            next_index: 0,
            max_line_length,
            discarding: false,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn parse_line(line: &[u8]) -> Result<Option<HostReply>> {
        let text = std::str::from_utf8(line).map_err(|_| ProtocolError::InvalidUtf8)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(HostReply::parse(text)))
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = HostReply;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<HostReply>> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    src.advance(self.next_index + offset + 1);
                    self.discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset;
                    self.next_index = 0;
                    let line = src.split_to(end + 1);
                    let line = &line[..end];

                    if line.len() > self.max_line_length {
                        return Err(ProtocolError::LineTooLong {
                            length: line.len(),
                            max: self.max_line_length,
                        });
                    }

                    // Blank lines carry nothing; keep scanning.
                    if let Some(reply) = Self::parse_line(line)? {
                        return Ok(Some(reply));
                    }
                }
                (false, None) if src.len() > self.max_line_length => {
                    let length = src.len();
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                    return Err(ProtocolError::LineTooLong {
                        length,
                        max: self.max_line_length,
                    });
                }
                (false, None) => {
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<HostReply>> {
        if let Some(reply) = self.decode(src)? {
            return Ok(Some(reply));
        }

        if src.is_empty() || self.discarding {
            src.clear();
            return Ok(None);
        }

        // Trailing line without a terminator.
        let line = src.split();
        self.next_index = 0;
        Self::parse_line(&line)
    }
}

impl Encoder<OutboundMessage> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: OutboundMessage, dst: &mut BytesMut) -> Result<()> {
        let line = item.encode_line();
        dst.reserve(line.len());
        dst.put_slice(line.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_multiple_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("MATCH\nNO_MATCH\n");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::Match));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::NoMatch));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("\r\n\n  \nERROR\n");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::Error));
    }

    #[test]
    fn test_decode_partial_line_waits() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("NO_LIS");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(buf.len(), 6);

        buf.extend_from_slice(b"TING\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::NoListing));
    }

    #[test]
    fn test_oversize_line_is_discarded() {
        let mut codec = LineCodec::with_max_line_length(8);
        let mut buf = BytesMut::from("AAAAAAAAAAAA");

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::LineTooLong { length: 12, max: 8 })
        ));

        buf.extend_from_slice(b"AAAA\nMATCH\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::Match));
    }

    #[test]
    fn test_oversize_complete_line_is_rejected() {
        let mut codec = LineCodec::with_max_line_length(4);
        let mut buf = BytesMut::from("NO_MATCH\nLOCK\n");

        assert!(codec.decode(&mut buf).is_err());
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(HostReply::Lock));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"\xff\xfe\n"[..]);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::InvalidUtf8)
        ));
    }

    #[test]
    fn test_decode_eof_flushes_trailing_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("LOCK");

        assert_eq!(codec.decode_eof(&mut buf).unwrap(), Some(HostReply::Lock));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode(OutboundMessage::Obstruction, &mut buf).unwrap();
        codec
            .encode(
                OutboundMessage::Code {
                    passcode: "1234".to_string(),
                },
                &mut buf,
            )
            .unwrap();

        assert_eq!(&buf[..], b"ULTRA:1\nCODE:1234\n");
    }
}
