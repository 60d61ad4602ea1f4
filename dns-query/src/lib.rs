//! [![license: Apache 2.0](https://gitlab.com/leonhard-llc/ops/-/raw/main/license-apache-2.0.svg)](https://gitlab.com/leonhard-llc/ops/-/raw/main/dns-query/LICENSE)
//! [![unsafe forbidden](https://gitlab.com/leonhard-llc/ops/-/raw/main/unsafe-forbidden.svg)](https://github.com/rust-secure-code/safety-dance/)
//! [![pipeline status](https://gitlab.com/leonhard-llc/ops/badges/main/pipeline.svg)](https://gitlab.com/leonhard-llc/ops/-/pipelines)
//!
//! # dns-query
//!
//! A small DNS client library and command-line tool.
//! It builds one query, sends it over UDP, waits for the matching reply, and decodes it.
//!
//! ## Use Cases
//! - Poke at a DNS server you are developing, like `dig` but with a library you can call
//!   from integration tests.
//! - Run a tiny static responder in tests and query it.
//!
//! ## Features
//! - RFC 1035 message codec with name compression
//! - Random transaction ids, reply matching, and a hard receive timeout
//! - Unknown record types are kept as opaque bytes
//! - A threaded static responder, `serve_udp`
//! - `forbid(unsafe_code)`
//!
//! ## Limitations
//! - UDP only.  Truncated replies are returned as-is, with no TCP retry.
//! - No EDNS, no DNSSEC, no caching, no retries.
//! - Messages are limited to 512 bytes.
//!
//! ## Example
//! ```no_run
//! use dns_query::DnsClient;
//! use std::net::{IpAddr, Ipv4Addr};
//! use std::time::Duration;
//!
//! let client = DnsClient::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000)
//!     .with_timeout(Duration::from_millis(500));
//! let response = client.lookup("example.com", "A").unwrap();
//! print!("{}", response);
//! ```
//!
//! ## Changelog
//! - v0.1.0 - Initial version
#![forbid(unsafe_code)]

mod client;
mod dns_class;
mod dns_message;
mod dns_message_header;
mod dns_name;
mod dns_op_code;
mod dns_question;
mod dns_record;
mod dns_response_code;
mod dns_type;
mod server;

pub use client::{
    query, DnsClient, DEFAULT_PORT, DEFAULT_QUERY_TYPE, DEFAULT_SERVER, DEFAULT_TIMEOUT,
};
pub use dns_class::DnsClass;
pub use dns_message::DnsMessage;
pub use dns_message_header::DnsMessageHeader;
pub use dns_name::DnsName;
pub use dns_op_code::DnsOpCode;
pub use dns_question::DnsQuestion;
pub use dns_record::{DnsRecord, DnsRecordData};
pub use dns_response_code::DnsResponseCode;
pub use dns_type::DnsType;
pub use server::{process_datagram, process_request, serve_udp};

use core::time::Duration;
use fixed_buffer::FixedBuf;

/// > Messages carried by UDP are restricted to 512 bytes (not counting the IP
/// > or UDP headers).
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1>
pub const MAX_UDP_MESSAGE_LEN: usize = 512;

/// Sequential reader over one whole message.
/// Name decoding follows compression pointers into `packet`.
pub(crate) struct DnsReader<'a> {
    packet: &'a [u8],
    pos: usize,
}
impl<'a> DnsReader<'a> {
    pub fn new(packet: &'a [u8]) -> Self {
        Self { packet, pos: 0 }
    }

    pub fn packet(&self) -> &'a [u8] {
        self.packet
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.packet.len().saturating_sub(self.pos)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DnsError> {
        let end = self.pos.checked_add(len).ok_or(DnsError::Truncated)?;
        let bytes = self.packet.get(self.pos..end).ok_or(DnsError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_exact<const M: usize>(&mut self) -> Result<[u8; M], DnsError> {
        let mut result = [0_u8; M];
        result.copy_from_slice(self.read_bytes(M)?);
        Ok(result)
    }

    pub fn read_u8(&mut self) -> Result<u8, DnsError> {
        let bytes: [u8; 1] = self.read_exact()?;
        Ok(bytes[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DnsError> {
        Ok(u16::from_be_bytes(self.read_exact()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DnsError> {
        Ok(u32::from_be_bytes(self.read_exact()?))
    }
}

fn write_bytes<const N: usize>(out: &mut FixedBuf<N>, bytes: &[u8]) -> Result<(), DnsError> {
    out.write_bytes(bytes)
        .map_err(|_| DnsError::ResponseBufferFull)?;
    Ok(())
}

fn write_u8<const N: usize>(out: &mut FixedBuf<N>, value: u8) -> Result<(), DnsError> {
    write_bytes(out, &[value])
}

fn write_u16_be<const N: usize>(out: &mut FixedBuf<N>, value: u16) -> Result<(), DnsError> {
    write_bytes(out, &value.to_be_bytes())
}

fn write_u32_be<const N: usize>(out: &mut FixedBuf<N>, value: u32) -> Result<(), DnsError> {
    write_bytes(out, &value.to_be_bytes())
}

/// Broad category of a [`DnsError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DnsErrorKind {
    /// The caller supplied a bad name, type, or message.  Retrying will not help.
    Encoding,
    /// The peer sent bytes that are not a valid DNS message.
    MalformedMessage,
    /// No matching reply arrived in time.
    Timeout,
    /// A socket operation failed.
    Transport,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum DnsError {
    #[error("empty label in DNS name {0:?}")]
    EmptyLabel(String),
    #[error("label {0:?} is longer than 63 octets")]
    LabelTooLong(String),
    #[error("DNS name {0:?} is longer than 255 octets")]
    NameTooLong(String),
    #[error("invalid character in DNS name {0:?}")]
    InvalidLabel(String),
    #[error("unknown record type {0:?}")]
    UnknownType(String),
    #[error("character-string is longer than 255 octets")]
    CharacterStringTooLong,
    #[error("too many questions")]
    TooManyQuestions,
    #[error("too many answer records")]
    TooManyAnswers,
    #[error("too many name server records")]
    TooManyNameServers,
    #[error("too many additional records")]
    TooManyAdditional,
    #[error("message does not fit in the output buffer")]
    ResponseBufferFull,
    #[error("message is truncated")]
    Truncated,
    #[error("name compression pointer at offset {0} does not point backward")]
    PointerLoop(usize),
    #[error("name compression pointer at offset {0} points outside the message")]
    BadPointer(usize),
    #[error("unsupported label type at offset {0}")]
    BadLabelType(usize),
    #[error("malformed name at offset {0}")]
    MalformedName(usize),
    #[error("rdata length {0} does not match the record data")]
    BadRdataLength(u16),
    #[error("{0} unexpected bytes after the last record")]
    TrailingBytes(usize),
    #[error("message is not a request")]
    NotARequest,
    #[error("request has no question")]
    NoQuestion,
    #[error("timed out after {0:?} waiting for a reply")]
    Timeout(Duration),
    #[error("{0}")]
    Transport(String),
}
impl DnsError {
    pub fn kind(&self) -> DnsErrorKind {
        match self {
            DnsError::EmptyLabel(_)
            | DnsError::LabelTooLong(_)
            | DnsError::NameTooLong(_)
            | DnsError::InvalidLabel(_)
            | DnsError::UnknownType(_)
            | DnsError::CharacterStringTooLong
            | DnsError::TooManyQuestions
            | DnsError::TooManyAnswers
            | DnsError::TooManyNameServers
            | DnsError::TooManyAdditional
            | DnsError::ResponseBufferFull => DnsErrorKind::Encoding,
            DnsError::Truncated
            | DnsError::PointerLoop(_)
            | DnsError::BadPointer(_)
            | DnsError::BadLabelType(_)
            | DnsError::MalformedName(_)
            | DnsError::BadRdataLength(_)
            | DnsError::TrailingBytes(_)
            | DnsError::NotARequest
            | DnsError::NoQuestion => DnsErrorKind::MalformedMessage,
            DnsError::Timeout(_) => DnsErrorKind::Timeout,
            DnsError::Transport(_) => DnsErrorKind::Transport,
        }
    }

    /// Only timeouts are worth retrying.  The caller decides whether to.
    pub fn is_retryable(&self) -> bool {
        self.kind() == DnsErrorKind::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader() {
        let mut reader = DnsReader::new(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Ok(1), reader.read_u8());
        assert_eq!(Ok(0x0203), reader.read_u16_be());
        assert_eq!(Ok(0x0405_0607), reader.read_u32_be());
        assert_eq!(1, reader.remaining());
        assert_eq!(Err(DnsError::Truncated), reader.read_u16_be());
        assert_eq!(7, reader.pos());
        assert_eq!(Ok(&[8_u8][..]), reader.read_bytes(1));
        assert_eq!(0, reader.remaining());
        assert_eq!(Err(DnsError::Truncated), reader.read_u8());
        assert_eq!(Err(DnsError::Truncated), reader.read_bytes(usize::MAX));
    }

    #[test]
    fn test_write_helpers() {
        let mut out: FixedBuf<8> = FixedBuf::new();
        write_u8(&mut out, 1).unwrap();
        write_u16_be(&mut out, 0x0203).unwrap();
        write_u32_be(&mut out, 0x0405_0607).unwrap();
        assert_eq!(&[1, 2, 3, 4, 5, 6, 7], out.readable());
        assert_eq!(
            Err(DnsError::ResponseBufferFull),
            write_u16_be(&mut out, 0xFFFF)
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            DnsErrorKind::Encoding,
            DnsError::LabelTooLong("a".to_string()).kind()
        );
        assert_eq!(
            DnsErrorKind::Encoding,
            DnsError::UnknownType("BOGUS".to_string()).kind()
        );
        assert_eq!(DnsErrorKind::MalformedMessage, DnsError::PointerLoop(12).kind());
        assert_eq!(DnsErrorKind::MalformedMessage, DnsError::Truncated.kind());
        assert_eq!(
            DnsErrorKind::Timeout,
            DnsError::Timeout(Duration::from_millis(500)).kind()
        );
        assert_eq!(
            DnsErrorKind::Transport,
            DnsError::Transport("x".to_string()).kind()
        );
        assert!(DnsError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!DnsError::Truncated.is_retryable());
        assert!(!DnsError::Transport("x".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            "unknown record type \"BOGUS\"",
            DnsError::UnknownType("BOGUS".to_string()).to_string()
        );
        assert_eq!(
            "timed out after 500ms waiting for a reply",
            DnsError::Timeout(Duration::from_millis(500)).to_string()
        );
        assert_eq!(
            "error sending query: denied",
            DnsError::Transport("error sending query: denied".to_string()).to_string()
        );
    }
}
