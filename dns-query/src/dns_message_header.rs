use crate::{write_u16_be, write_u8, DnsError, DnsOpCode, DnsReader, DnsResponseCode};
use fixed_buffer::FixedBuf;

/// > 4.1.1. Header section format
/// >
/// > The header contains the following fields:
/// >
/// > ```text
/// >                                 1  1  1  1  1  1
/// >   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                      ID                       |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                    QDCOUNT                    |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                    ANCOUNT                    |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                    NSCOUNT                    |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                    ARCOUNT                    |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > ```
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DnsMessageHeader {
    /// > `ID` A 16 bit identifier assigned by the program that generates any kind of query.  This
    /// > identifier is copied the corresponding reply and can be used by the requester to match up
    /// > replies to outstanding queries.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
    pub id: u16,
    /// > `QR` A one bit field that specifies whether this message is a query (`0`),
    /// > or a response (`1`).
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
    pub is_response: bool,
    pub op_code: DnsOpCode,
    /// > `AA` Authoritative Answer - this bit is valid in responses, and specifies that the
    /// > responding name server is an authority for the domain name in question section.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
    pub authoritative_answer: bool,
    /// > `TC` TrunCation - specifies that this message was truncated due to length greater than
    /// > that permitted on the transmission channel.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
    pub truncated: bool,
    /// > `RD` Recursion Desired - this bit may be set in a query and is copied into the response.
    /// > If RD is set, it directs the name server to pursue the query recursively.  Recursive query
    /// > support is optional.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
    pub recursion_desired: bool,
    /// > `RA` Recursion Available - this be is set or cleared in a response, and denotes whether
    /// > recursive query support is available in the name server.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1>
    pub recursion_available: bool,
    pub response_code: DnsResponseCode,
    pub question_count: u16,
    pub answer_count: u16,
    pub name_server_count: u16,
    pub additional_count: u16,
}
impl DnsMessageHeader {
    pub const LEN: usize = 12;

    /// A standard query header with recursion desired and no counts.
    pub fn query(id: u16) -> Self {
        Self {
            id,
            is_response: false,
            op_code: DnsOpCode::Query,
            authoritative_answer: false,
            truncated: false,
            recursion_desired: true,
            recursion_available: false,
            response_code: DnsResponseCode::NoError,
            question_count: 0,
            answer_count: 0,
            name_server_count: 0,
            additional_count: 0,
        }
    }

    /// A header answering `self`, with the id, op code, and RD bit copied and the AA bit set.
    pub fn response(&self, response_code: DnsResponseCode) -> Self {
        Self {
            id: self.id,
            is_response: true,
            op_code: self.op_code,
            authoritative_answer: true,
            truncated: false,
            recursion_desired: self.recursion_desired,
            recursion_available: false,
            response_code,
            question_count: 0,
            answer_count: 0,
            name_server_count: 0,
            additional_count: 0,
        }
    }

    pub(crate) fn read(reader: &mut DnsReader<'_>) -> Result<Self, DnsError> {
        let bytes: [u8; Self::LEN] = reader.read_exact()?;
        Ok(Self {
            id: u16::from_be_bytes([bytes[0], bytes[1]]),
            is_response: (bytes[2] >> 7) == 1,
            op_code: DnsOpCode::new((bytes[2] >> 3) & 0xF),
            authoritative_answer: ((bytes[2] >> 2) & 1) == 1,
            truncated: ((bytes[2] >> 1) & 1) == 1,
            recursion_desired: (bytes[2] & 1) == 1,
            recursion_available: (bytes[3] >> 7) == 1,
            response_code: DnsResponseCode::new(bytes[3] & 0xF),
            question_count: u16::from_be_bytes([bytes[4], bytes[5]]),
            answer_count: u16::from_be_bytes([bytes[6], bytes[7]]),
            name_server_count: u16::from_be_bytes([bytes[8], bytes[9]]),
            additional_count: u16::from_be_bytes([bytes[10], bytes[11]]),
        })
    }

    pub(crate) fn write<const N: usize>(&self, out: &mut FixedBuf<N>) -> Result<(), DnsError> {
        write_u16_be(out, self.id)?;
        let b = ((self.is_response as u8) << 7)
            | ((self.op_code.num() & 0xF) << 3)
            | ((self.authoritative_answer as u8) << 2)
            | ((self.truncated as u8) << 1)
            | (self.recursion_desired as u8);
        write_u8(out, b)?;
        let b = ((self.recursion_available as u8) << 7) | (self.response_code.num() & 0xF);
        write_u8(out, b)?;
        for count in [
            self.question_count,
            self.answer_count,
            self.name_server_count,
            self.additional_count,
        ] {
            write_u16_be(out, count)?;
        }
        Ok(())
    }

    /// Mnemonics of the set flag bits, as `dig` prints them.
    pub fn flag_names(&self) -> Vec<&'static str> {
        [
            (self.is_response, "QR"),
            (self.authoritative_answer, "AA"),
            (self.truncated, "TC"),
            (self.recursion_desired, "RD"),
            (self.recursion_available, "RA"),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| *name)
        .collect()
    }
}
