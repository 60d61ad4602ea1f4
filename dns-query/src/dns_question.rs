use crate::dns_name::NameOffsets;
use crate::{write_u16_be, DnsClass, DnsError, DnsName, DnsReader, DnsType};
use core::fmt::{Display, Formatter};
use fixed_buffer::FixedBuf;

/// > ```text
/// >                                 1  1  1  1  1  1
/// >   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                                               |
/// > /                     QNAME                     /
/// > /                                               /
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                     QTYPE                     |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                     QCLASS                    |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > ```
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2>
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DnsQuestion {
    pub name: DnsName,
    pub typ: DnsType,
    pub class: DnsClass,
}
impl DnsQuestion {
    /// Makes an `IN` class question.
    pub fn new(name: DnsName, typ: DnsType) -> Self {
        Self {
            name,
            typ,
            class: DnsClass::Internet,
        }
    }

    /// # Errors
    /// Returns an error when `name` is not a valid DNS name or `typ` is not a known record type.
    pub fn parse(name: &str, typ: &str) -> Result<Self, DnsError> {
        Ok(Self::new(DnsName::new(name)?, typ.parse()?))
    }

    pub(crate) fn read(reader: &mut DnsReader<'_>) -> Result<Self, DnsError> {
        let name = DnsName::read(reader)?;
        let typ = DnsType::new(reader.read_u16_be()?);
        let class = DnsClass::new(reader.read_u16_be()?);
        Ok(Self { name, typ, class })
    }

    pub(crate) fn write<const N: usize>(
        &self,
        out: &mut FixedBuf<N>,
        offsets: &mut NameOffsets,
    ) -> Result<(), DnsError> {
        self.name.write(out, Some(offsets))?;
        write_u16_be(out, self.typ.num())?;
        write_u16_be(out, self.class.num())
    }
}
impl Display for DnsQuestion {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{} {} {}", self.name.fqdn(), self.class, self.typ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            Ok(DnsQuestion {
                name: DnsName::new("example.com").unwrap(),
                typ: DnsType::MX,
                class: DnsClass::Internet,
            }),
            DnsQuestion::parse("Example.COM.", "mx")
        );
        assert_eq!(
            Err(DnsError::UnknownType("BOGUS".to_string())),
            DnsQuestion::parse("example.com", "BOGUS")
        );
        assert_eq!(
            Err(DnsError::EmptyLabel("a..b".to_string())),
            DnsQuestion::parse("a..b", "A")
        );
    }

    #[test]
    fn test_read_write() {
        let question = DnsQuestion::parse("aaa.example.com", "AAAA").unwrap();
        let mut out: FixedBuf<64> = FixedBuf::new();
        question.write(&mut out, &mut NameOffsets::new()).unwrap();
        let expected: &[u8] = &[
            3, b'a', b'a', b'a', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o',
            b'm', 0, 0, 28, 0, 1,
        ];
        assert_eq!(expected, out.readable());
        let mut reader = DnsReader::new(expected);
        assert_eq!(Ok(question), DnsQuestion::read(&mut reader));
        assert_eq!(0, reader.remaining());
        assert_eq!(
            Err(DnsError::Truncated),
            DnsQuestion::read(&mut DnsReader::new(&expected[..19]))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            "example.com. IN A",
            DnsQuestion::parse("example.com", "A").unwrap().to_string()
        );
        assert_eq!(
            ". IN NS",
            DnsQuestion::parse(".", "NS").unwrap().to_string()
        );
        assert_eq!(
            "example.com. CH TYPE65",
            DnsQuestion {
                class: DnsClass::Chaos,
                ..DnsQuestion::parse("example.com", "TYPE65").unwrap()
            }
            .to_string()
        );
    }
}
