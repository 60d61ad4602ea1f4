use crate::dns_name::NameOffsets;
use crate::{
    write_bytes, write_u16_be, write_u32_be, write_u8, DnsClass, DnsError, DnsName, DnsReader,
    DnsType, MAX_UDP_MESSAGE_LEN,
};
use core::fmt::{Display, Formatter};
use fixed_buffer::FixedBuf;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const MAX_CHARACTER_STRING_LEN: usize = 255;

/// The type-specific part of a resource record.
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.3>
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DnsRecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(DnsName),
    NS(DnsName),
    PTR(DnsName),
    /// > `PREFERENCE` A 16 bit integer which specifies the preference given to this RR among
    /// > others at the same owner.  Lower values are preferred.
    /// >
    /// > `EXCHANGE` A `<domain-name>` which specifies a host willing to act as a mail exchange for
    /// > the owner name.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.9>
    MX {
        preference: u16,
        exchange: DnsName,
    },
    /// > `TXT-DATA` One or more `<character-string>`s.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.14>
    TXT(Vec<Vec<u8>>),
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.13>
    SOA {
        mname: DnsName,
        rname: DnsName,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    /// Record data of a type this crate does not decode, kept as-is.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc3597>
    Unknown { typ: u16, bytes: Vec<u8> },
}
impl DnsRecordData {
    pub fn typ(&self) -> DnsType {
        match self {
            DnsRecordData::A(_) => DnsType::A,
            DnsRecordData::AAAA(_) => DnsType::AAAA,
            DnsRecordData::CNAME(_) => DnsType::CNAME,
            DnsRecordData::NS(_) => DnsType::NS,
            DnsRecordData::PTR(_) => DnsType::PTR,
            DnsRecordData::MX { .. } => DnsType::MX,
            DnsRecordData::TXT(_) => DnsType::TXT,
            DnsRecordData::SOA { .. } => DnsType::SOA,
            DnsRecordData::Unknown { typ, .. } => DnsType::new(*typ),
        }
    }

    /// Reads exactly `len` bytes of rdata.
    fn read(reader: &mut DnsReader<'_>, typ: DnsType, len: u16) -> Result<Self, DnsError> {
        let end = reader.pos() + usize::from(len);
        let data = match typ {
            DnsType::A => {
                if len != 4 {
                    return Err(DnsError::BadRdataLength(len));
                }
                DnsRecordData::A(Ipv4Addr::from(reader.read_exact::<4>()?))
            }
            DnsType::AAAA => {
                if len != 16 {
                    return Err(DnsError::BadRdataLength(len));
                }
                DnsRecordData::AAAA(Ipv6Addr::from(reader.read_exact::<16>()?))
            }
            DnsType::CNAME => DnsRecordData::CNAME(DnsName::read(reader)?),
            DnsType::NS => DnsRecordData::NS(DnsName::read(reader)?),
            DnsType::PTR => DnsRecordData::PTR(DnsName::read(reader)?),
            DnsType::MX => DnsRecordData::MX {
                preference: reader.read_u16_be()?,
                exchange: DnsName::read(reader)?,
            },
            DnsType::TXT => {
                let mut strings = Vec::new();
                while reader.pos() < end {
                    let string_len = reader.read_u8()?;
                    strings.push(reader.read_bytes(usize::from(string_len))?.to_vec());
                }
                DnsRecordData::TXT(strings)
            }
            DnsType::SOA => DnsRecordData::SOA {
                mname: DnsName::read(reader)?,
                rname: DnsName::read(reader)?,
                serial: reader.read_u32_be()?,
                refresh: reader.read_u32_be()?,
                retry: reader.read_u32_be()?,
                expire: reader.read_u32_be()?,
                minimum: reader.read_u32_be()?,
            },
            DnsType::Unknown(typ) => DnsRecordData::Unknown {
                typ,
                bytes: reader.read_bytes(usize::from(len))?.to_vec(),
            },
        };
        if reader.pos() != end {
            return Err(DnsError::BadRdataLength(len));
        }
        Ok(data)
    }

    /// Writes the rdata without its length.  Names inside rdata are not compressed.
    fn write<const N: usize>(&self, out: &mut FixedBuf<N>) -> Result<(), DnsError> {
        match self {
            DnsRecordData::A(addr) => write_bytes(out, &addr.octets()),
            DnsRecordData::AAAA(addr) => write_bytes(out, &addr.octets()),
            DnsRecordData::CNAME(name) | DnsRecordData::NS(name) | DnsRecordData::PTR(name) => {
                name.write(out, None)
            }
            DnsRecordData::MX {
                preference,
                exchange,
            } => {
                write_u16_be(out, *preference)?;
                exchange.write(out, None)
            }
            DnsRecordData::TXT(strings) => {
                for string in strings {
                    if string.len() > MAX_CHARACTER_STRING_LEN {
                        return Err(DnsError::CharacterStringTooLong);
                    }
                    write_u8(out, string.len() as u8)?;
                    write_bytes(out, string)?;
                }
                Ok(())
            }
            DnsRecordData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                mname.write(out, None)?;
                rname.write(out, None)?;
                for n in [serial, refresh, retry, expire, minimum] {
                    write_u32_be(out, *n)?;
                }
                Ok(())
            }
            DnsRecordData::Unknown { bytes, .. } => write_bytes(out, bytes),
        }
    }
}
impl Display for DnsRecordData {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            DnsRecordData::A(addr) => write!(f, "{}", addr),
            DnsRecordData::AAAA(addr) => write!(f, "{}", addr),
            DnsRecordData::CNAME(name) | DnsRecordData::NS(name) | DnsRecordData::PTR(name) => {
                write!(f, "{}", name.fqdn())
            }
            DnsRecordData::MX {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange.fqdn()),
            DnsRecordData::TXT(strings) => {
                for (n, string) in strings.iter().enumerate() {
                    if n > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "\"")?;
                    for b in string {
                        match b {
                            b'"' | b'\\' => write!(f, "\\{}", char::from(*b))?,
                            0x20..=0x7E => write!(f, "{}", char::from(*b))?,
                            _ => write!(f, "\\{:03}", b)?,
                        }
                    }
                    write!(f, "\"")?;
                }
                Ok(())
            }
            DnsRecordData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{} {} {} {} {} {} {}",
                mname.fqdn(),
                rname.fqdn(),
                serial,
                refresh,
                retry,
                expire,
                minimum
            ),
            // https://datatracker.ietf.org/doc/html/rfc3597#section-5
            DnsRecordData::Unknown { bytes, .. } => {
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    write!(f, " ")?;
                    for b in bytes {
                        write!(f, "{:02x}", b)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// > All RRs have the same top level format shown below:
/// >
/// > ```text
/// >                                 1  1  1  1  1  1
/// >   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                                               |
/// > /                                               /
/// > /                      NAME                     /
/// > |                                               |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                      TYPE                     |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                     CLASS                     |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                      TTL                      |
/// > |                                               |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > |                   RDLENGTH                    |
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
/// > /                     RDATA                     /
/// > /                                               /
/// > +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// > ```
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.3>
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DnsRecord {
    pub name: DnsName,
    pub class: DnsClass,
    /// Seconds
    pub ttl: u32,
    pub data: DnsRecordData,
}
impl DnsRecord {
    pub const DEFAULT_TTL: u32 = 300;

    /// Makes an `IN` class record with the default TTL.
    pub fn new(name: DnsName, data: DnsRecordData) -> Self {
        Self {
            name,
            class: DnsClass::Internet,
            ttl: Self::DEFAULT_TTL,
            data,
        }
    }

    fn parse_name(name: &str) -> Result<DnsName, String> {
        DnsName::new(name).map_err(|e| e.to_string())
    }

    /// # Errors
    /// Returns an error when `name` is not a valid DNS name
    /// or `ipv4_addr` is not a valid IPv4 address.
    pub fn new_a(name: &str, ipv4_addr: &str) -> Result<Self, String> {
        let dns_name = Self::parse_name(name)?;
        let ip_addr: IpAddr = ipv4_addr
            .parse()
            .map_err(|e| format!("failed parsing {:?} as an IP address: {}", ipv4_addr, e))?;
        match ip_addr {
            IpAddr::V4(addr) => Ok(Self::new(dns_name, DnsRecordData::A(addr))),
            IpAddr::V6(addr) => Err(format!(
                "cannot create an A record with ipv6 address {:?}",
                addr
            )),
        }
    }

    /// # Errors
    /// Returns an error when `name` is not a valid DNS name
    /// or `ipv6_addr` is not a valid IPv6 address.
    pub fn new_aaaa(name: &str, ipv6_addr: &str) -> Result<Self, String> {
        let dns_name = Self::parse_name(name)?;
        let ip_addr: IpAddr = ipv6_addr
            .parse()
            .map_err(|e| format!("failed parsing {:?} as an IP address: {}", ipv6_addr, e))?;
        match ip_addr {
            IpAddr::V4(addr) => Err(format!(
                "cannot create an AAAA record with ipv4 address {:?}",
                addr
            )),
            IpAddr::V6(addr) => Ok(Self::new(dns_name, DnsRecordData::AAAA(addr))),
        }
    }

    /// # Errors
    /// Returns an error when `name` or `target` are not both valid DNS names.
    pub fn new_cname(name: &str, target: &str) -> Result<Self, String> {
        let dns_name = Self::parse_name(name)?;
        let target = Self::parse_name(target)?;
        Ok(Self::new(dns_name, DnsRecordData::CNAME(target)))
    }

    /// # Errors
    /// Returns an error when `name` or `exchange` are not both valid DNS names.
    pub fn new_mx(name: &str, preference: u16, exchange: &str) -> Result<Self, String> {
        let dns_name = Self::parse_name(name)?;
        let exchange = Self::parse_name(exchange)?;
        Ok(Self::new(
            dns_name,
            DnsRecordData::MX {
                preference,
                exchange,
            },
        ))
    }

    /// # Errors
    /// Returns an error when `name` is not a valid DNS name or `text` is longer than 255 bytes.
    pub fn new_txt(name: &str, text: &str) -> Result<Self, String> {
        let dns_name = Self::parse_name(name)?;
        if text.len() > MAX_CHARACTER_STRING_LEN {
            return Err(DnsError::CharacterStringTooLong.to_string());
        }
        Ok(Self::new(
            dns_name,
            DnsRecordData::TXT(vec![text.as_bytes().to_vec()]),
        ))
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn name(&self) -> &DnsName {
        &self.name
    }

    pub fn typ(&self) -> DnsType {
        self.data.typ()
    }

    pub(crate) fn read(reader: &mut DnsReader<'_>) -> Result<Self, DnsError> {
        let name = DnsName::read(reader)?;
        let typ = DnsType::new(reader.read_u16_be()?);
        let class = DnsClass::new(reader.read_u16_be()?);
        let ttl = reader.read_u32_be()?;
        let rdata_len = reader.read_u16_be()?;
        if reader.remaining() < usize::from(rdata_len) {
            return Err(DnsError::Truncated);
        }
        // Rdata that runs off the end of the packet also runs past RDLENGTH.
        let data = DnsRecordData::read(reader, typ, rdata_len).map_err(|e| match e {
            DnsError::Truncated => DnsError::BadRdataLength(rdata_len),
            other => other,
        })?;
        Ok(Self {
            name,
            class,
            ttl,
            data,
        })
    }

    pub(crate) fn write<const N: usize>(
        &self,
        out: &mut FixedBuf<N>,
        offsets: &mut NameOffsets,
    ) -> Result<(), DnsError> {
        self.name.write(out, Some(offsets))?;
        write_u16_be(out, self.typ().num())?;
        write_u16_be(out, self.class.num())?;
        write_u32_be(out, self.ttl)?;
        let mut rdata: FixedBuf<MAX_UDP_MESSAGE_LEN> = FixedBuf::new();
        self.data.write(&mut rdata)?;
        // Bounded by the buffer size.
        write_u16_be(out, rdata.len() as u16)?;
        write_bytes(out, rdata.readable())
    }
}
/// Zone file presentation: `name. ttl class type rdata`.
impl Display for DnsRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "{} {} {} {} {}",
            self.name.fqdn(),
            self.ttl,
            self.class,
            self.typ(),
            self.data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DnsName {
        DnsName::new(s).unwrap()
    }

    fn write_record(record: &DnsRecord) -> Vec<u8> {
        let mut out: FixedBuf<512> = FixedBuf::new();
        record.write(&mut out, &mut NameOffsets::new()).unwrap();
        out.readable().to_vec()
    }

    fn read_record(bytes: &[u8]) -> Result<DnsRecord, DnsError> {
        let mut reader = DnsReader::new(bytes);
        let record = DnsRecord::read(&mut reader)?;
        assert_eq!(0, reader.remaining());
        Ok(record)
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            DnsRecord {
                name: name("a.b"),
                class: DnsClass::Internet,
                ttl: 300,
                data: DnsRecordData::A(Ipv4Addr::new(1, 2, 3, 4)),
            },
            DnsRecord::new_a("a.b", "1.2.3.4").unwrap()
        );
        assert_eq!(
            DnsRecordData::AAAA(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0)),
            DnsRecord::new_aaaa("a.b", "2001:db8::").unwrap().data
        );
        assert_eq!(
            DnsRecordData::CNAME(name("c.d")),
            DnsRecord::new_cname("a.b", "c.d").unwrap().data
        );
        assert_eq!(
            DnsRecordData::MX {
                preference: 10,
                exchange: name("mail.a.b")
            },
            DnsRecord::new_mx("a.b", 10, "mail.a.b").unwrap().data
        );
        assert_eq!(3600, DnsRecord::new_a("a.b", "1.2.3.4").unwrap().with_ttl(3600).ttl);
        assert_eq!(
            Err("cannot create an A record with ipv6 address ::1".to_string()),
            DnsRecord::new_a("a.b", "::1")
        );
        assert_eq!(
            Err("cannot create an AAAA record with ipv4 address 1.2.3.4".to_string()),
            DnsRecord::new_aaaa("a.b", "1.2.3.4")
        );
        assert!(DnsRecord::new_a("a.b", "1.2.3").is_err());
        assert_eq!(
            Err("empty label in DNS name \"a..b\"".to_string()),
            DnsRecord::new_cname("a..b", "c.d")
        );
        assert!(DnsRecord::new_txt("a.b", &"x".repeat(256)).is_err());
    }

    #[test]
    fn test_a() {
        let record = DnsRecord::new_a("a.b", "1.2.3.4").unwrap().with_ttl(0x0102_0304);
        let bytes = write_record(&record);
        assert_eq!(
            &[
                1, b'a', 1, b'b', 0, // name
                0, 1, // type
                0, 1, // class
                1, 2, 3, 4, // ttl
                0, 4, // rdlength
                1, 2, 3, 4, // address
            ],
            bytes.as_slice()
        );
        assert_eq!(Ok(record), read_record(&bytes));
    }

    #[test]
    fn test_bad_rdata_length() {
        // A record with 5 bytes of rdata.
        let bytes = [0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 5, 1, 2, 3, 4, 5];
        assert_eq!(Err(DnsError::BadRdataLength(5)), read_record(&bytes));
        // CNAME whose name runs past rdlength.
        let bytes = [0, 0, 5, 0, 1, 0, 0, 0, 0, 0, 2, 1, b'a', 0];
        assert_eq!(Err(DnsError::BadRdataLength(2)), read_record(&bytes));
        // CNAME whose name is shorter than rdlength.
        let bytes = [0, 0, 5, 0, 1, 0, 0, 0, 0, 0, 4, 1, b'a', 0, 0];
        assert_eq!(Err(DnsError::BadRdataLength(4)), read_record(&bytes));
        // TXT string running past rdlength.
        let bytes = [0, 0, 16, 0, 1, 0, 0, 0, 0, 0, 2, 3, b'a', b'b', b'c'];
        assert_eq!(Err(DnsError::BadRdataLength(2)), read_record(&bytes));
        // Rdlength past the end of the message.
        let bytes = [0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 4, 1, 2, 3];
        assert_eq!(Err(DnsError::Truncated), read_record(&bytes));
    }

    #[test]
    fn test_names_in_rdata() {
        for record in [
            DnsRecord::new_cname("a.b", "c.d").unwrap(),
            DnsRecord::new_mx("a.b", 5, "mx.a.b").unwrap(),
            DnsRecord::new(name("b"), DnsRecordData::NS(name("ns1.b"))),
            DnsRecord::new(name("4.3.2.1.in-addr.arpa"), DnsRecordData::PTR(name("a.b"))),
            DnsRecord::new(
                name("b"),
                DnsRecordData::SOA {
                    mname: name("ns1.b"),
                    rname: name("admin.b"),
                    serial: 2024010101,
                    refresh: 7200,
                    retry: 3600,
                    expire: 1209600,
                    minimum: 300,
                },
            ),
        ] {
            assert_eq!(Ok(record.clone()), read_record(&write_record(&record)));
        }
    }

    #[test]
    fn test_compressed_rdata_name() {
        // "b" at 0, then a CNAME record for b pointing at a.b, with a compressed target.
        let bytes = [
            1, b'b', 0, // b
            0xC0, 0, // owner
            0, 5, 0, 1, 0, 0, 0, 60, 0, 4, // type, class, ttl, rdlength
            1, b'a', 0xC0, 0, // a + pointer to b
        ];
        let mut reader = DnsReader::new(&bytes);
        reader.seek(3);
        assert_eq!(
            Ok(DnsRecord::new_cname("b", "a.b").unwrap().with_ttl(60)),
            DnsRecord::read(&mut reader)
        );
    }

    #[test]
    fn test_txt() {
        let record = DnsRecord::new(
            name("a"),
            DnsRecordData::TXT(vec![b"v=spf1 -all".to_vec(), Vec::new()]),
        );
        let bytes = write_record(&record);
        // rdlength, then the first string's length
        assert_eq!(&[0, 13, 11, b'v', b'='], &bytes[11..16]);
        assert_eq!(Ok(record), read_record(&bytes));
        let too_long = DnsRecord::new(name("a"), DnsRecordData::TXT(vec![vec![b'x'; 256]]));
        let mut out: FixedBuf<512> = FixedBuf::new();
        assert_eq!(
            Err(DnsError::CharacterStringTooLong),
            too_long.write(&mut out, &mut NameOffsets::new())
        );
    }

    #[test]
    fn test_unknown() {
        let bytes = [0, 0, 99, 0, 1, 0, 0, 0, 0, 0, 3, 0xAB, 0xCD, 0xEF];
        let record = read_record(&bytes).unwrap();
        assert_eq!(
            DnsRecordData::Unknown {
                typ: 99,
                bytes: vec![0xAB, 0xCD, 0xEF]
            },
            record.data
        );
        assert_eq!(DnsType::Unknown(99), record.typ());
        assert_eq!(bytes.to_vec(), write_record(&record));
        assert_eq!(". 0 IN TYPE99 \\# 3 abcdef", record.to_string());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            "example.com. 3600 IN A 93.184.216.34",
            DnsRecord::new_a("example.com", "93.184.216.34")
                .unwrap()
                .with_ttl(3600)
                .to_string()
        );
        assert_eq!(
            "a.b. 300 IN AAAA 2001:db8::1",
            DnsRecord::new_aaaa("a.b", "2001:db8::1").unwrap().to_string()
        );
        assert_eq!(
            "a.b. 300 IN CNAME c.d.",
            DnsRecord::new_cname("a.b", "c.d").unwrap().to_string()
        );
        assert_eq!(
            "a.b. 300 IN MX 10 mx.a.b.",
            DnsRecord::new_mx("a.b", 10, "mx.a.b").unwrap().to_string()
        );
        assert_eq!(
            "a. 300 IN TXT \"say \\\"hi\\\"\" \"\\009\"",
            DnsRecord::new(
                name("a"),
                DnsRecordData::TXT(vec![b"say \"hi\"".to_vec(), vec![9]])
            )
            .to_string()
        );
        assert_eq!(
            "b. 300 IN SOA ns1.b. admin.b. 1 2 3 4 5",
            DnsRecord::new(
                name("b"),
                DnsRecordData::SOA {
                    mname: name("ns1.b"),
                    rname: name("admin.b"),
                    serial: 1,
                    refresh: 2,
                    retry: 3,
                    expire: 4,
                    minimum: 5,
                },
            )
            .to_string()
        );
    }
}
