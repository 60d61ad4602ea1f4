use crate::DnsError;
use core::fmt::{Display, Formatter};
use core::str::FromStr;

/// > TYPE fields are used in resource records.  Note that these types are a subset of QTYPEs.
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.2>
///
/// > A record type is defined to store a host's IPv6 address.  A host that has more than one
/// > IPv6 address must have more than one such record.
///
/// <https://datatracker.ietf.org/doc/html/rfc3596#section-2>
///
/// > QTYPE fields appear in the question part of a query.  QTYPES are a superset of TYPEs, hence
/// > all TYPEs are valid QTYPEs.
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.3>
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DnsType {
    /// IPv4 address
    A,
    /// IPv6 address
    AAAA,
    /// The canonical name for an alias
    CNAME,
    /// Mail exchange
    MX,
    /// Authoritative name server
    NS,
    /// Domain name pointer
    PTR,
    /// Marks the start of a zone of authority
    SOA,
    /// Text string
    TXT,
    Unknown(u16),
}
impl DnsType {
    pub fn new(value: u16) -> Self {
        match value {
            1 => DnsType::A,
            28 => DnsType::AAAA,
            5 => DnsType::CNAME,
            15 => DnsType::MX,
            2 => DnsType::NS,
            12 => DnsType::PTR,
            6 => DnsType::SOA,
            16 => DnsType::TXT,
            other => DnsType::Unknown(other),
        }
    }

    pub fn num(&self) -> u16 {
        match self {
            DnsType::A => 1,
            DnsType::AAAA => 28,
            DnsType::CNAME => 5,
            DnsType::MX => 15,
            DnsType::NS => 2,
            DnsType::PTR => 12,
            DnsType::SOA => 6,
            DnsType::TXT => 16,
            DnsType::Unknown(other) => *other,
        }
    }
}
/// Accepts mnemonics in any case, and the generic `TYPE123` form.
///
/// <https://datatracker.ietf.org/doc/html/rfc3597#section-5>
impl FromStr for DnsType {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "A" => Ok(DnsType::A),
            "AAAA" => Ok(DnsType::AAAA),
            "CNAME" => Ok(DnsType::CNAME),
            "MX" => Ok(DnsType::MX),
            "NS" => Ok(DnsType::NS),
            "PTR" => Ok(DnsType::PTR),
            "SOA" => Ok(DnsType::SOA),
            "TXT" => Ok(DnsType::TXT),
            other => other
                .strip_prefix("TYPE")
                .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<u16>().ok())
                .map(DnsType::new)
                .ok_or_else(|| DnsError::UnknownType(s.to_string())),
        }
    }
}
impl Display for DnsType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            DnsType::A => write!(f, "A"),
            DnsType::AAAA => write!(f, "AAAA"),
            DnsType::CNAME => write!(f, "CNAME"),
            DnsType::MX => write!(f, "MX"),
            DnsType::NS => write!(f, "NS"),
            DnsType::PTR => write!(f, "PTR"),
            DnsType::SOA => write!(f, "SOA"),
            DnsType::TXT => write!(f, "TXT"),
            DnsType::Unknown(n) => write!(f, "TYPE{}", n),
        }
    }
}

#[cfg(test)]
#[test]
fn test_dns_type() {
    for n in [1, 2, 5, 6, 12, 15, 16, 28, 0, 65, 65535] {
        assert_eq!(n, DnsType::new(n).num());
    }
    assert_eq!(DnsType::Unknown(65), DnsType::new(65));
    assert_eq!(Ok(DnsType::A), "A".parse());
    assert_eq!(Ok(DnsType::AAAA), "aaaa".parse());
    assert_eq!(Ok(DnsType::MX), "Mx".parse());
    assert_eq!(Ok(DnsType::Unknown(65)), "TYPE65".parse());
    assert_eq!(Ok(DnsType::A), "type1".parse());
    assert_eq!(
        Err(DnsError::UnknownType("BOGUS".to_string())),
        "BOGUS".parse::<DnsType>()
    );
    assert_eq!(
        Err(DnsError::UnknownType("TYPE65536".to_string())),
        "TYPE65536".parse::<DnsType>()
    );
    for s in ["TYPE+1", "TYPE", "TYPE-1", "TYPE 1"] {
        assert_eq!(Err(DnsError::UnknownType(s.to_string())), s.parse::<DnsType>());
    }
    assert_eq!(
        Err(DnsError::UnknownType("".to_string())),
        "".parse::<DnsType>()
    );
    assert_eq!("AAAA", DnsType::AAAA.to_string());
    assert_eq!("TYPE65", DnsType::Unknown(65).to_string());
}
