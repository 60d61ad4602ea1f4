use core::fmt::{Display, Formatter};

/// > CLASS fields appear in resource records.  The following CLASS mnemonics and values are
/// > defined:
/// > - `IN` 1 the Internet
/// > - `CS` 2 the CSNET class (Obsolete - used only for examples in some obsolete RFCs)
/// > - `CH` 3 the CHAOS class
/// > - `HS` 4 Hesiod [Dyer 87]
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.4>
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DnsClass {
    Internet,
    Chaos,
    Hesiod,
    Unknown(u16),
}
impl DnsClass {
    pub fn new(value: u16) -> Self {
        match value {
            1 => DnsClass::Internet,
            3 => DnsClass::Chaos,
            4 => DnsClass::Hesiod,
            other => DnsClass::Unknown(other),
        }
    }

    pub fn num(&self) -> u16 {
        match self {
            DnsClass::Internet => 1,
            DnsClass::Chaos => 3,
            DnsClass::Hesiod => 4,
            DnsClass::Unknown(other) => *other,
        }
    }
}
impl Display for DnsClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            DnsClass::Internet => write!(f, "IN"),
            DnsClass::Chaos => write!(f, "CH"),
            DnsClass::Hesiod => write!(f, "HS"),
            DnsClass::Unknown(n) => write!(f, "CLASS{}", n),
        }
    }
}

#[cfg(test)]
#[test]
fn test_dns_class() {
    for n in [0, 1, 2, 3, 4, 255, 65535] {
        assert_eq!(n, DnsClass::new(n).num());
    }
    assert_eq!(DnsClass::Internet, DnsClass::new(1));
    assert_eq!("IN", DnsClass::Internet.to_string());
    assert_eq!("CH", DnsClass::new(3).to_string());
    assert_eq!("CLASS255", DnsClass::new(255).to_string());
}
