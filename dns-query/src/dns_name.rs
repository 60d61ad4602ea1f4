use crate::{write_bytes, write_u16_be, write_u8, DnsError, DnsReader};
use core::cmp::Ordering;
use core::fmt::Display;
use core::hash::{Hash, Hasher};
use fixed_buffer::FixedBuf;
use std::collections::HashMap;
use std::fmt::Formatter;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_WIRE_LEN: usize = 255;
const POINTER_BITS: u8 = 0xC0;
/// Pointers carry 14-bit offsets.
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// Offsets of names already written to a message, keyed by the wire bytes of the name suffix.
pub(crate) type NameOffsets = HashMap<Vec<u8>, u16>;

/// A domain name, as its labels without the root label.
/// The root name has no labels and displays as `.`.
///
/// Labels keep their case.  Comparison and hashing ignore ASCII case.
///
/// > Domain names in messages are expressed in terms of a sequence of labels.  Each label is
/// > represented as a one octet length field followed by that number of octets.  Since every
/// > domain name ends with the null label of the root, a domain name is terminated by a length
/// > byte of zero.
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-3.1>
///
/// Names read from messages may hold any label bytes.
///
/// > Those restrictions aside, any binary string whatever can be used as the label of any
/// > resource record.
///
/// <https://datatracker.ietf.org/doc/html/rfc2181#section-11>
#[derive(Clone, Debug)]
pub struct DnsName(Vec<Vec<u8>>);
impl DnsName {
    fn is_label_byte(b: u8) -> bool {
        // Printable ASCII, excluding the separator.
        (0x21..=0x7E).contains(&b) && b != b'.'
    }

    /// # Errors
    /// Returns an error when a label is empty, too long, or contains a space, a control
    /// character, or a non-ASCII character, or when the name is too long.
    pub fn new(value: impl AsRef<str>) -> Result<Self, DnsError> {
        let value = value.as_ref();
        if value == "." {
            return Ok(Self::root());
        }
        let trimmed = value.strip_suffix('.').unwrap_or(value);
        // Length bytes plus the terminating zero.
        let mut wire_len = 1;
        let mut labels = Vec::new();
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(DnsError::EmptyLabel(value.to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DnsError::LabelTooLong(label.to_string()));
            }
            if !label.bytes().all(Self::is_label_byte) {
                return Err(DnsError::InvalidLabel(value.to_string()));
            }
            wire_len += 1 + label.len();
            labels.push(label.as_bytes().to_vec());
        }
        if wire_len > MAX_NAME_WIRE_LEN {
            return Err(DnsError::NameTooLong(value.to_string()));
        }
        Ok(Self(labels))
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The name with its trailing dot, as zone files and `dig` print it.
    pub fn fqdn(&self) -> String {
        if self.is_root() {
            ".".to_string()
        } else {
            format!("{}.", self)
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Reads a name at the reader's position, following compression pointers.
    /// Leaves the reader just past the name's first pointer, or past its zero label.
    ///
    /// A pointer must point before the start of the labels that contain it.
    /// This rejects loops and forward references.
    ///
    /// > The pointer takes the form of a two octet sequence:
    /// > ```text
    /// >     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /// >     | 1  1|                OFFSET                   |
    /// >     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /// > ```
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4>
    pub(crate) fn read(reader: &mut DnsReader<'_>) -> Result<Self, DnsError> {
        let packet = reader.packet();
        let start = reader.pos();
        let mut pos = start;
        let mut floor = start;
        let mut end: Option<usize> = None;
        let mut wire_len = 1;
        let mut labels = Vec::new();
        loop {
            let len = *packet.get(pos).ok_or(DnsError::Truncated)?;
            match len & POINTER_BITS {
                0 if len == 0 => {
                    pos += 1;
                    break;
                }
                0 => {
                    let label_start = pos + 1;
                    let label = packet
                        .get(label_start..label_start + usize::from(len))
                        .ok_or(DnsError::Truncated)?;
                    wire_len += 1 + label.len();
                    if wire_len > MAX_NAME_WIRE_LEN {
                        return Err(DnsError::MalformedName(start));
                    }
                    labels.push(label.to_vec());
                    pos = label_start + label.len();
                }
                POINTER_BITS => {
                    let low = *packet.get(pos + 1).ok_or(DnsError::Truncated)?;
                    let target = (usize::from(len & !POINTER_BITS) << 8) | usize::from(low);
                    if target >= packet.len() {
                        return Err(DnsError::BadPointer(pos));
                    }
                    if target >= floor {
                        return Err(DnsError::PointerLoop(pos));
                    }
                    end.get_or_insert(pos + 2);
                    floor = target;
                    pos = target;
                }
                _ => return Err(DnsError::BadLabelType(pos)),
            }
        }
        reader.seek(end.unwrap_or(pos));
        Ok(Self(labels))
    }

    /// Writes the name.  When `offsets` is present, replaces the longest suffix already in the
    /// message with a pointer and records the new suffixes.
    ///
    /// Suffixes match byte for byte, so pointers never change the case of a name.
    pub(crate) fn write<const N: usize>(
        &self,
        out: &mut FixedBuf<N>,
        mut offsets: Option<&mut NameOffsets>,
    ) -> Result<(), DnsError> {
        for (n, label) in self.0.iter().enumerate() {
            if let Some(offsets) = offsets.as_mut() {
                let suffix: Vec<u8> = self.0[n..]
                    .iter()
                    .flat_map(|l| core::iter::once(l.len() as u8).chain(l.iter().copied()))
                    .collect();
                if let Some(offset) = offsets.get(&suffix) {
                    return write_u16_be(out, (u16::from(POINTER_BITS) << 8) | *offset);
                }
                if out.len() <= MAX_POINTER_OFFSET {
                    // Fits, checked above.
                    offsets.insert(suffix, out.len() as u16);
                }
            }
            // `new` and `read` limit labels to 63 bytes.
            write_u8(out, label.len() as u8)?;
            write_bytes(out, label)?;
        }
        write_u8(out, 0)
    }
}
impl PartialEq for DnsName {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .labels()
                .zip(other.labels())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}
impl Eq for DnsName {}
impl Hash for DnsName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for label in self.labels() {
            label.len().hash(state);
            for b in label {
                state.write_u8(b.to_ascii_lowercase());
            }
        }
    }
}
impl Ord for DnsName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.labels()
            .map(<[u8]>::to_ascii_lowercase)
            .cmp(other.labels().map(<[u8]>::to_ascii_lowercase))
    }
}
impl PartialOrd for DnsName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
/// Presentation format.  Escapes `.` and `\` with a backslash, and other bytes outside
/// printable ASCII as `\DDD` decimal.
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-5.1>
impl Display for DnsName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        if self.is_root() {
            return write!(f, ".");
        }
        for (n, label) in self.labels().enumerate() {
            if n != 0 {
                write!(f, ".")?;
            }
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", char::from(b))?,
                    0x21..=0x7E => write!(f, "{}", char::from(b))?,
                    _ => write!(f, "\\{:03}", b)?,
                }
            }
        }
        Ok(())
    }
}
