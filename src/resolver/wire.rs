//! Bounds-checked reading of DNS messages.

use std::fmt::Write as _;

/// Longest domain name on the wire, in octets.
const MAX_NAME_OCTETS: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum WireError {
    #[error("read past end of message")]
    Truncated,
    #[error("reserved label type")]
    BadLabel,
    #[error("compression pointer loop")]
    PointerLoop,
    #[error("domain name too long")]
    NameTooLong,
    #[error("record data overruns its declared length")]
    BadRdata,
}

/// Read position within a complete DNS message.
///
/// Every read is checked against the message length and advances the
/// position only on success.
pub(crate) struct Cursor<'a> {
    msg: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(msg: &'a [u8]) -> Self {
        Self { msg, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let end = self.pos.checked_add(len).ok_or(WireError::Truncated)?;
        let bytes = self.msg.get(self.pos..end).ok_or(WireError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), WireError> {
        self.take(len).map(|_| ())
    }

    /// Moves forward to `pos`, which must lie between the current position
    /// and the end of the message.
    pub(crate) fn advance_to(&mut self, pos: usize) -> Result<(), WireError> {
        let len = pos.checked_sub(self.pos).ok_or(WireError::BadRdata)?;
        self.skip(len)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, WireError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_name(&mut self) -> Result<String, WireError> {
        let (name, len) = expand_name(self.msg, self.pos)?;
        self.skip(len)?;
        Ok(name)
    }

    pub(crate) fn skip_name(&mut self) -> Result<(), WireError> {
        self.read_name().map(|_| ())
    }
}

/// Expands the possibly compressed domain name at `offset` in `msg`.
///
/// Returns the name in presentation form, without a trailing dot (the root
/// is `"."`), and the number of octets it occupies at `offset`.
pub(crate) fn expand_name(msg: &[u8], offset: usize) -> Result<(String, usize), WireError> {
    let mut name = String::new();
    let mut pos = offset;
    let mut encoded_len = None;
    let mut octets = 0;
    let mut jumps = 0;

    loop {
        let len = *msg.get(pos).ok_or(WireError::Truncated)? as usize;
        match len & 0xC0 {
            0x00 if len == 0 => {
                if name.is_empty() {
                    name.push('.');
                }
                let encoded_len = encoded_len.unwrap_or_else(|| pos + 1 - offset);
                return Ok((name, encoded_len));
            }
            0x00 => {
                let label = msg.get(pos + 1..pos + 1 + len).ok_or(WireError::Truncated)?;
                octets += len + 1;
                if octets >= MAX_NAME_OCTETS {
                    return Err(WireError::NameTooLong);
                }
                if !name.is_empty() {
                    name.push('.');
                }
                push_label(&mut name, label);
                pos += 1 + len;
            }
            0xC0 => {
                let low = *msg.get(pos + 1).ok_or(WireError::Truncated)? as usize;
                if encoded_len.is_none() {
                    encoded_len = Some(pos + 2 - offset);
                }
                // Each pointer must land on a distinct octet; more jumps than
                // the message has octets means a loop.
                jumps += 1;
                if jumps > msg.len() {
                    return Err(WireError::PointerLoop);
                }
                pos = ((len & 0x3F) << 8) | low;
            }
            _ => return Err(WireError::BadLabel),
        }
    }
}

fn push_label(name: &mut String, label: &[u8]) {
    for &byte in label {
        match byte {
            b'.' | b'\\' => {
                name.push('\\');
                name.push(byte as char);
            }
            0x21..=0x7E => name.push(byte as char),
            _ => {
                let _ = write!(name, "\\{byte:03}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "kdc.example.com" at offset 0, then "www" + pointer to "example.com".
    const MSG: &[u8] = &[
        3, b'k', b'd', b'c', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
        3, b'w', b'w', b'w', 0xC0, 4,
    ];

    #[test]
    fn expands_plain_name() {
        assert_eq!(
            expand_name(MSG, 0),
            Ok(("kdc.example.com".to_string(), 17))
        );
    }

    #[test]
    fn expands_compressed_name() {
        assert_eq!(
            expand_name(MSG, 17),
            Ok(("www.example.com".to_string(), 6))
        );
    }

    #[test]
    fn expands_pointer_back_to_earlier_name() {
        // An owner name pointing at the question, the usual answer layout.
        let mut msg = MSG.to_vec();
        msg.extend_from_slice(&[0xC0, 0]);
        assert_eq!(
            expand_name(&msg, MSG.len()),
            Ok(("kdc.example.com".to_string(), 2))
        );

        let mut cursor = Cursor::new(&msg);
        cursor.skip(MSG.len()).unwrap();
        assert_eq!(cursor.read_name().as_deref(), Ok("kdc.example.com"));
        assert_eq!(cursor.position(), msg.len());
    }

    #[test]
    fn root_name() {
        assert_eq!(expand_name(&[0], 0), Ok((".".to_string(), 1)));
    }

    #[test]
    fn escapes_unprintable_and_dots() {
        let msg = [3, b'a', b'.', 0x07, 0];
        assert_eq!(expand_name(&msg, 0), Ok(("a\\.\\007".to_string(), 5)));
    }

    #[test]
    fn rejects_pointer_loop() {
        let msg = [0xC0, 2, 0xC0, 0];
        assert_eq!(expand_name(&msg, 0), Err(WireError::PointerLoop));
    }

    #[test]
    fn rejects_truncated_label() {
        let msg = [5, b'a', b'b'];
        assert_eq!(expand_name(&msg, 0), Err(WireError::Truncated));
        assert_eq!(expand_name(&[], 0), Err(WireError::Truncated));
    }

    #[test]
    fn rejects_reserved_label_type() {
        assert_eq!(expand_name(&[0x40, 0], 0), Err(WireError::BadLabel));
    }

    #[test]
    fn rejects_overlong_name() {
        let mut msg = Vec::new();
        for _ in 0..5 {
            msg.push(63);
            msg.extend_from_slice(&[b'x'; 63]);
        }
        msg.push(0);
        assert_eq!(expand_name(&msg, 0), Err(WireError::NameTooLong));
    }

    #[test]
    fn cursor_reads_are_bounds_checked() {
        let mut cursor = Cursor::new(&[0x12, 0x34, 0x56]);
        assert_eq!(cursor.read_u16(), Ok(0x1234));
        assert_eq!(cursor.read_u16(), Err(WireError::Truncated));
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.skip(2), Err(WireError::Truncated));
        assert_eq!(cursor.skip(1), Ok(()));
        assert_eq!(cursor.advance_to(1), Err(WireError::BadRdata));
    }

    #[test]
    fn cursor_reads_names_in_place() {
        let mut cursor = Cursor::new(MSG);
        assert_eq!(cursor.read_name().as_deref(), Ok("kdc.example.com"));
        assert_eq!(cursor.read_name().as_deref(), Ok("www.example.com"));
        assert_eq!(cursor.position(), MSG.len());
    }
}
