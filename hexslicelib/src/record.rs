//! The `record` module defines [`Record`] and [`RecordType`], which are used for
//! decoding individual Intel HEX record lines of the shape `:BBAAAATT[DD...]CC`.

use crate::error::DecodeError;

mod ranges {
    use std::ops::Range;
    pub const RECORD_LEN_RANGE: Range<usize> = 1..3;
    pub const RECORD_ADDR_RANGE: Range<usize> = 3..7;
    pub const RECORD_TYPE_RANGE: Range<usize> = 7..9;
}
mod sizes {
    pub const BYTE_CHAR_LEN: usize = 2;
    pub const SMALLEST_RECORD: usize = 1 + (1 + 2 + 1 + 1) * 2; // ':' + len + addr + rtype + checksum
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    Data,
    EndOfFile,
    ExtendedLinearAddress,
    /// Any type code outside {0x00, 0x01, 0x04}. Decoding keeps the line's
    /// structural information; the file assembler rejects these later.
    Unsupported(u8),
}

impl RecordType {
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Data,
            0x01 => Self::EndOfFile,
            0x04 => Self::ExtendedLinearAddress,
            other => Self::Unsupported(other),
        }
    }

    /// Numeric type code as it appears on the wire.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Data => 0x00,
            Self::EndOfFile => 0x01,
            Self::ExtendedLinearAddress => 0x04,
            Self::Unsupported(code) => code,
        }
    }
}

/// One decoded record line. Created by [`Record::decode`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub rtype: RecordType,
    /// 16-bit local address field, relative to the record's segment
    pub address: u16,
    /// Payload byte count declared by the record header
    pub length: u8,
    /// Payload bytes; always exactly `length` long
    pub data: Vec<u8>,
    /// Trailing checksum byte, decoded but not verified here
    pub checksum: u8,
    /// Original line, retained for diagnostics
    pub raw: String,
}

impl Record {
    /// Decodes one non-empty text line beginning with the record start marker.
    ///
    /// Type codes outside the recognized set decode to
    /// [`RecordType::Unsupported`] rather than failing, so a single decode pass
    /// still reports all structural information about the line. Characters past
    /// the checksum field are tolerated and ignored.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if the line is shorter than the minimum
    /// fixed-field width, a fixed-width field contains non-hexadecimal
    /// characters, or the declared payload would read past the end of the line.
    ///
    /// # Examples
    /// ```
    /// use hexslicelib::{Record, RecordType};
    ///
    /// let record = Record::decode(":0300300002337A1E").unwrap();
    /// assert_eq!(record.rtype, RecordType::Data);
    /// assert_eq!(record.address, 0x0030);
    /// assert_eq!(record.data, vec![0x02, 0x33, 0x7A]);
    /// ```
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        if !line.starts_with(':') {
            return Err(DecodeError::MissingStartCode);
        }
        if line.len() < sizes::SMALLEST_RECORD {
            return Err(DecodeError::RecordTooShort(line.len()));
        }

        // The length field gates how far the record extends, so it is
        // validated and read before everything else.
        let length = parse_hex_field(line, ranges::RECORD_LEN_RANGE)?;

        let data_end = ranges::RECORD_TYPE_RANGE.end + sizes::BYTE_CHAR_LEN * length as usize;
        let record_end = data_end + sizes::BYTE_CHAR_LEN;
        if record_end > line.len() {
            return Err(DecodeError::PayloadPastLineEnd {
                declared: length,
                available: line.len() - ranges::RECORD_TYPE_RANGE.end,
            });
        }

        // All consumed fields must be hex digits; trailing text is not checked.
        if !line.as_bytes()[1..record_end]
            .iter()
            .all(u8::is_ascii_hexdigit)
        {
            return Err(DecodeError::ContainsInvalidCharacters);
        }

        let address = u16::from_str_radix(&line[ranges::RECORD_ADDR_RANGE], 16)
            .map_err(|_| DecodeError::ContainsInvalidCharacters)?;
        let code = u8::from_str_radix(&line[ranges::RECORD_TYPE_RANGE], 16)
            .map_err(|_| DecodeError::ContainsInvalidCharacters)?;
        let rtype = RecordType::from_code(code);

        let mut data: Vec<u8> = Vec::with_capacity(length as usize);
        for i in (ranges::RECORD_TYPE_RANGE.end..data_end).step_by(sizes::BYTE_CHAR_LEN) {
            let byte = u8::from_str_radix(&line[i..i + sizes::BYTE_CHAR_LEN], 16)
                .map_err(|_| DecodeError::ContainsInvalidCharacters)?;
            data.push(byte);
        }

        let checksum = u8::from_str_radix(&line[data_end..record_end], 16)
            .map_err(|_| DecodeError::ContainsInvalidCharacters)?;

        // A type-04 record must carry the upper 16 bits of a segment base.
        if matches!(rtype, RecordType::ExtendedLinearAddress) && length != 2 {
            return Err(DecodeError::ExtendedAddressPayloadLength(length));
        }

        Ok(Self {
            rtype,
            address,
            length,
            data,
            checksum,
            raw: line.to_owned(),
        })
    }

    /// Two's-complement checksum computed over length, address bytes, type
    /// code and payload.
    #[must_use]
    pub fn computed_checksum(&self) -> u8 {
        let mut sum = self
            .length
            .wrapping_add((self.address >> 8) as u8)
            .wrapping_add((self.address & 0xFF) as u8)
            .wrapping_add(self.rtype.code());
        for byte in &self.data {
            sum = sum.wrapping_add(*byte);
        }
        (!sum).wrapping_add(1) // two's complement
    }

    /// Whether the decoded trailing checksum byte matches the record contents.
    #[must_use]
    pub fn checksum_matches(&self) -> bool {
        self.computed_checksum() == self.checksum
    }

    /// Segment base announced by an extended linear address record, already
    /// shifted into position. `None` for every other record type.
    ///
    /// # Examples
    /// ```
    /// use hexslicelib::Record;
    ///
    /// let record = Record::decode(":020000040003F7").unwrap();
    /// assert_eq!(record.segment_base(), Some(0x0003_0000));
    /// ```
    #[must_use]
    pub fn segment_base(&self) -> Option<u32> {
        match (self.rtype, self.data.as_slice()) {
            (RecordType::ExtendedLinearAddress, [msb, lsb]) => {
                Some((u32::from(*msb) << 8 | u32::from(*lsb)) << 16)
            }
            _ => None,
        }
    }
}

fn parse_hex_field(line: &str, range: std::ops::Range<usize>) -> Result<u8, DecodeError> {
    let field = line
        .get(range)
        .ok_or(DecodeError::ContainsInvalidCharacters)?;
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        // from_str_radix alone would accept a leading '+'
        return Err(DecodeError::ContainsInvalidCharacters);
    }
    u8::from_str_radix(field, 16).map_err(|_| DecodeError::ContainsInvalidCharacters)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns valid record strings of each supported type
    ///
    fn get_valid_str_records() -> [&'static str; 4] {
        [
            ":10010000214601360121470136007EFE09D2190140",
            ":0300300002337A1E",
            ":020000040003F7",
            ":00000001FF",
        ]
    }

    /// Returns invalid record strings and corresponding errors
    ///
    fn get_invalid_str_records() -> [(&'static str, DecodeError); 6] {
        [
            // Removed ':' from record str
            ("00000001FF", DecodeError::MissingStartCode),
            // EOF record with fewer chars
            (":0000FF", DecodeError::RecordTooShort(7)),
            // Char 'Z' is not a hex digit
            (":0000000ZFF", DecodeError::ContainsInvalidCharacters),
            // Leading '+' sneaking through integer parsing
            (":+0000001FF", DecodeError::ContainsInvalidCharacters),
            // Declared 0x10 payload bytes with only 6 chars remaining
            (
                ":100000000000FF",
                DecodeError::PayloadPastLineEnd {
                    declared: 0x10,
                    available: 6,
                },
            ),
            // Type-04 record with a 1 byte payload
            (":01000004AA55", DecodeError::ExtendedAddressPayloadLength(1)),
        ]
    }

    #[test]
    fn test_record_type_codes_round_trip() {
        assert_eq!(RecordType::from_code(0x00), RecordType::Data);
        assert_eq!(RecordType::from_code(0x01), RecordType::EndOfFile);
        assert_eq!(RecordType::from_code(0x04), RecordType::ExtendedLinearAddress);
        assert_eq!(RecordType::from_code(0x02), RecordType::Unsupported(0x02));
        assert_eq!(RecordType::from_code(0xFF), RecordType::Unsupported(0xFF));

        for code in [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0xFF] {
            assert_eq!(RecordType::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_decode_data_record() {
        // Act
        let record = Record::decode(":0300300002337A1E").unwrap();

        // Assert
        assert_eq!(record.rtype, RecordType::Data);
        assert_eq!(record.address, 0x0030);
        assert_eq!(record.length, 3);
        assert_eq!(record.data, vec![0x02, 0x33, 0x7A]);
        assert_eq!(record.checksum, 0x1E);
        assert_eq!(record.raw, ":0300300002337A1E");
    }

    #[test]
    fn test_decode_end_of_file_record() {
        let record = Record::decode(":00000001FF").unwrap();

        assert_eq!(record.rtype, RecordType::EndOfFile);
        assert_eq!(record.address, 0);
        assert!(record.data.is_empty());
        assert_eq!(record.checksum, 0xFF);
    }

    #[test]
    fn test_decode_extended_linear_address_record() {
        let record = Record::decode(":020000040003F7").unwrap();

        assert_eq!(record.rtype, RecordType::ExtendedLinearAddress);
        assert_eq!(record.data, vec![0x00, 0x03]);
        assert_eq!(record.segment_base(), Some(0x0003_0000));
    }

    #[test]
    fn test_decode_unsupported_record_types() {
        // Extended segment address (0x02) and start segment address (0x03)
        // decode structurally instead of failing.
        let record = Record::decode(":020000021200EA").unwrap();
        assert_eq!(record.rtype, RecordType::Unsupported(0x02));
        assert_eq!(record.data, vec![0x12, 0x00]);

        let record = Record::decode(":0400000300003800C1").unwrap();
        assert_eq!(record.rtype, RecordType::Unsupported(0x03));
        assert_eq!(record.segment_base(), None);
    }

    #[test]
    fn test_decode_tolerates_trailing_characters() {
        // Act
        let record = Record::decode(":00000001FF   stray tail").unwrap();

        // Assert
        assert_eq!(record.rtype, RecordType::EndOfFile);
        assert_eq!(record.checksum, 0xFF);
    }

    #[test]
    fn test_decode_invalid_records() {
        let records_and_errors = get_invalid_str_records();
        for (record, expected_error) in records_and_errors {
            assert_eq!(Record::decode(record).unwrap_err(), expected_error);
        }
    }

    #[test]
    fn test_decode_multibyte_characters_rejected() {
        // A non-ASCII char inside the fixed fields must not panic the decoder
        let res = Record::decode(":0000∂001FF");
        assert_eq!(res.unwrap_err(), DecodeError::ContainsInvalidCharacters);
    }

    #[test]
    fn test_computed_checksum_matches_valid_records() {
        for line in get_valid_str_records() {
            let record = Record::decode(line).unwrap();
            assert!(record.checksum_matches(), "checksum mismatch for {line}");
        }
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        // Arrange: valid structure, corrupted trailing byte
        let record = Record::decode(":0300300002337AFF").unwrap();

        // Assert
        assert!(!record.checksum_matches());
        assert_eq!(record.computed_checksum(), 0x1E);
    }

    #[test]
    fn test_segment_base_requires_two_bytes() {
        // Hand-built record bypassing decode: segment_base must not panic
        let record = Record {
            rtype: RecordType::ExtendedLinearAddress,
            address: 0,
            length: 2,
            data: vec![0x12],
            checksum: 0,
            raw: String::new(),
        };
        assert_eq!(record.segment_base(), None);
    }
}
