//! The `error` module defines the error types raised while decoding records,
//! assembling hex files and building or querying address views.
//!
//! Errors come in two layers:
//! 1. [`DecodeError`] describes a single malformed record line.
//! 2. [`HexFileError`] describes file-level and view-level failures and carries
//!    the 1-based line or record position where one is traceable.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Line does not begin with a ':'
    MissingStartCode,
    /// Line is shorter than the smallest valid record
    RecordTooShort(usize),
    /// A fixed-width field contains non-hexadecimal characters
    ContainsInvalidCharacters,
    /// Declared payload would read past the end of the line
    PayloadPastLineEnd { declared: u8, available: usize },
    /// Extended linear address record whose payload is not exactly 2 bytes
    ExtendedAddressPayloadLength(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartCode => {
                write!(f, "Missing start code ':'")
            }
            Self::RecordTooShort(length) => {
                write!(f, "Record too short: {length} characters")
            }
            Self::ContainsInvalidCharacters => {
                write!(f, "Record contains invalid character(s)")
            }
            Self::PayloadPastLineEnd { declared, available } => {
                write!(
                    f,
                    "Declared payload of {declared} bytes does not fit in the {available} characters left on the line"
                )
            }
            Self::ExtendedAddressPayloadLength(length) => {
                write!(
                    f,
                    "Extended linear address record expects a 2 byte payload, found {length}"
                )
            }
        }
    }
}

/// What exactly went wrong on a line rejected by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Non-comment line with no content
    EmptyLine,
    /// Non-comment line without a record start marker ':'
    MissingStartCode,
    /// Record checksum mismatch (expected, found); raised only when
    /// checksum verification is enabled
    ChecksumMismatch(u8, u8),
    /// The line failed record decoding
    Decode(DecodeError),
}

impl From<DecodeError> for SyntaxErrorKind {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLine => {
                write!(f, "Line is empty")
            }
            Self::MissingStartCode => {
                write!(f, "Missing start code ':'")
            }
            Self::ChecksumMismatch(expected, actual) => {
                write!(
                    f,
                    "Invalid record checksum - expected: 0x{expected:02X}, found: 0x{actual:02X}"
                )
            }
            Self::Decode(err) => {
                write!(f, "{err}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexFileError {
    /// Malformed line, with the 1-based position among non-comment lines
    Syntax(SyntaxErrorKind, usize),
    /// Input exhausted without an end-of-file record
    MissingTerminator,
    /// Record of an unsupported type (type code, 1-based record position)
    UnsupportedRecord(u8, usize),
    /// Extended linear address record fed to the 16-bit view
    /// (1-based position of the first such record)
    ExtendedAddressPresent(usize),
    /// Inclusive address range with end below start
    InvalidRange { start: u32, end: u32 },
}

impl fmt::Display for HexFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(kind, line) => {
                write!(f, "Syntax error at line #{line} of the hex file:\n{kind}")
            }
            Self::MissingTerminator => {
                write!(f, "No end-of-file record found before input exhaustion")
            }
            Self::UnsupportedRecord(code, position) => {
                write!(f, "Unsupported record type 0x{code:02X} at record #{position}")
            }
            Self::ExtendedAddressPresent(position) => {
                write!(
                    f,
                    "Extended linear address record #{position} cannot be represented in a 16-bit view"
                )
            }
            Self::InvalidRange { start, end } => {
                write!(
                    f,
                    "Invalid address range: end 0x{end:X} is below start 0x{start:X}"
                )
            }
        }
    }
}

impl Error for DecodeError {}
impl Error for SyntaxErrorKind {}
impl Error for HexFileError {}
