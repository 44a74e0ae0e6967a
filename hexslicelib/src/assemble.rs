//! The `assemble` module turns a sequence of raw text lines into an
//! [`AssembledSequence`]: the validated, file-ordered record list consumed by
//! the view builders.
//!
//! File-level syntax rules live here: comment and blank handling, the
//! requirement for a terminating end-of-file record, and the rejection of
//! unsupported record types.

use crate::error::{HexFileError, SyntaxErrorKind};
use crate::record::{Record, RecordType};
use std::error::Error;
use std::path::Path;

const COMMENT_MARKERS: [&str; 2] = [";", "//"];

/// Knobs for the assembler. The defaults reproduce the permissive behavior of
/// plain decoding: trailing checksum bytes are decoded but not compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    /// Compare each record's trailing checksum byte against the
    /// two's-complement sum of its header and payload, and reject the file on
    /// the first mismatch.
    pub verify_checksums: bool,
}

/// Records in original file order, logically terminated by exactly one
/// end-of-file record and free of unsupported record types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSequence {
    records: Vec<Record>,
}

impl AssembledSequence {
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a AssembledSequence {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Assembles raw text lines into an [`AssembledSequence`] with default
/// [`AssembleOptions`].
///
/// # Errors
/// See [`assemble_lines_with`].
///
/// # Examples
/// ```
/// use hexslicelib::assemble_lines;
///
/// let seq = assemble_lines([":0300300002337A1E", ":00000001FF"]).unwrap();
/// assert_eq!(seq.len(), 2);
/// ```
pub fn assemble_lines<I, S>(lines: I) -> Result<AssembledSequence, HexFileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    assemble_lines_with(lines, AssembleOptions::default())
}

/// Assembles raw text lines into an [`AssembledSequence`].
///
/// Comment lines (`;` or `//`) are skipped without being decoded. On record
/// lines, content is taken from the first `:` onward; text before it is
/// discarded. Consumption stops at the first end-of-file record, so trailing
/// lines after it are ignored rather than validated.
///
/// # Errors
/// - [`HexFileError::Syntax`] if a non-comment line is empty, carries no `:`,
///   fails record decoding, or (with `verify_checksums` on) carries a wrong
///   checksum. The position is 1-based among non-comment lines.
/// - [`HexFileError::MissingTerminator`] if no end-of-file record appears.
/// - [`HexFileError::UnsupportedRecord`] if a record of an unrecognized type
///   was decoded; checked only after the full pass so any syntax error earlier
///   in the file is reported first.
pub fn assemble_lines_with<I, S>(
    lines: I,
    options: AssembleOptions,
) -> Result<AssembledSequence, HexFileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records: Vec<Record> = Vec::new();
    let mut line_no: usize = 0; // 1-based, counting only decoded (non-comment) lines
    let mut terminated = false;

    for raw in lines {
        let raw = raw.as_ref();

        if is_comment(raw) {
            continue;
        }
        line_no += 1;

        if raw.is_empty() {
            return Err(HexFileError::Syntax(SyntaxErrorKind::EmptyLine, line_no));
        }
        let Some(start) = raw.find(':') else {
            return Err(HexFileError::Syntax(
                SyntaxErrorKind::MissingStartCode,
                line_no,
            ));
        };

        let record = Record::decode(&raw[start..])
            .map_err(|err| HexFileError::Syntax(err.into(), line_no))?;

        if options.verify_checksums && !record.checksum_matches() {
            return Err(HexFileError::Syntax(
                SyntaxErrorKind::ChecksumMismatch(record.computed_checksum(), record.checksum),
                line_no,
            ));
        }

        let is_terminator = matches!(record.rtype, RecordType::EndOfFile);
        records.push(record);
        if is_terminator {
            terminated = true;
            break;
        }
    }

    if !terminated {
        return Err(HexFileError::MissingTerminator);
    }

    // Unsupported types are rejected only after the whole pass, so a syntax
    // error anywhere in the file takes precedence over this check.
    for (index, record) in records.iter().enumerate() {
        if let RecordType::Unsupported(code) = record.rtype {
            return Err(HexFileError::UnsupportedRecord(code, index + 1));
        }
    }

    Ok(AssembledSequence { records })
}

/// Reads a hex file from disk and assembles it with default options.
///
/// This is a thin wrapper over [`assemble_lines`]; everything file-shaped
/// stays out of the decoding core.
///
/// # Errors
/// Returns an error if the file cannot be read or assembled.
///
/// # Examples
/// ```
/// use hexslicelib::assemble_from_path;
///
/// let seq = assemble_from_path("tests/fixtures/linear.hex").unwrap();
/// assert_eq!(seq.len(), 4);
/// ```
pub fn assemble_from_path<P: AsRef<Path>>(path: P) -> Result<AssembledSequence, Box<dyn Error>> {
    assemble_from_path_with(path, AssembleOptions::default())
}

/// Reads a hex file from disk and assembles it with the given options.
///
/// # Errors
/// Returns an error if the file cannot be read or assembled.
pub fn assemble_from_path_with<P: AsRef<Path>>(
    path: P,
    options: AssembleOptions,
) -> Result<AssembledSequence, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(assemble_lines_with(text.lines(), options)?)
}

fn is_comment(line: &str) -> bool {
    let content = line.trim_start();
    COMMENT_MARKERS
        .iter()
        .any(|marker| content.starts_with(marker))
}
