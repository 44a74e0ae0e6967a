//! The `search` module locates byte patterns inside the data records of a
//! [`SegmentedView`] and reports the absolute addresses of the matches.

use crate::view::SegmentedView;
use regex::bytes::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchType {
    Hex(Vec<u8>),
    Ascii(String),
    Regex(String),
}

/// Searches the data record payloads of a segmented view.
/// Returns the absolute start addresses of all matches, ascending.
///
/// Each record's payload is one contiguous chunk; matches never span
/// record boundaries.
#[must_use]
pub fn search(view: &SegmentedView, search_type: &SearchType) -> Vec<u32> {
    match search_type {
        SearchType::Hex(pattern) => search_bytes(view, pattern),
        SearchType::Ascii(text) => search_bytes(view, text.as_bytes()),
        SearchType::Regex(pattern) => search_regex(view, pattern),
    }
}

/// Slide window search over every record payload.
#[allow(clippy::cast_possible_truncation)]
fn search_bytes(view: &SegmentedView, pattern: &[u8]) -> Vec<u32> {
    let size = pattern.len();
    if size == 0 {
        return vec![];
    }

    let mut matches = Vec::new();

    for (&base, group) in view {
        for record in group {
            let record_start = base | u32::from(record.address);
            for (offset, window) in record.data.windows(size).enumerate() {
                if window == pattern {
                    matches.push(record_start.wrapping_add(offset as u32));
                }
            }
        }
    }

    matches
}

/// Regex search over every record payload.
#[allow(clippy::cast_possible_truncation)]
fn search_regex(view: &SegmentedView, pattern: &str) -> Vec<u32> {
    let Ok(re) = Regex::new(pattern) else {
        return vec![];
    };
    let mut matches = Vec::new();

    for (&base, group) in view {
        for record in group {
            let record_start = base | u32::from(record.address);
            for mtch in re.find_iter(&record.data) {
                matches.push(record_start.wrapping_add(mtch.start() as u32));
            }
        }
    }

    matches
}
