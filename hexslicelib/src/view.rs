//! The `view` module reorganizes an [`AssembledSequence`] into address-indexed
//! views: a flat 16-bit view for images without extended addressing, and a
//! [`SegmentedView`] keyed by extended linear address for 32-bit images, with
//! inclusive address-range slicing on top.

use crate::assemble::AssembledSequence;
use crate::error::HexFileError;
use crate::record::{Record, RecordType};
use std::collections::BTreeMap;

const SEGMENT_MASK: u32 = 0xFFFF_0000;

/// Ordered mapping from segment base to that segment's address-ordered data
/// records. Built once by [`build_segmented_view`], immutable thereafter;
/// queries never touch the underlying map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedView {
    segments: BTreeMap<u32, Vec<Record>>,
}

impl<'a> IntoIterator for &'a SegmentedView {
    type Item = (&'a u32, &'a Vec<Record>);
    type IntoIter = std::collections::btree_map::Iter<'a, u32, Vec<Record>>;
    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl SegmentedView {
    /// Iterate over (segment base, records) pairs in ascending base order.
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, u32, Vec<Record>> {
        self.into_iter()
    }

    /// Records of one segment, ordered by local address.
    #[must_use]
    pub fn segment(&self, base: u32) -> Option<&[Record]> {
        self.segments.get(&base).map(Vec::as_slice)
    }

    /// Segment bases in ascending order.
    pub fn segment_bases(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.keys().copied()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total number of data records across all segments.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All data records, ascending by segment base and local address.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.segments.values().flatten()
    }

    /// Computes the subset of this view whose absolute addresses
    /// (`segment base + local address`) fall inside the inclusive range.
    ///
    /// A boundary segment whose filtered record set comes out empty is omitted
    /// from the result rather than emitted as an empty group; segments lying
    /// strictly between the bounds are carried over unfiltered. The result is
    /// itself a [`SegmentedView`] and can be queried again.
    ///
    /// # Errors
    /// Returns [`HexFileError::InvalidRange`] if `end < start`, before the
    /// view is consulted.
    ///
    /// # Examples
    /// ```
    /// use hexslicelib::{assemble_from_path, build_segmented_view};
    ///
    /// let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();
    /// let view = build_segmented_view(&seq);
    ///
    /// let slice = view.query(0x0001_0000, 0x0001_FFFF).unwrap();
    /// assert_eq!(slice.record_count(), 1);
    /// ```
    pub fn query(&self, start: u32, end: u32) -> Result<Self, HexFileError> {
        if end < start {
            return Err(HexFileError::InvalidRange { start, end });
        }

        let start_segment = start & SEGMENT_MASK;
        let end_segment = end & SEGMENT_MASK;
        #[allow(clippy::cast_possible_truncation)]
        let start_local = start as u16;
        #[allow(clippy::cast_possible_truncation)]
        let end_local = end as u16;

        let mut segments: BTreeMap<u32, Vec<Record>> = BTreeMap::new();

        if start_segment == end_segment {
            // Both bounds land in one segment: a single two-sided filter
            if let Some(group) = self.segments.get(&start_segment) {
                let matched = filter_records(group, |addr| {
                    addr >= start_local && addr <= end_local
                });
                if !matched.is_empty() {
                    segments.insert(start_segment, matched);
                }
            }
        } else {
            for (&base, group) in &self.segments {
                if base < start_segment || base > end_segment {
                    continue;
                }
                if base == start_segment {
                    // Whole remainder of the first segment is in range
                    let matched = filter_records(group, |addr| addr >= start_local);
                    if !matched.is_empty() {
                        segments.insert(base, matched);
                    }
                } else if base == end_segment {
                    let matched = filter_records(group, |addr| addr <= end_local);
                    if !matched.is_empty() {
                        segments.insert(base, matched);
                    }
                } else {
                    segments.insert(base, group.clone());
                }
            }
        }

        Ok(Self { segments })
    }
}

fn filter_records(group: &[Record], keep: impl Fn(u16) -> bool) -> Vec<Record> {
    group
        .iter()
        .filter(|record| keep(record.address))
        .cloned()
        .collect()
}

/// Re-orders an assembled sequence by ascending local address, for images
/// that contain no extended addressing.
///
/// The end-of-file record carries no address-relevant payload and is dropped
/// from the output. An optional inclusive 16-bit range restricts the result.
///
/// # Errors
/// - [`HexFileError::ExtendedAddressPresent`] (with the 1-based position of
///   the first such record) if the sequence carries any extended linear
///   address record; 32-bit images must not be silently flattened.
/// - [`HexFileError::InvalidRange`] if `end < start`.
///
/// # Examples
/// ```
/// use hexslicelib::{assemble_from_path, build_linear_view};
///
/// let seq = assemble_from_path("tests/fixtures/linear.hex").unwrap();
/// let view = build_linear_view(&seq, None).unwrap();
/// assert_eq!(view[0].address, 0x0030);
/// ```
pub fn build_linear_view(
    seq: &AssembledSequence,
    range: Option<(u16, u16)>,
) -> Result<Vec<Record>, HexFileError> {
    if let Some(position) = seq
        .records()
        .iter()
        .position(|record| matches!(record.rtype, RecordType::ExtendedLinearAddress))
    {
        return Err(HexFileError::ExtendedAddressPresent(position + 1));
    }
    if let Some((start, end)) = range
        && end < start
    {
        return Err(HexFileError::InvalidRange {
            start: u32::from(start),
            end: u32::from(end),
        });
    }

    let mut view: Vec<Record> = seq
        .records()
        .iter()
        .filter(|record| matches!(record.rtype, RecordType::Data))
        .filter(|record| {
            range.is_none_or(|(start, end)| record.address >= start && record.address <= end)
        })
        .cloned()
        .collect();
    view.sort_by_key(|record| record.address);
    Ok(view)
}

/// Partitions an assembled sequence into per-segment, address-ordered groups.
///
/// One walk over the sequence carries the current segment base as an
/// accumulator, starting at segment 0. Data records join the current segment's
/// group; an extended linear address record pre-creates its segment (so a
/// segment that is announced but never populated still appears, which range
/// queries rely on) and switches to it; the end-of-file record stops the walk.
/// Groups are sorted by local address afterwards, since data records need not
/// arrive in address order.
///
/// # Examples
/// ```
/// use hexslicelib::{assemble_from_path, build_segmented_view};
///
/// let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();
/// let view = build_segmented_view(&seq);
/// assert_eq!(view.segment_bases().collect::<Vec<_>>(),
///            vec![0x0000_0000, 0x0001_0000, 0x0012_0000]);
/// ```
#[must_use]
pub fn build_segmented_view(seq: &AssembledSequence) -> SegmentedView {
    let mut segments: BTreeMap<u32, Vec<Record>> = BTreeMap::new();
    let mut current: u32 = 0;
    segments.insert(current, Vec::new());

    for record in seq {
        match record.rtype {
            RecordType::Data => {
                segments.entry(current).or_default().push(record.clone());
            }
            RecordType::ExtendedLinearAddress => {
                if let Some(base) = record.segment_base() {
                    segments.entry(base).or_default();
                    current = base;
                }
            }
            RecordType::EndOfFile => break,
            // The assembler never emits these; nothing to place
            RecordType::Unsupported(_) => {}
        }
    }

    for group in segments.values_mut() {
        group.sort_by_key(|record| record.address);
    }

    SegmentedView { segments }
}
