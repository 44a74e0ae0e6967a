//! # `hexslicelib`
//!
//! `hexslicelib` is a Rust library for decoding Intel HEX firmware images into
//! typed records and reorganizing them into address-indexed views for
//! downstream tooling (flashers, inspectors).
//!
//! The library provides:
//! - Record decoding and file assembly with positioned errors
//!   (via [`Record::decode`] and [`assemble_lines`]).
//! - A linear (16-bit) address-ordered view for flat images
//!   (via [`build_linear_view`]).
//! - A segmented (32-bit) view keyed by extended linear address, with
//!   inclusive address-range slicing (via [`build_segmented_view`] and
//!   [`SegmentedView::query`]).
//! - Byte, ASCII and regex [`search`] over the decoded payload.
//!
//! ## Example
//!
//! ```
//! use hexslicelib::{assemble_from_path, build_segmented_view};
//!
//! let seq = assemble_from_path("tests/fixtures/segmented.hex").unwrap();
//! let view = build_segmented_view(&seq);
//!
//! let slice = view.query(0x0001_0000, 0x0001_FFFF).unwrap();
//! assert_eq!(slice.record_count(), 1);
//! ```

mod assemble;
mod error;
mod record;
mod search;
mod view;

// Public APIs
pub use assemble::{
    AssembleOptions, AssembledSequence, assemble_from_path, assemble_from_path_with,
    assemble_lines, assemble_lines_with,
};
pub use error::{DecodeError, HexFileError, SyntaxErrorKind};
pub use record::{Record, RecordType};
pub use search::{SearchType, search};
pub use view::{SegmentedView, build_linear_view, build_segmented_view};
