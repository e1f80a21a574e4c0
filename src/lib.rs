//! # exif-reader
//!
//! An EXIF/TIFF tag directory parser for image metadata extraction.
//!
//! This library decodes the IFD (Image File Directory) structure embedded
//! in image files: a self-referential binary format of typed tag records,
//! with small values stored inline and larger values reached through
//! absolute offsets into the same buffer, plus nested sub-directories for
//! the photo and GPS blocks.
//!
//! ## Features
//!
//! - **Both structural widths**: the classic 32-bit layout and the
//!   BigTIFF-style 64-bit layout, selected per call
//! - **Both byte orders**: little- and big-endian payloads, detected from
//!   the header marker
//! - **Full type table**: all EXIF scalar and array data types, including
//!   rationals, IEEE-754 floats, and the 64-bit BigTIFF additions
//! - **Hostile-input safe**: every offset is bounds-checked before any
//!   read; malformed entries degrade to skipped or invalid-tag records
//!   and never panic or error
//! - **Cycle-proof traversal**: sub-directory pointers are walked with an
//!   explicit queue and a visited set, so crafted self-referencing files
//!   terminate
//!
//! ## Example
//!
//! ```
//! use exif_reader::{ExifReader, ExifTag};
//!
//! // A minimal little-endian payload: header + one-entry directory
//! // holding Orientation = 6.
//! let data = [
//!     0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // header
//!     0x01, 0x00, // entry count = 1
//!     0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, // tag 274, Short, x1
//!     0x06, 0x00, 0x00, 0x00, // inline value = 6
//!     0x00, 0x00, 0x00, 0x00, // next directory offset = none
//! ];
//!
//! let result = ExifReader::new(&data).parse();
//! assert_eq!(result.get_u32(ExifTag::Orientation).unwrap(), 6);
//! ```

pub mod error;
pub mod exif;

// Re-export commonly used types
pub use error::ExifError;
pub use exif::{
    decode_value, ByteCursor, ByteOrder, DataType, EntryValue, ExifReader, ExifTag, ParseResult,
    Rational, SignedRational, ThumbnailInfo, Value,
};
