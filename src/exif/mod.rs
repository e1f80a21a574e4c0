//! EXIF tag directory parsing.
//!
//! This module decodes the IFD (Image File Directory) structure that EXIF
//! metadata is stored in: a directory of typed tag records, read from a
//! raw byte buffer already extracted from the host image container.
//!
//! # Key Concepts
//!
//! - **Byte order**: the payload declares its endianness ("II" =
//!   little-endian, anything else = big-endian) in the first two header
//!   bytes. All multi-byte values must be read respecting this order.
//!
//! - **Narrow vs wide layout**: the classic layout uses 16-bit entry
//!   counts and 4-byte offsets; the BigTIFF-style layout uses 64-bit
//!   counts and 8-byte offsets. Callers pick the entry point for the
//!   layout their container declared.
//!
//! - **Inline vs offset values**: small values are stored inline in the
//!   directory entry; larger values are stored elsewhere in the buffer at
//!   an offset the entry points to.
//!
//! - **Sub-directories**: some tags point at nested directories (the
//!   photo block, the GPS block); their values are traversed rather than
//!   surfaced.

mod cursor;
mod reader;
mod tags;
mod values;

pub use cursor::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, ByteCursor,
    ByteOrder, BYTE_ORDER_MARKER_LE,
};
pub use reader::{ExifReader, ParseResult, ThumbnailInfo, Value};
pub use tags::{DataType, ExifTag};
pub use values::{decode_value, EntryValue, Rational, SignedRational};
