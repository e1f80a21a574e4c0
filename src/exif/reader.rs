//! Tag directory parsing.
//!
//! This module drives one full pass over an EXIF payload: header, primary
//! directory, thumbnail pointer, queued sub-directories, and finally the
//! deferred externally-stored values.
//!
//! # Layout
//!
//! ```text
//! Header:        [2B order marker][2B magic][4B or 8B primary directory offset]
//! Directory:     [2B or 8B entry count][entry]*N [4B or 8B next directory offset]
//! Entry(narrow): [2B tag][2B type][4B count][4B inline value or offset]   (12 bytes)
//! Entry(wide):   [2B tag][2B type][8B count][8B inline value or offset]   (20 bytes)
//! ```
//!
//! A value whose payload fits the inline field is decoded in place; a
//! larger payload leaves an absolute offset in the inline field and is
//! resolved in a deferred pass against the same buffer.
//!
//! Malformed structure never aborts the whole parse: individual entries
//! degrade to skipped or invalid-tag outcomes and parsing continues.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExifError;

use super::cursor::{ByteCursor, ByteOrder};
use super::tags::{DataType, ExifTag};
use super::values::{decode_value, EntryValue};

// =============================================================================
// Variant
// =============================================================================

/// Structural width of the directory layout.
///
/// The narrow (classic) layout uses 16-bit entry counts and 4-byte
/// offsets; the wide (BigTIFF-style) layout uses 64-bit counts and 8-byte
/// offsets. Callers select the variant from information decided upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Classic,
    Big,
}

impl Variant {
    /// Magic constant following the byte-order marker.
    const fn magic(self) -> u16 {
        match self {
            Variant::Classic => 0x002A,
            Variant::Big => 0x002B,
        }
    }

    /// Size of one directory entry in bytes.
    ///
    /// Classic: 12 (2 tag + 2 type + 4 count + 4 value/offset)
    /// Big: 20 (2 tag + 2 type + 8 count + 8 value/offset)
    const fn entry_size(self) -> usize {
        match self {
            Variant::Classic => 12,
            Variant::Big => 20,
        }
    }

    /// Size of the inline value/offset field in an entry.
    ///
    /// This is the inline storage threshold: payloads up to this many
    /// bytes are stored in the entry itself.
    const fn inline_size(self) -> u64 {
        match self {
            Variant::Classic => 4,
            Variant::Big => 8,
        }
    }
}

// =============================================================================
// Values and Pending Work
// =============================================================================

/// One resolved metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    /// Tag naming the field
    pub tag: ExifTag,
    /// Data type the payload was decoded as
    pub data_type: DataType,
    /// Scalar or array payload
    pub value: EntryValue,
}

/// An externally stored value waiting for the deferred read pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingValue {
    tag: ExifTag,
    data_type: DataType,
    count: u64,
    offset: u64,
}

/// Thumbnail stream position extracted from the thumbnail directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailInfo {
    /// Absolute offset of the thumbnail payload in the buffer
    pub offset: u64,
    /// Byte length of the thumbnail payload
    pub length: u64,
}

/// Outcome of reading a single directory entry.
///
/// Every fallible step maps to a variant here; the directory loop
/// aggregates outcomes instead of unwinding.
enum EntryOutcome {
    /// Not enough bytes remain for one more record; stop this directory
    Truncated,
    /// Entry carried an unknown data type or an empty payload; drop it
    Skipped,
    /// Entry failed offset/size validation; record the tag and continue
    Invalid(ExifTag),
    /// Payload decoded in place from the inline field
    Inline(Value),
    /// Payload lives elsewhere in the buffer; read it in the deferred pass
    External(PendingValue),
}

// =============================================================================
// ParseResult
// =============================================================================

/// The flat value collection produced by one parse.
///
/// Values are keyed by tag identity: the first occurrence of a tag wins
/// and later duplicates are dropped. Entries that failed offset or size
/// validation are listed in `invalid_tags` and produce no value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Resolved values in discovery order
    pub values: Vec<Value>,
    /// Tags whose entries failed validation
    pub invalid_tags: Vec<ExifTag>,
    /// Thumbnail position, when the thumbnail directory declared one
    pub thumbnail: Option<ThumbnailInfo>,
}

impl ParseResult {
    /// Look up a value by tag.
    pub fn get(&self, tag: ExifTag) -> Option<&Value> {
        self.values.iter().find(|v| v.tag == tag)
    }

    /// Whether a tag is present in the result.
    pub fn contains(&self, tag: ExifTag) -> bool {
        self.get(tag).is_some()
    }

    /// Read a tag as a single unsigned integer.
    pub fn get_u64(&self, tag: ExifTag) -> Result<u64, ExifError> {
        let value = self.get(tag).ok_or(ExifError::MissingTag(tag))?;
        value.value.as_u64().ok_or_else(|| ExifError::InvalidTagValue {
            tag,
            message: format!("expected unsigned scalar, got {:?}", value.data_type),
        })
    }

    /// Read a tag as a single u32, rejecting values that do not fit.
    pub fn get_u32(&self, tag: ExifTag) -> Result<u32, ExifError> {
        let value = self.get_u64(tag)?;
        u32::try_from(value).map_err(|_| ExifError::InvalidTagValue {
            tag,
            message: format!("value {value} does not fit in u32"),
        })
    }

    /// Read a tag as a list of unsigned integers.
    ///
    /// Scalars are returned as a one-element list.
    pub fn get_u64_array(&self, tag: ExifTag) -> Result<Vec<u64>, ExifError> {
        let value = self.get(tag).ok_or(ExifError::MissingTag(tag))?;
        value
            .value
            .to_u64_vec()
            .ok_or_else(|| ExifError::InvalidTagValue {
                tag,
                message: format!("expected unsigned values, got {:?}", value.data_type),
            })
    }

    /// Read a tag as a string.
    pub fn get_string(&self, tag: ExifTag) -> Result<&str, ExifError> {
        let value = self.get(tag).ok_or(ExifError::MissingTag(tag))?;
        match &value.value {
            EntryValue::Ascii(s) => Ok(s),
            _ => Err(ExifError::InvalidTagValue {
                tag,
                message: format!("expected Ascii, got {:?}", value.data_type),
            }),
        }
    }
}

// =============================================================================
// ParseContext
// =============================================================================

/// Working state for one parse, threaded through the pipeline stages by
/// exclusive ownership.
struct ParseContext<'a> {
    cursor: ByteCursor<'a>,
    variant: Variant,
    values: Vec<Value>,
    invalid_tags: Vec<ExifTag>,
    /// Externally stored values, drained after all directory passes
    pending_values: Vec<PendingValue>,
    /// Sub-directory offsets discovered under pointer tags, FIFO
    pending_dirs: VecDeque<u64>,
    /// Directory offsets already entered; breaks pointer cycles
    visited: HashSet<u64>,
}

impl<'a> ParseContext<'a> {
    fn new(data: &'a [u8], variant: Variant) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            variant,
            values: Vec::new(),
            invalid_tags: Vec::new(),
            pending_values: Vec::new(),
            pending_dirs: VecDeque::new(),
            visited: HashSet::new(),
        }
    }

    /// Consume the header: order marker, magic, primary directory offset.
    ///
    /// Returns `None` when the magic does not match the variant; the
    /// whole parse then yields an empty result.
    fn read_header(&mut self) -> Option<u64> {
        // The marker bytes are compared as a little-endian u16 before the
        // byte order is known.
        let marker = self.cursor.read_u16().unwrap_or(0);
        self.cursor.set_byte_order(ByteOrder::from_marker(marker));

        let magic = self.cursor.read_u16().unwrap_or(0);
        if magic != self.variant.magic() {
            debug!(magic, expected = self.variant.magic(), "unexpected magic, rejecting payload");
            return None;
        }

        Some(self.read_offset())
    }

    /// Read one offset field at the active width (4 or 8 bytes).
    fn read_offset(&mut self) -> u64 {
        match self.variant {
            Variant::Classic => u64::from(self.cursor.read_u32().unwrap_or(0)),
            Variant::Big => self.cursor.read_u64().unwrap_or(0),
        }
    }

    /// Read one directory at `offset`, decoding inline values and queuing
    /// external values and sub-directory pointers.
    ///
    /// An offset past the end of the buffer reads nothing. Entries
    /// already read are kept when the directory turns out truncated.
    fn read_directory(&mut self, offset: u64) {
        if offset > self.cursor.len() {
            return;
        }
        self.visited.insert(offset);
        self.cursor.seek(offset);

        let count = match self.variant {
            Variant::Classic => u64::from(self.cursor.read_u16().unwrap_or(0)),
            Variant::Big => self.cursor.read_u64().unwrap_or(0),
        };

        for _ in 0..count {
            match self.read_entry() {
                EntryOutcome::Truncated => break,
                EntryOutcome::Skipped => {}
                EntryOutcome::Invalid(tag) => self.invalid_tags.push(tag),
                EntryOutcome::Inline(value) => self.add_value(value),
                EntryOutcome::External(pending) => self.pending_values.push(pending),
            }
        }
    }

    /// Decode one fixed-size entry record at the cursor.
    fn read_entry(&mut self) -> EntryOutcome {
        let order = self.cursor.byte_order();
        let variant = self.variant;

        let Some(record) = self.cursor.try_span(variant.entry_size()) else {
            return EntryOutcome::Truncated;
        };

        let tag = ExifTag::from_u16(order.read_u16(&record[0..2]));
        let type_code = order.read_u16(&record[2..4]);
        let (raw_count, inline) = match variant {
            Variant::Classic => (u64::from(order.read_u32(&record[4..8])), &record[8..12]),
            Variant::Big => (order.read_u64(&record[4..12]), &record[12..20]),
        };

        let Some(data_type) = DataType::from_u16(type_code) else {
            // Unknown type codes drop the entry without flagging the tag
            return EntryOutcome::Skipped;
        };

        // An Undefined entry with count 0 can only be an inline blob:
        // force the count to the inline width instead of producing a
        // zero-length external reference.
        let count = if data_type == DataType::Undefined && raw_count == 0 {
            variant.inline_size()
        } else {
            raw_count
        };

        let Some(required) = count.checked_mul(data_type.byte_size()) else {
            return EntryOutcome::Invalid(tag);
        };

        if required > variant.inline_size() {
            // The inline field holds an absolute offset instead
            let offset = match variant {
                Variant::Classic => u64::from(order.read_u32(inline)),
                Variant::Big => order.read_u64(inline),
            };
            let in_bounds = offset
                .checked_add(required)
                .is_some_and(|end| end <= self.cursor.len());
            if !in_bounds {
                debug!(tag = ?tag, offset, required, "external value out of bounds");
                return EntryOutcome::Invalid(tag);
            }
            return EntryOutcome::External(PendingValue {
                tag,
                data_type,
                count,
                offset,
            });
        }

        let as_array = count > 1 || tag.is_array_valued();
        match decode_value(data_type, &inline[..required as usize], order, as_array) {
            Some(value) => EntryOutcome::Inline(self.finish_value(tag, data_type, value)),
            None => EntryOutcome::Skipped,
        }
    }

    /// Apply the wide-layout widening rule and assemble the value.
    fn finish_value(&self, tag: ExifTag, data_type: DataType, value: EntryValue) -> Value {
        if self.variant == Variant::Big && tag.is_long8_in_wide() {
            let value = value.widen_to_long8();
            let data_type = match data_type {
                DataType::Byte | DataType::Short | DataType::Long => DataType::Long8,
                DataType::Ifd => DataType::Ifd8,
                other => other,
            };
            return Value {
                tag,
                data_type,
                value,
            };
        }
        Value {
            tag,
            data_type,
            value,
        }
    }

    /// Insert a resolved value, routing pointer tags to the traversal
    /// queue and enforcing first-occurrence-wins per tag.
    fn add_value(&mut self, value: Value) {
        // Pointer values are consumed by traversal, never surfaced
        if value.tag.is_sub_directory_pointer() {
            if let Some(offset) = value.value.as_u64() {
                self.pending_dirs.push_back(offset);
            }
            return;
        }
        if value.tag.is_sub_directory_list() {
            if let Some(offsets) = value.value.to_u64_vec() {
                self.pending_dirs.extend(offsets);
            }
            return;
        }

        if self.values.iter().any(|v| v.tag == value.tag) {
            debug!(tag = ?value.tag, data_type = ?value.data_type, "duplicate tag dropped");
            return;
        }

        self.values.push(value);
    }

    /// Parse every queued sub-directory, breadth-first in discovery
    /// order, merging values into the shared collection.
    ///
    /// Offsets already entered (including the primary directory's) are
    /// skipped, so self-referencing and mutually cyclic pointers
    /// terminate.
    fn resolve_sub_directories(&mut self) {
        while let Some(offset) = self.pending_dirs.pop_front() {
            if self.visited.contains(&offset) {
                debug!(offset, "sub-directory offset already visited, skipping");
                continue;
            }
            self.read_directory(offset);
        }
    }

    /// Drain the deferred external values against the same buffer.
    ///
    /// Runs strictly after every directory pass has completed. A short
    /// read drops the entry silently.
    fn resolve_external_values(&mut self) {
        let order = self.cursor.byte_order();
        let pending = std::mem::take(&mut self.pending_values);

        for entry in pending {
            // Bounds were validated when the entry was queued; the length
            // check here is what keeps a short read from faulting.
            let required = entry.count * entry.data_type.byte_size();
            self.cursor.seek(entry.offset);
            let Some(span) = self.cursor.try_span(required as usize) else {
                continue;
            };

            let as_array = entry.count > 1 || entry.tag.is_array_valued();
            if let Some(value) = decode_value(entry.data_type, span, order, as_array) {
                let value = self.finish_value(entry.tag, entry.data_type, value);
                self.add_value(value);
            }
        }
    }
}

// =============================================================================
// ExifReader
// =============================================================================

/// Parser for EXIF tag directories embedded in an in-memory buffer.
///
/// The reader borrows the buffer and never mutates it; one call to
/// [`parse`](Self::parse) or [`parse_big`](Self::parse_big) performs one
/// full pass and hands the result collection to the caller.
///
/// Malformed input never panics and never returns an error: structural
/// rejection yields an empty result, and per-entry problems degrade to
/// dropped entries or invalid-tag records.
///
/// # Example
///
/// ```
/// use exif_reader::ExifReader;
///
/// // Little-endian header with an empty primary directory at offset 8
/// let data = [
///     0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // header
///     0x00, 0x00, // entry count = 0
/// ];
/// let result = ExifReader::new(&data).parse();
/// assert!(result.values.is_empty());
/// assert!(result.invalid_tags.is_empty());
/// ```
#[derive(Debug)]
pub struct ExifReader<'a> {
    data: &'a [u8],
}

impl<'a> ExifReader<'a> {
    /// Create a reader over a raw EXIF payload.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Parse the buffer as the classic 32-bit layout.
    ///
    /// 16-bit entry counts, 4-byte offsets, 4-byte inline fields.
    pub fn parse(&self) -> ParseResult {
        self.parse_variant(Variant::Classic)
    }

    /// Parse the buffer as the wide 64-bit layout.
    ///
    /// 64-bit entry counts, 8-byte offsets, 8-byte inline fields.
    pub fn parse_big(&self) -> ParseResult {
        self.parse_variant(Variant::Big)
    }

    fn parse_variant(&self, variant: Variant) -> ParseResult {
        let mut ctx = ParseContext::new(self.data, variant);

        let Some(primary_offset) = ctx.read_header() else {
            return ParseResult::default();
        };

        ctx.read_directory(primary_offset);

        // The field after the last entry points at the next directory,
        // which holds the thumbnail.
        let next_offset = ctx.read_offset();
        let thumbnail = self.read_thumbnail(variant, ctx.cursor.byte_order(), next_offset);

        ctx.resolve_sub_directories();
        ctx.resolve_external_values();

        ParseResult {
            values: ctx.values,
            invalid_tags: ctx.invalid_tags,
            thumbnail,
        }
    }

    /// Resolve the thumbnail directory eagerly, extracting only the
    /// stream offset/length pair.
    ///
    /// The pass runs in an isolated context: the thumbnail directory's
    /// other tags, pointer discoveries, and pending external values are
    /// all discarded.
    fn read_thumbnail(
        &self,
        variant: Variant,
        order: ByteOrder,
        offset: u64,
    ) -> Option<ThumbnailInfo> {
        if offset == 0 {
            return None;
        }

        let mut scratch = ParseContext::new(self.data, variant);
        scratch.cursor.set_byte_order(order);
        scratch.read_directory(offset);

        let mut stream_offset = None;
        let mut stream_length = None;
        for value in &scratch.values {
            match value.tag {
                ExifTag::JpegInterchangeFormat => stream_offset = value.value.as_u64(),
                ExifTag::JpegInterchangeFormatLength => stream_length = value.value.as_u64(),
                _ => {}
            }
        }

        match (stream_offset, stream_length) {
            (Some(offset), Some(length)) => Some(ThumbnailInfo { offset, length }),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
