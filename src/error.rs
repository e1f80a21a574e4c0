use thiserror::Error;

use crate::exif::ExifTag;

/// Errors returned by the typed accessors on a parse result.
///
/// Parsing itself never fails: malformed input degrades to missing
/// values and invalid-tag records. These errors exist only for callers
/// asking the result for a tag in a specific shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExifError {
    /// The requested tag is not present in the result
    #[error("missing tag: {0:?}")]
    MissingTag(ExifTag),

    /// The tag is present but its value has an unexpected shape
    #[error("invalid value for {tag:?}: {message}")]
    InvalidTagValue { tag: ExifTag, message: String },
}
