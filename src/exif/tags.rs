//! EXIF tag and data type definitions.
//!
//! This module defines the vocabulary for tag directory parsing:
//! - Data types that determine how values are encoded
//! - Tag IDs that identify metadata fields
//!
//! The definitions support both the classic 32-bit layout and the
//! BigTIFF-style 64-bit layout.

use serde::{Deserialize, Serialize};

// =============================================================================
// Data Types
// =============================================================================

/// EXIF data types that determine how values are encoded.
///
/// Each data type has a fixed size in bytes, which is critical for:
/// - Determining if a value fits inline in a directory entry
/// - Splitting array payloads into elements
///
/// Types 16-18 are the 64-bit additions from BigTIFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum DataType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// 8-bit character, NUL-terminated string (1 byte per character)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Unsigned numerator/denominator pair (8 bytes)
    Rational = 5,

    /// Signed 8-bit integer (1 byte)
    SignedByte = 6,

    /// Opaque byte data (1 byte per element)
    Undefined = 7,

    /// Signed 16-bit integer (2 bytes)
    SignedShort = 8,

    /// Signed 32-bit integer (4 bytes)
    SignedLong = 9,

    /// Signed numerator/denominator pair (8 bytes)
    SignedRational = 10,

    /// IEEE-754 single-precision float (4 bytes)
    Float = 11,

    /// IEEE-754 double-precision float (8 bytes)
    Double = 12,

    /// Directory pointer, same encoding as Long (4 bytes)
    Ifd = 13,

    /// Unsigned 64-bit integer (8 bytes) - wide layout only
    Long8 = 16,

    /// Signed 64-bit integer (8 bytes) - wide layout only
    SignedLong8 = 17,

    /// 64-bit directory pointer, same encoding as Long8 (8 bytes)
    Ifd8 = 18,
}

impl DataType {
    /// Size of a single value of this type in bytes.
    ///
    /// This is the single source of truth for element sizes; both the
    /// inline/external classification and array decoding derive from it.
    #[inline]
    pub const fn byte_size(self) -> u64 {
        match self {
            DataType::Byte => 1,
            DataType::Ascii => 1,
            DataType::Short => 2,
            DataType::Long => 4,
            DataType::Rational => 8,
            DataType::SignedByte => 1,
            DataType::Undefined => 1,
            DataType::SignedShort => 2,
            DataType::SignedLong => 4,
            DataType::SignedRational => 8,
            DataType::Float => 4,
            DataType::Double => 8,
            DataType::Ifd => 4,
            DataType::Long8 => 8,
            DataType::SignedLong8 => 8,
            DataType::Ifd8 => 8,
        }
    }

    /// Create a DataType from its on-disk type code.
    ///
    /// Returns `None` for unknown codes. Entries carrying an unknown type
    /// code are silently dropped during parsing.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(DataType::Byte),
            2 => Some(DataType::Ascii),
            3 => Some(DataType::Short),
            4 => Some(DataType::Long),
            5 => Some(DataType::Rational),
            6 => Some(DataType::SignedByte),
            7 => Some(DataType::Undefined),
            8 => Some(DataType::SignedShort),
            9 => Some(DataType::SignedLong),
            10 => Some(DataType::SignedRational),
            11 => Some(DataType::Float),
            12 => Some(DataType::Double),
            13 => Some(DataType::Ifd),
            16 => Some(DataType::Long8),
            17 => Some(DataType::SignedLong8),
            18 => Some(DataType::Ifd8),
            _ => None,
        }
    }

    /// Get the numeric type code.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Tags
// =============================================================================

macro_rules! exif_tags {
    (
        $(
            $(#[$meta:meta])*
            $name:ident = $id:literal,
        )+
    ) => {
        /// EXIF/TIFF tag identifiers.
        ///
        /// Tags are 16-bit identifiers naming one semantic metadata field.
        /// Unrecognized ids are preserved as [`ExifTag::Unknown`] so their
        /// values can still be decoded generically and keyed by identity.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ExifTag {
            $(
                $(#[$meta])*
                $name,
            )+
            /// A tag id outside the known enumeration
            Unknown(u16),
        }

        impl ExifTag {
            /// Create an ExifTag from its numeric id.
            ///
            /// Ids outside the known enumeration map to [`ExifTag::Unknown`];
            /// an unknown tag is not an error.
            pub fn from_u16(value: u16) -> Self {
                match value {
                    $($id => ExifTag::$name,)+
                    other => ExifTag::Unknown(other),
                }
            }

            /// Get the numeric tag id.
            pub const fn as_u16(self) -> u16 {
                match self {
                    $(ExifTag::$name => $id,)+
                    ExifTag::Unknown(value) => value,
                }
            }
        }
    };
}

exif_tags! {
    // -------------------------------------------------------------------------
    // Baseline image structure
    // -------------------------------------------------------------------------
    /// Image width in pixels
    ImageWidth = 256,
    /// Image height (length) in pixels
    ImageLength = 257,
    /// Bits per sample, one value per component
    BitsPerSample = 258,
    /// Compression scheme used for the image data
    Compression = 259,
    /// Photometric interpretation (RGB, YCbCr, ...)
    PhotometricInterpretation = 262,
    /// Bit fill order within a byte
    FillOrder = 266,
    /// Document name the image was scanned from
    DocumentName = 269,
    /// Free-form image description
    ImageDescription = 270,
    /// Camera or scanner manufacturer
    Make = 271,
    /// Camera or scanner model
    Model = 272,
    /// Byte offset of each strip
    StripOffsets = 273,
    /// Orientation of the image with respect to rows and columns
    Orientation = 274,
    /// Number of components per pixel
    SamplesPerPixel = 277,
    /// Rows in each strip
    RowsPerStrip = 278,
    /// Byte count of each strip
    StripByteCounts = 279,
    /// Pixels per resolution unit in the image width direction
    XResolution = 282,
    /// Pixels per resolution unit in the image height direction
    YResolution = 283,
    /// Component layout (chunky vs planar)
    PlanarConfiguration = 284,
    /// Unit for XResolution/YResolution
    ResolutionUnit = 296,
    /// Transfer function, tabulated
    TransferFunction = 301,
    /// Software used to create the image
    Software = 305,
    /// File change date and time
    DateTime = 306,
    /// Person who created the image
    Artist = 315,
    /// Computer the image was created on
    HostComputer = 316,
    /// Prediction scheme applied before compression
    Predictor = 317,
    /// Chromaticity of the white point
    WhitePoint = 318,
    /// Chromaticities of the primary colors
    PrimaryChromaticities = 319,
    /// Color palette for palette-color images
    ColorMap = 320,

    // -------------------------------------------------------------------------
    // Tile organization
    // -------------------------------------------------------------------------
    /// Width of each tile in pixels
    TileWidth = 322,
    /// Height (length) of each tile in pixels
    TileLength = 323,
    /// Byte offset of each tile
    TileOffsets = 324,
    /// Byte count of each tile
    TileByteCounts = 325,

    // -------------------------------------------------------------------------
    // Directory pointers
    // -------------------------------------------------------------------------
    /// Offsets of child image directories
    SubIfds = 330,

    // -------------------------------------------------------------------------
    // Misc baseline
    // -------------------------------------------------------------------------
    /// Sample format (unsigned, signed, float, ...)
    SampleFormat = 339,
    /// JPEG quantization and Huffman tables for abbreviated streams
    JpegTables = 347,
    /// Offset of the thumbnail JPEG interchange stream
    JpegInterchangeFormat = 513,
    /// Byte length of the thumbnail JPEG interchange stream
    JpegInterchangeFormatLength = 514,
    /// YCbCr color conversion coefficients
    YCbCrCoefficients = 529,
    /// YCbCr chroma subsampling factors
    YCbCrSubSampling = 530,
    /// Position of chroma samples relative to luma samples
    YCbCrPositioning = 531,
    /// Reference black and white point values
    ReferenceBlackWhite = 532,
    /// Copyright notice
    Copyright = 33432,

    // -------------------------------------------------------------------------
    // Photo block
    // -------------------------------------------------------------------------
    /// Exposure time in seconds
    ExposureTime = 33434,
    /// Lens F number
    FNumber = 33437,
    /// Pointer to the EXIF photo sub-directory
    SubIfdOffset = 34665,
    /// Class of the exposure program
    ExposureProgram = 34850,
    /// Pointer to the GPS info sub-directory
    GpsIfdOffset = 34853,
    /// ISO speed ratings
    IsoSpeedRatings = 34855,
    /// Supported EXIF version
    ExifVersion = 36864,
    /// Date and time of original data generation
    DateTimeOriginal = 36867,
    /// Date and time of digital data generation
    DateTimeDigitized = 36868,
    /// Meaning of each component
    ComponentsConfiguration = 37121,
    /// Compression mode in bits per pixel
    CompressedBitsPerPixel = 37122,
    /// Shutter speed (APEX)
    ShutterSpeedValue = 37377,
    /// Lens aperture (APEX)
    ApertureValue = 37378,
    /// Brightness (APEX)
    BrightnessValue = 37379,
    /// Exposure bias (APEX)
    ExposureBiasValue = 37380,
    /// Smallest lens F number (APEX)
    MaxApertureValue = 37381,
    /// Distance to the subject in meters
    SubjectDistance = 37382,
    /// Metering mode
    MeteringMode = 37383,
    /// Light source kind
    LightSource = 37384,
    /// Flash firing status and mode
    Flash = 37385,
    /// Lens focal length in millimeters
    FocalLength = 37386,
    /// Manufacturer-private data
    MakerNote = 37500,
    /// User comment
    UserComment = 37510,
    /// Color space information
    ColorSpace = 40961,
    /// Valid image width after compression
    PixelXDimension = 40962,
    /// Valid image height after compression
    PixelYDimension = 40963,
    /// Focal plane X resolution
    FocalPlaneXResolution = 41486,
    /// Focal plane Y resolution
    FocalPlaneYResolution = 41487,
    /// Focal plane resolution unit
    FocalPlaneResolutionUnit = 41488,
    /// Image sensor type
    SensingMethod = 41495,
    /// Image source kind
    FileSource = 41728,
    /// Scene type
    SceneType = 41729,
    /// Special rendering applied
    CustomRendered = 41985,
    /// Exposure mode
    ExposureMode = 41986,
    /// White balance mode
    WhiteBalance = 41987,
    /// Digital zoom ratio
    DigitalZoomRatio = 41988,
    /// Focal length assuming a 35mm film camera
    FocalLengthIn35mmFilm = 41989,
    /// Scene capture type
    SceneCaptureType = 41990,
}

impl ExifTag {
    /// Whether this tag's value is an array even at cardinality 1.
    ///
    /// Mirrors the caller-intent flag of the value model: a request for an
    /// array-valued tag yields an array payload regardless of the count
    /// encoded on disk.
    pub fn is_array_valued(self) -> bool {
        matches!(
            self,
            ExifTag::BitsPerSample
                | ExifTag::StripOffsets
                | ExifTag::StripByteCounts
                | ExifTag::TileOffsets
                | ExifTag::TileByteCounts
                | ExifTag::SubIfds
                | ExifTag::TransferFunction
                | ExifTag::WhitePoint
                | ExifTag::PrimaryChromaticities
                | ExifTag::ColorMap
                | ExifTag::SampleFormat
                | ExifTag::YCbCrCoefficients
                | ExifTag::YCbCrSubSampling
                | ExifTag::ReferenceBlackWhite
                | ExifTag::IsoSpeedRatings
        )
    }

    /// Whether this tag holds a single offset to a nested sub-directory.
    pub fn is_sub_directory_pointer(self) -> bool {
        matches!(self, ExifTag::SubIfdOffset | ExifTag::GpsIfdOffset)
    }

    /// Whether this tag holds a list of offsets to nested sub-directories.
    pub fn is_sub_directory_list(self) -> bool {
        matches!(self, ExifTag::SubIfds)
    }

    /// Whether this tag must resolve to 64-bit-capable storage in the wide
    /// layout, even when declared with a legacy 32-bit type on disk.
    ///
    /// The strip/tile layout tags and the directory pointers are allowed
    /// to carry Long8/Ifd8 in BigTIFF while the legacy Short/Long/Ifd
    /// declarations remain valid, so their resolved values are widened
    /// unconditionally.
    pub fn is_long8_in_wide(self) -> bool {
        matches!(
            self,
            ExifTag::StripOffsets
                | ExifTag::StripByteCounts
                | ExifTag::TileOffsets
                | ExifTag::TileByteCounts
                | ExifTag::SubIfds
                | ExifTag::SubIfdOffset
                | ExifTag::GpsIfdOffset
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
