//! Error types produced by the stream, tag, and envelope layers.
use thiserror::Error;

/// Errors that can occur while reading or writing NBT data.
#[derive(Error, Debug)]
pub enum NbtError {
    /// An I/O error occurred on the underlying source or sink.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The size tracker's byte budget was exceeded while decoding.
    #[error("tried to read NBT data that was too big")]
    TagTooBig,
    /// Nested container depth exceeded the limit of 512.
    #[error("tried to read NBT with too high complexity, depth > 512")]
    DepthExceeded,
    /// A tag id outside `0..=12` was encountered during decode or in `create`.
    #[error("invalid tag id {0}")]
    InvalidTagId(u8),
    /// A list header declared `element_type_id = 0` with a nonzero count.
    #[error("missing type on list tag")]
    MissingListType,
    /// A write-side string exceeded 65535 bytes.
    #[error("cannot write string: {0} bytes exceeds the 65535 byte limit")]
    StringTooLong(usize),
    /// The byte source was exhausted before a required read completed.
    #[error("cannot read that many bytes: source exhausted")]
    ShortRead,
    /// Gzip inflate reported a non-benign status, or the inflated output exceeded
    /// the decompression ceiling.
    #[error("bad gzip compressed data")]
    BadCompression,
    /// `read_tag_compound` was called on a root whose id was not `TAG_Compound` (10).
    #[error("not a compound tag: root id was {0}")]
    NotACompound(u8),
    /// A list element's tag id did not match the list's established element type.
    #[error(
        "trying to add tag of different type to list tag: expected {expected}, found {found}"
    )]
    TagMismatch { expected: u8, found: u8 },
    /// A string payload was not valid UTF-8.
    #[error("string payload is not valid utf-8")]
    Utf8,
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, NbtError>;
