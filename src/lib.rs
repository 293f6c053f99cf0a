#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use strum_macros::{Display, IntoStaticStr};

/// Byte-budget tracker and recursion-depth ceiling for bounded decoding.
pub mod budget;
/// Per-tag wire encoding and the top-level read/write envelope.
pub mod codec;
/// Error types produced by the stream, tag, and envelope layers.
pub mod err;
/// Byte-stream abstraction: read-side cursor and write-side growable sink.
pub mod stream;
/// The twelve tag payload types and the two containers (`Compound`, `List`).
pub mod tag;

/// An enum representing all possible NBT data.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    /// An 8-bit signed integer.
    Byte(tag::Byte),
    /// A 16-bit signed integer.
    Short(tag::Short),
    /// A 32-bit signed integer.
    Int(tag::Int),
    /// A 64-bit signed integer.
    Long(tag::Long),
    /// A 32-bit floating point number.
    Float(tag::Float),
    /// A 64-bit floating point number.
    Double(tag::Double),
    /// A string of characters.
    ///
    /// Should never be larger than 65535 bytes encoded.
    String(tag::String),
    /// A map containing zero or more key-value pairs.
    ///
    /// Each key maps to exactly one [NbtTag] of any type.
    Compound(tag::Compound),
    /// A variable-length, homogeneous list of [NbtTag]s.
    ///
    /// Lists fail to encode/decode should they contain values whose type does not
    /// match the type of the first element in the list.
    List(tag::List),
    /// A variable-length array containing 8-bit signed integers.
    ByteArray(tag::ByteArray),
    /// A variable-length array containing 32-bit signed integers.
    IntArray(tag::IntArray),
    /// A variable-length array containing 64-bit signed integers.
    LongArray(tag::LongArray),
}

/// An enum representing all possible NBT tag types.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Display, IntoStaticStr, Eq, PartialEq)]
pub enum TagType {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Compound,
    List,
    ByteArray,
    IntArray,
    LongArray,
}

impl NbtTag {
    /// Returns the [TagType] associated with the tag variant contained in the enum.
    pub fn tag_type(&self) -> TagType {
        match self {
            NbtTag::Byte(_) => TagType::Byte,
            NbtTag::Short(_) => TagType::Short,
            NbtTag::Int(_) => TagType::Int,
            NbtTag::Long(_) => TagType::Long,
            NbtTag::Float(_) => TagType::Float,
            NbtTag::Double(_) => TagType::Double,
            NbtTag::String(_) => TagType::String,
            NbtTag::Compound(_) => TagType::Compound,
            NbtTag::List(_) => TagType::List,
            NbtTag::ByteArray(_) => TagType::ByteArray,
            NbtTag::IntArray(_) => TagType::IntArray,
            NbtTag::LongArray(_) => TagType::LongArray,
        }
    }

    /// The numeric tag id used on the wire (`1..=12`; `0` is reserved for the
    /// compound terminator and has no corresponding variant).
    pub fn id(&self) -> u8 {
        match self {
            NbtTag::Byte(_) => 1,
            NbtTag::Short(_) => 2,
            NbtTag::Int(_) => 3,
            NbtTag::Long(_) => 4,
            NbtTag::Float(_) => 5,
            NbtTag::Double(_) => 6,
            NbtTag::String(_) => 8,
            NbtTag::Compound(_) => 10,
            NbtTag::List(_) => 9,
            NbtTag::ByteArray(_) => 7,
            NbtTag::IntArray(_) => 11,
            NbtTag::LongArray(_) => 12,
        }
    }

    /// The wire type name, e.g. `"TAG_Compound"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            NbtTag::Byte(_) => "TAG_Byte",
            NbtTag::Short(_) => "TAG_Short",
            NbtTag::Int(_) => "TAG_Int",
            NbtTag::Long(_) => "TAG_Long",
            NbtTag::Float(_) => "TAG_Float",
            NbtTag::Double(_) => "TAG_Double",
            NbtTag::String(_) => "TAG_String",
            NbtTag::Compound(_) => "TAG_Compound",
            NbtTag::List(_) => "TAG_List",
            NbtTag::ByteArray(_) => "TAG_Byte_Array",
            NbtTag::IntArray(_) => "TAG_Int_Array",
            NbtTag::LongArray(_) => "TAG_Long_Array",
        }
    }

    /// Returns a default-valued tag for the given wire id, or `None` if `id` is not
    /// a recognized, constructible tag id (`1..=12`).
    pub fn create(id: u8) -> Option<NbtTag> {
        Some(match id {
            1 => NbtTag::Byte(Default::default()),
            2 => NbtTag::Short(Default::default()),
            3 => NbtTag::Int(Default::default()),
            4 => NbtTag::Long(Default::default()),
            5 => NbtTag::Float(Default::default()),
            6 => NbtTag::Double(Default::default()),
            8 => NbtTag::String(tag::String::Utf8(String::new())),
            10 => NbtTag::Compound(Default::default()),
            9 => NbtTag::List(Default::default()),
            7 => NbtTag::ByteArray(Default::default()),
            11 => NbtTag::IntArray(Default::default()),
            12 => NbtTag::LongArray(Default::default()),
            _ => return None,
        })
    }
}

impl Default for NbtTag {
    fn default() -> Self {
        Self::Compound(Default::default())
    }
}
