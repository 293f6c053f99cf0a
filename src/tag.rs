//! The twelve tag payload types and the two containers (`Compound`, `List`).
use indexmap::IndexMap;

use crate::err::{NbtError, Result};
use crate::NbtTag;

/// An 8-bit signed integer.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Byte(pub i8);

/// A 16-bit signed integer.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Short(pub i16);

/// A 32-bit signed integer.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Int(pub i32);

/// A 64-bit signed integer.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Long(pub i64);

/// A 32-bit floating point number.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Float(pub f32);

/// A 64-bit floating point number.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Double(pub f64);

/// Read-only, total conversions between the six numeric tag variants
/// (`get_byte`/`get_short`/... style accessors).
pub trait NumericTag {
    /// Casts the payload to `i8`.
    fn as_byte(&self) -> i8;
    /// Casts the payload to `i16`.
    fn as_short(&self) -> i16;
    /// Casts the payload to `i32`.
    fn as_int(&self) -> i32;
    /// Casts the payload to `i64`.
    fn as_long(&self) -> i64;
    /// Casts the payload to `f32`.
    fn as_float(&self) -> f32;
    /// Casts the payload to `f64`.
    fn as_double(&self) -> f64;
}

macro_rules! impl_numeric_tag {
    ($typ:ty) => {
        impl NumericTag for $typ {
            fn as_byte(&self) -> i8 {
                self.0 as i8
            }
            fn as_short(&self) -> i16 {
                self.0 as i16
            }
            fn as_int(&self) -> i32 {
                self.0 as i32
            }
            fn as_long(&self) -> i64 {
                self.0 as i64
            }
            fn as_float(&self) -> f32 {
                self.0 as f32
            }
            fn as_double(&self) -> f64 {
                self.0 as f64
            }
        }
    };
}
impl_numeric_tag!(Byte);
impl_numeric_tag!(Short);
impl_numeric_tag!(Int);
impl_numeric_tag!(Long);
impl_numeric_tag!(Float);
impl_numeric_tag!(Double);

/// A string of characters.
///
/// Should never be larger than [i16::MAX] bytes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum String {
    /// Normal and correct UTF-8 encoded string.
    Utf8(std::string::String),
    /// Arbitrary bytes that do not constitute valid UTF-8.
    Bytes(Vec<u8>),
}

impl String {
    /// Converts the string tag to a UTF-8 string, substituting invalid characters if necessary.
    pub fn to_string_lossy(&self) -> std::borrow::Cow<str> {
        match self {
            Self::Utf8(str) => std::borrow::Cow::Borrowed(str),
            Self::Bytes(bytes) => std::string::String::from_utf8_lossy(bytes),
        }
    }
}

/// A map containing zero or more key-value pairs.
///
/// Each key maps to exactly one [NbtTag] of any type.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Compound(pub IndexMap<std::string::String, NbtTag>);

/// A variable-length array containing 8-bit signed integers.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct ByteArray(pub Vec<i8>);

/// A variable-length array containing 32-bit signed integers.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct IntArray(pub Vec<i32>);

/// A variable-length array containing 64-bit signed integers.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct LongArray(pub Vec<i64>);

/// A variable-length, homogeneous list of [NbtTag]s.
///
/// The list's element type is established by the first tag appended to it (or by the
/// element type of the source collection it was built from) and does not change back
/// to "unset" until [`List::clear`] is called, even if the list becomes empty through
/// [`List::pop`]/[`List::remove_at`] — the established element type outlives a
/// temporarily-empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    elements: Vec<NbtTag>,
    element_type: u8,
}

impl List {
    /// An empty list with no established element type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from already-homogeneous elements and their shared type id,
    /// bypassing the type-inference `FromIterator`/`From<Vec<_>>` impls — needed on
    /// the decode path, where an empty list still carries a wire-declared element
    /// type that `elements.first()` can't recover.
    pub(crate) fn from_parts(elements: Vec<NbtTag>, element_type: u8) -> Self {
        List {
            elements,
            element_type,
        }
    }

    /// The tag id every element in this list must share; `0` (end) if empty and
    /// untyped.
    pub fn element_type_id(&self) -> u8 {
        self.element_type
    }

    /// Number of elements in the list.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the list's elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NbtTag> {
        self.elements.iter()
    }

    /// Appends `tag`, transferring ownership. Sets the list's element type if this is
    /// the first element; fails with [`NbtError::TagMismatch`] if `tag`'s id doesn't
    /// match an already-established type.
    pub fn append(&mut self, tag: NbtTag) -> Result<()> {
        let id = tag.id();
        if self.elements.is_empty() && self.element_type == 0 {
            self.element_type = id;
        } else if id != self.element_type {
            return Err(NbtError::TagMismatch {
                expected: self.element_type,
                found: id,
            });
        }
        self.elements.push(tag);
        Ok(())
    }

    /// Removes and returns the last element, if any. Does not reset the element type.
    pub fn pop(&mut self) -> Option<NbtTag> {
        self.elements.pop()
    }

    /// Removes and returns the element at `index`. Does not reset the element type.
    pub fn remove_at(&mut self, index: usize) -> NbtTag {
        self.elements.remove(index)
    }

    /// Empties the list and resets its element type to unset.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.element_type = 0;
    }
}

impl std::ops::Deref for List {
    type Target = [NbtTag];

    fn deref(&self) -> &Self::Target {
        &self.elements
    }
}

impl<T: Into<NbtTag>> FromIterator<T> for List {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<NbtTag> = iter.into_iter().map(Into::into).collect();
        let element_type = elements.first().map(|t| t.id()).unwrap_or(0);
        List {
            elements,
            element_type,
        }
    }
}

impl<T: Into<NbtTag>> From<Vec<T>> for List {
    fn from(value: Vec<T>) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Into<NbtTag>, const N: usize> From<[T; N]> for List {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl From<List> for Vec<NbtTag> {
    fn from(value: List) -> Self {
        value.elements
    }
}

macro_rules! impl_enum_conv {
    ($typ:ty, $enum_variant:path) => {
        impl TryFrom<NbtTag> for $typ {
            type Error = NbtTag;

            fn try_from(value: NbtTag) -> std::result::Result<Self, Self::Error> {
                if let $enum_variant(v) = value {
                    Ok(v)
                } else {
                    Err(value)
                }
            }
        }

        impl From<$typ> for NbtTag {
            fn from(value: $typ) -> Self {
                $enum_variant(value)
            }
        }
    };
    ($(($typ:ty, $enum_variant:path)$(,)?)*) => {
        $(impl_enum_conv!($typ, $enum_variant);)*
    };
}

impl_enum_conv!(
    (Byte, NbtTag::Byte),
    (Short, NbtTag::Short),
    (Int, NbtTag::Int),
    (Long, NbtTag::Long),
    (Float, NbtTag::Float),
    (Double, NbtTag::Double),
    (String, NbtTag::String),
    (Compound, NbtTag::Compound),
    (List, NbtTag::List),
    (ByteArray, NbtTag::ByteArray),
    (IntArray, NbtTag::IntArray),
    (LongArray, NbtTag::LongArray),
);

macro_rules! impl_primitive_conv {
    ($prim:ty, $newtyp:ident) => {
        impl From<$prim> for $newtyp {
            fn from(value: $prim) -> Self {
                $newtyp(value)
            }
        }

        impl From<$newtyp> for $prim {
            fn from(value: $newtyp) -> Self {
                value.0
            }
        }
    };
}
impl_primitive_conv!(i8, Byte);
impl_primitive_conv!(i16, Short);
impl_primitive_conv!(i32, Int);
impl_primitive_conv!(i64, Long);
impl_primitive_conv!(f32, Float);
impl_primitive_conv!(f64, Double);

impl From<std::string::String> for String {
    fn from(value: std::string::String) -> Self {
        String::Utf8(value)
    }
}

/// Special case: converting `&str` to a [String] requires a clone.
impl From<&str> for String {
    fn from(value: &str) -> Self {
        String::Utf8(value.to_string())
    }
}

impl From<IndexMap<std::string::String, NbtTag>> for Compound {
    fn from(value: IndexMap<std::string::String, NbtTag>) -> Self {
        Compound(value)
    }
}

impl std::ops::Deref for Compound {
    type Target = IndexMap<std::string::String, NbtTag>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Compound {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<i8>> for ByteArray {
    fn from(value: Vec<i8>) -> Self {
        ByteArray(value)
    }
}

impl From<Vec<i32>> for IntArray {
    fn from(value: Vec<i32>) -> Self {
        IntArray(value)
    }
}

impl From<Vec<i64>> for LongArray {
    fn from(value: Vec<i64>) -> Self {
        LongArray(value)
    }
}

impl std::ops::Deref for ByteArray {
    type Target = Vec<i8>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for IntArray {
    type Target = Vec<i32>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for LongArray {
    type Target = Vec<i64>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Contains utilities for the [Compound] NBT tag.
pub mod compound {
    use crate::{tag, NbtTag};

    impl super::Compound {
        /// Returns a reference to a contained tag by name, if it exists and is a byte tag.
        pub fn get_byte(&self, key: &str) -> Option<&tag::Byte> {
            match self.get(key) {
                Some(NbtTag::Byte(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a short tag.
        pub fn get_short(&self, key: &str) -> Option<&tag::Short> {
            match self.get(key) {
                Some(NbtTag::Short(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is an int tag.
        pub fn get_int(&self, key: &str) -> Option<&tag::Int> {
            match self.get(key) {
                Some(NbtTag::Int(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a long tag.
        pub fn get_long(&self, key: &str) -> Option<&tag::Long> {
            match self.get(key) {
                Some(NbtTag::Long(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a float tag.
        pub fn get_float(&self, key: &str) -> Option<&tag::Float> {
            match self.get(key) {
                Some(NbtTag::Float(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a double tag.
        pub fn get_double(&self, key: &str) -> Option<&tag::Double> {
            match self.get(key) {
                Some(NbtTag::Double(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a string tag.
        pub fn get_string(&self, key: &str) -> Option<&tag::String> {
            match self.get(key) {
                Some(NbtTag::String(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a compound tag.
        pub fn get_compound(&self, key: &str) -> Option<&tag::Compound> {
            match self.get(key) {
                Some(NbtTag::Compound(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a list tag.
        pub fn get_list(&self, key: &str) -> Option<&tag::List> {
            match self.get(key) {
                Some(NbtTag::List(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a byte array tag.
        pub fn get_byte_array(&self, key: &str) -> Option<&tag::ByteArray> {
            match self.get(key) {
                Some(NbtTag::ByteArray(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is an int array tag.
        pub fn get_int_array(&self, key: &str) -> Option<&tag::IntArray> {
            match self.get(key) {
                Some(NbtTag::IntArray(val)) => Some(val),
                _ => None,
            }
        }
        /// Returns a reference to a contained tag by name, if it exists and is a long array tag.
        pub fn get_long_array(&self, key: &str) -> Option<&tag::LongArray> {
            match self.get(key) {
                Some(NbtTag::LongArray(val)) => Some(val),
                _ => None,
            }
        }

        /// Inserts `tag` under `name`, returning the previous value if one existed —
        /// a thin, explicitly-named wrapper over the underlying map's `insert`
        /// (available directly too, via `Deref`/`DerefMut`).
        pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<NbtTag>) -> Option<NbtTag> {
            self.0.insert(name.into(), tag.into())
        }

        /// Removes and returns the tag under `name`, if any.
        pub fn remove(&mut self, name: &str) -> Option<NbtTag> {
            self.0.shift_remove(name)
        }

        /// Removes all entries.
        pub fn clear(&mut self) {
            self.0.clear();
        }
    }

    /// Allows for a more ergonomic way of creating NBT compound tags.
    #[must_use]
    #[derive(Debug, Default)]
    pub struct Builder {
        value: super::Compound,
    }

    impl super::Compound {
        /// Returns a new builder object to create a compound tag.
        pub fn builder() -> Builder {
            Builder {
                value: Default::default(),
            }
        }
    }

    impl Builder {
        /// Consume the builder and return the underlying compound tag.
        #[must_use]
        pub fn build(self) -> super::Compound {
            self.value
        }

        /// Inserts a new NBT tag into the underlying compound tag under the provided key.
        ///
        /// Panics when inserting with a key that already exists.
        pub fn with<T: Into<NbtTag>>(mut self, key: impl Into<String>, value: T) -> Self {
            let key = key.into();
            if let Some(val) = self.value.0.get(&key) {
                panic!("trying to overwrite key `{key}` that has value: {val:?}");
            }
            self.value.0.insert(key, value.into());
            self
        }

        /// Inserts a [tag::Byte] into the builder under the provided key.
        pub fn with_byte(self, key: impl Into<String>, v: impl Into<tag::Byte>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::Short] into the builder under the provided key.
        pub fn with_short(self, key: impl Into<String>, v: impl Into<tag::Short>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::Int] into the builder under the provided key.
        pub fn with_int(self, key: impl Into<String>, v: impl Into<tag::Int>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::Long] into the builder under the provided key.
        pub fn with_long(self, key: impl Into<String>, v: impl Into<tag::Long>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::Float] into the builder under the provided key.
        pub fn with_float(self, key: impl Into<String>, v: impl Into<tag::Float>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::Double] into the builder under the provided key.
        pub fn with_double(self, key: impl Into<String>, v: impl Into<tag::Double>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::String] into the builder under the provided key.
        pub fn with_string(self, key: impl Into<String>, v: impl Into<tag::String>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::Compound] into the builder under the provided key.
        pub fn with_compound(self, key: impl Into<String>, v: impl Into<tag::Compound>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::List] into the builder under the provided key.
        pub fn with_list(self, key: impl Into<String>, v: impl Into<tag::List>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::ByteArray] into the builder under the provided key.
        pub fn with_byte_array(self, key: impl Into<String>, v: impl Into<tag::ByteArray>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::IntArray] into the builder under the provided key.
        pub fn with_int_array(self, key: impl Into<String>, v: impl Into<tag::IntArray>) -> Self {
            self.with(key, v.into())
        }

        /// Inserts a [tag::LongArray] into the builder under the provided key.
        pub fn with_long_array(self, key: impl Into<String>, v: impl Into<tag::LongArray>) -> Self {
            self.with(key, v.into())
        }
    }

    impl From<Builder> for tag::Compound {
        fn from(value: Builder) -> Self {
            value.build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NbtTag;

    #[test]
    fn list_append_sets_and_enforces_type() {
        let mut list = List::new();
        assert_eq!(list.element_type_id(), 0);
        list.append(NbtTag::Byte(Byte(1))).unwrap();
        assert_eq!(list.element_type_id(), 1);
        let err = list.append(NbtTag::Short(Short(1))).unwrap_err();
        assert!(matches!(
            err,
            NbtError::TagMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn list_type_survives_pop_to_empty() {
        let mut list = List::new();
        list.append(NbtTag::Int(Int(5))).unwrap();
        list.pop();
        assert!(list.is_empty());
        assert_eq!(list.element_type_id(), 3);
        assert!(list.append(NbtTag::Short(Short(1))).is_err());
    }

    #[test]
    fn list_clear_resets_type() {
        let mut list = List::new();
        list.append(NbtTag::Int(Int(5))).unwrap();
        list.clear();
        assert_eq!(list.element_type_id(), 0);
        assert!(list.append(NbtTag::Short(Short(1))).is_ok());
    }

    #[test]
    fn numeric_casts_match_native_as() {
        let d = Double(-1.9);
        assert_eq!(d.as_byte(), -1.9f64 as i8);
        assert_eq!(d.as_int(), -1.9f64 as i32);
        assert_eq!(d.as_float(), -1.9f32);
    }

    #[test]
    fn compound_accessors() {
        let compound = Compound::builder()
            .with_byte("a", 1i8)
            .with_string("b", "hi")
            .build();
        assert_eq!(compound.get_byte("a").unwrap().0, 1);
        assert_eq!(compound.get_string("b").unwrap().to_string_lossy(), "hi");
        assert!(compound.get_int("a").is_none());
    }
}
