//! Per-tag wire encoding and the top-level read/write envelope.
use std::io::Read;

use flate2::read::GzDecoder;
use indexmap::IndexMap;

use crate::budget::{check_depth, Budget};
use crate::err::{NbtError, Result};
use crate::stream::{ByteOrder, ByteReader, ByteWriter};
use crate::{tag, NbtTag};

/// Magic byte that opens a gzip member; seen as the first byte of a gzip-wrapped
/// NBT stream.
const GZIP_MAGIC: u8 = 0x1f;

/// Ceiling on inflated gzip output when no explicit [`Budget`] bounds it.
const DEFAULT_GZIP_CEILING: u64 = 512 * 1024 * 1024;

/// A trait implemented on every tag payload type, reading/writing just the
/// payload — not the leading type id or name that containers are responsible for.
trait TagIo: Sized {
    fn read_payload(r: &mut ByteReader, depth: u32, budget: &mut Budget) -> Result<Self>;
    fn write_payload(&self, w: &mut ByteWriter) -> Result<()>;
}

impl TagIo for tag::Byte {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(72)?;
        Ok(tag::Byte(r.read_i8()?))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i8(self.0);
        Ok(())
    }
}

impl TagIo for tag::Short {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(80)?;
        Ok(tag::Short(r.read_i16()?))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i16(self.0);
        Ok(())
    }
}

impl TagIo for tag::Int {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(96)?;
        Ok(tag::Int(r.read_i32()?))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i32(self.0);
        Ok(())
    }
}

impl TagIo for tag::Long {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(128)?;
        Ok(tag::Long(r.read_i64()?))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i64(self.0);
        Ok(())
    }
}

impl TagIo for tag::Float {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(96)?;
        Ok(tag::Float(r.read_f32()?))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_f32(self.0);
        Ok(())
    }
}

impl TagIo for tag::Double {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(128)?;
        Ok(tag::Double(r.read_f64()?))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_f64(self.0);
        Ok(())
    }
}

/// Reads an `i32`-prefixed length, rejecting negative lengths as a malformed source
/// instead of silently wrapping to a huge allocation request.
fn read_seq_len(r: &mut ByteReader) -> Result<usize> {
    let len = r.read_i32()?;
    usize::try_from(len).map_err(|_| NbtError::ShortRead)
}

impl TagIo for tag::ByteArray {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(192)?;
        let len = read_seq_len(r)?;
        budget.charge(8 * len as u64)?;
        let mut out = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            out.push(r.read_i8()?);
        }
        Ok(tag::ByteArray(out))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i32(self.0.len() as i32);
        for &b in &self.0 {
            w.write_i8(b);
        }
        Ok(())
    }
}

impl TagIo for tag::IntArray {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(192)?;
        let len = read_seq_len(r)?;
        budget.charge(32 * len as u64)?;
        let mut out = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            out.push(r.read_i32()?);
        }
        Ok(tag::IntArray(out))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i32(self.0.len() as i32);
        for &v in &self.0 {
            w.write_i32(v);
        }
        Ok(())
    }
}

impl TagIo for tag::LongArray {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(192)?;
        let len = read_seq_len(r)?;
        budget.charge(64 * len as u64)?;
        let mut out = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            out.push(r.read_i64()?);
        }
        Ok(tag::LongArray(out))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i32(self.0.len() as i32);
        for &v in &self.0 {
            w.write_i64(v);
        }
        Ok(())
    }
}

/// Reads a `u16`-length-prefixed UTF-8 string payload, charging the fixed overhead
/// against the budget before the length is known to be trustworthy, then the
/// per-byte charge once it is.
fn read_string_payload(r: &mut ByteReader, budget: &mut Budget) -> Result<tag::String> {
    budget.charge(288)?;
    let len = r.read_uint(16)? as usize;
    budget.charge(16 * len as u64)?;
    let bytes = r.read(len)?.to_vec();
    match std::string::String::from_utf8(bytes) {
        Ok(s) => Ok(tag::String::Utf8(s)),
        Err(e) => Ok(tag::String::Bytes(e.into_bytes())),
    }
}

fn write_string_payload(w: &mut ByteWriter, s: &tag::String) -> Result<()> {
    let bytes: &[u8] = match s {
        tag::String::Utf8(s) => s.as_bytes(),
        tag::String::Bytes(b) => b,
    };
    if bytes.len() > u16::MAX as usize {
        return Err(NbtError::StringTooLong(bytes.len()));
    }
    w.write_uint(16, bytes.len() as u64);
    w.write(bytes);
    Ok(())
}

impl TagIo for tag::String {
    fn read_payload(r: &mut ByteReader, _depth: u32, budget: &mut Budget) -> Result<Self> {
        read_string_payload(r, budget)
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        write_string_payload(w, self)
    }
}

impl TagIo for tag::List {
    fn read_payload(r: &mut ByteReader, depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(296)?;
        check_depth(depth)?;
        let element_type = r.read_u8()?;
        let len = read_seq_len(r)?;
        if element_type == 0 && len > 0 {
            return Err(NbtError::MissingListType);
        }
        if element_type != 0 && !(1..=12).contains(&element_type) {
            return Err(NbtError::InvalidTagId(element_type));
        }
        budget.charge(32 * len as u64)?;
        let mut elements = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            elements.push(NbtTag::read_payload(element_type, r, depth + 1, budget)?);
        }
        Ok(tag::List::from_parts(elements, element_type))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        let element_type = self.element_type_id();
        w.write_i8(element_type as i8);
        w.write_i32(self.len() as i32);
        for tag in self.iter() {
            if tag.id() != element_type {
                return Err(NbtError::TagMismatch {
                    expected: element_type,
                    found: tag.id(),
                });
            }
            tag.write_payload(w)?;
        }
        Ok(())
    }
}

impl TagIo for tag::Compound {
    fn read_payload(r: &mut ByteReader, depth: u32, budget: &mut Budget) -> Result<Self> {
        budget.charge(384)?;
        check_depth(depth)?;
        let mut map = IndexMap::new();
        loop {
            let id = r.read_u8()?;
            if id == 0 {
                break;
            }
            if !(1..=12).contains(&id) {
                return Err(NbtError::InvalidTagId(id));
            }
            let name = read_string_payload(r, budget)?.to_string_lossy().into_owned();
            let value = NbtTag::read_payload(id, r, depth + 1, budget)?;
            budget.charge(288)?;
            map.insert(name, value);
        }
        Ok(tag::Compound(map))
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        for (name, tag) in self.0.iter() {
            w.write_u8(tag.id());
            write_string_payload(w, &tag::String::Utf8(name.clone()))?;
            tag.write_payload(w)?;
        }
        w.write_u8(0);
        Ok(())
    }
}

impl NbtTag {
    fn read_payload(id: u8, r: &mut ByteReader, depth: u32, budget: &mut Budget) -> Result<Self> {
        match id {
            1 => Ok(NbtTag::Byte(tag::Byte::read_payload(r, depth, budget)?)),
            2 => Ok(NbtTag::Short(tag::Short::read_payload(r, depth, budget)?)),
            3 => Ok(NbtTag::Int(tag::Int::read_payload(r, depth, budget)?)),
            4 => Ok(NbtTag::Long(tag::Long::read_payload(r, depth, budget)?)),
            5 => Ok(NbtTag::Float(tag::Float::read_payload(r, depth, budget)?)),
            6 => Ok(NbtTag::Double(tag::Double::read_payload(r, depth, budget)?)),
            7 => Ok(NbtTag::ByteArray(tag::ByteArray::read_payload(
                r, depth, budget,
            )?)),
            8 => Ok(NbtTag::String(tag::String::read_payload(r, depth, budget)?)),
            9 => Ok(NbtTag::List(tag::List::read_payload(r, depth, budget)?)),
            10 => Ok(NbtTag::Compound(tag::Compound::read_payload(
                r, depth, budget,
            )?)),
            11 => Ok(NbtTag::IntArray(tag::IntArray::read_payload(
                r, depth, budget,
            )?)),
            12 => Ok(NbtTag::LongArray(tag::LongArray::read_payload(
                r, depth, budget,
            )?)),
            other => Err(NbtError::InvalidTagId(other)),
        }
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        match self {
            NbtTag::Byte(v) => v.write_payload(w),
            NbtTag::Short(v) => v.write_payload(w),
            NbtTag::Int(v) => v.write_payload(w),
            NbtTag::Long(v) => v.write_payload(w),
            NbtTag::Float(v) => v.write_payload(w),
            NbtTag::Double(v) => v.write_payload(w),
            NbtTag::String(v) => v.write_payload(w),
            NbtTag::Compound(v) => v.write_payload(w),
            NbtTag::List(v) => v.write_payload(w),
            NbtTag::ByteArray(v) => v.write_payload(w),
            NbtTag::IntArray(v) => v.write_payload(w),
            NbtTag::LongArray(v) => v.write_payload(w),
        }
    }
}

/// Writes `root` as a complete top-level NBT tag: id byte, empty root name, payload.
/// Forces big-endian regardless of `w`'s current order, restoring it afterward.
pub fn write_tag(w: &mut ByteWriter, root: &NbtTag) -> Result<()> {
    let saved = w.order();
    w.set_order(ByteOrder::Big);
    w.write_u8(root.id());
    w.write_uint(16, 0);
    let result = root.write_payload(w);
    w.set_order(saved);
    result
}

/// Reads a complete top-level NBT tag, transparently inflating a gzip envelope if
/// present. Equivalent to `read_tag_with_budget(r, &mut Budget::unbounded())`.
pub fn read_tag(r: &mut ByteReader) -> Result<NbtTag> {
    read_tag_with_budget(r, &mut Budget::unbounded())
}

/// As [`read_tag`], charging reads against an explicit [`Budget`] instead of an
/// unbounded one.
pub fn read_tag_with_budget(r: &mut ByteReader, budget: &mut Budget) -> Result<NbtTag> {
    let saved = r.order();
    r.set_order(ByteOrder::Big);
    let result = read_tag_inner(r, budget);
    r.set_order(saved);
    result
}

fn read_tag_inner(r: &mut ByteReader, budget: &mut Budget) -> Result<NbtTag> {
    if let Some(mut inflated) = maybe_inflate(r, budget)? {
        return read_tag_with_budget(&mut inflated, budget);
    }
    let id = r.read_u8()?;
    if !(1..=12).contains(&id) {
        return Err(NbtError::InvalidTagId(id));
    }
    let name_len = r.read_uint(16)? as usize;
    if !r.seek_cur(name_len as i64) {
        return Err(NbtError::ShortRead);
    }
    NbtTag::read_payload(id, r, 0, budget)
}

/// Reads a complete top-level NBT tag whose root must be a [`tag::Compound`],
/// transparently inflating a gzip envelope if present.
pub fn read_tag_compound(r: &mut ByteReader) -> Result<tag::Compound> {
    read_tag_compound_with_budget(r, &mut Budget::unbounded())
}

/// As [`read_tag_compound`], charging reads against an explicit [`Budget`].
pub fn read_tag_compound_with_budget(
    r: &mut ByteReader,
    budget: &mut Budget,
) -> Result<tag::Compound> {
    let saved = r.order();
    r.set_order(ByteOrder::Big);
    let result = read_tag_compound_inner(r, budget);
    r.set_order(saved);
    result
}

fn read_tag_compound_inner(r: &mut ByteReader, budget: &mut Budget) -> Result<tag::Compound> {
    if let Some(mut inflated) = maybe_inflate(r, budget)? {
        return read_tag_compound_with_budget(&mut inflated, budget);
    }
    let id = r.read_u8()?;
    if id != 10 {
        return Err(NbtError::NotACompound(id));
    }
    let name_len = r.read_uint(16)? as usize;
    if !r.seek_cur(name_len as i64) {
        return Err(NbtError::ShortRead);
    }
    tag::Compound::read_payload(r, 0, budget)
}

/// If `r`'s next byte is the gzip magic, rewinds, inflates the remainder of the
/// stream (bounded by `budget`'s ceiling, or [`DEFAULT_GZIP_CEILING`] if
/// unbounded), and returns a fresh reader over the inflated bytes. Otherwise
/// leaves `r` untouched and returns `None`.
fn maybe_inflate(r: &mut ByteReader, budget: &Budget) -> Result<Option<ByteReader>> {
    let mark = r.position();
    let head = r.read_u8()?;
    if head != GZIP_MAGIC {
        r.seek_beg(mark);
        return Ok(None);
    }
    r.seek_beg(mark);

    let remaining = r.read(r.remaining())?;
    let ceiling = budget.ceiling().unwrap_or(DEFAULT_GZIP_CEILING);
    let mut decoder = GzDecoder::new(remaining).take(ceiling);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|_| NbtError::BadCompression)?;

    Ok(Some(ByteReader::new(inflated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(root: NbtTag) -> NbtTag {
        let mut w = ByteWriter::new();
        write_tag(&mut w, &root).unwrap();
        let mut r = ByteReader::new(w.into_buffer());
        read_tag(&mut r).unwrap()
    }

    #[test]
    fn single_byte_tag_roundtrips() {
        let root = NbtTag::Byte(tag::Byte(5));
        assert_eq!(roundtrip(root.clone()), root);
    }

    #[test]
    fn minimal_compound_roundtrips() {
        let root = NbtTag::Compound(
            tag::Compound::builder().with_short("shortTest", 32767i16).build(),
        );
        assert_eq!(roundtrip(root.clone()), root);
    }

    #[test]
    fn empty_list_of_int_roundtrips() {
        let mut list = tag::List::new();
        list.append(NbtTag::Int(tag::Int(1))).unwrap();
        list.pop();
        let root = NbtTag::Compound(tag::Compound::builder().with_list("list", list).build());
        let decoded = roundtrip(root);
        let NbtTag::Compound(c) = decoded else {
            panic!("expected compound")
        };
        assert_eq!(c.get_list("list").unwrap().element_type_id(), 3);
        assert!(c.get_list("list").unwrap().is_empty());
    }

    #[test]
    fn float_one_encodes_to_known_bytes() {
        let mut w = ByteWriter::new();
        write_tag(&mut w, &NbtTag::Float(tag::Float(1.0))).unwrap();
        let buf = w.into_buffer();
        assert_eq!(&buf[..3], &[5, 0, 0]);
        assert_eq!(&buf[3..], &[0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn gzip_wrapped_tag_inflates_transparently() {
        use std::io::Write as _;
        let mut w = ByteWriter::new();
        write_tag(&mut w, &NbtTag::Byte(tag::Byte(7))).unwrap();
        let plain = w.into_buffer();

        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&plain).unwrap();
        let gzipped = encoder.finish().unwrap();

        let mut r = ByteReader::new(gzipped);
        assert_eq!(read_tag(&mut r).unwrap(), NbtTag::Byte(tag::Byte(7)));
    }

    #[test]
    fn malformed_list_missing_type_is_rejected() {
        let mut w = ByteWriter::new();
        w.write_u8(9);
        w.write_uint(16, 0);
        w.write_i8(0);
        w.write_i32(3);
        let mut r = ByteReader::new(w.into_buffer());
        assert!(matches!(
            read_tag(&mut r),
            Err(NbtError::MissingListType)
        ));
    }

    #[test]
    fn read_tag_compound_rejects_non_compound_root() {
        let mut w = ByteWriter::new();
        write_tag(&mut w, &NbtTag::Int(tag::Int(1))).unwrap();
        let mut r = ByteReader::new(w.into_buffer());
        assert!(matches!(
            read_tag_compound(&mut r),
            Err(NbtError::NotACompound(3))
        ));
    }

    #[test]
    fn oversized_payload_is_rejected_by_budget() {
        let root = NbtTag::Compound(
            tag::Compound::builder()
                .with_int_array("data", vec![0i32; 100])
                .build(),
        );
        let mut w = ByteWriter::new();
        write_tag(&mut w, &root).unwrap();
        let mut r = ByteReader::new(w.into_buffer());
        let mut budget = Budget::bounded(10);
        assert!(matches!(
            read_tag_with_budget(&mut r, &mut budget),
            Err(NbtError::TagTooBig)
        ));
    }

    #[test]
    fn depth_exceeding_512_is_rejected() {
        let mut w = ByteWriter::new();
        w.write_u8(10);
        w.write_uint(16, 0);
        for _ in 0..=512 {
            w.write_u8(10);
            write_string_payload(&mut w, &tag::String::Utf8("c".into())).unwrap();
        }
        for _ in 0..=512 {
            w.write_u8(0);
        }
        let mut r = ByteReader::new(w.into_buffer());
        assert!(matches!(read_tag(&mut r), Err(NbtError::DepthExceeded)));
    }

    #[test]
    fn nested_tree_gzip_roundtrip() {
        let inner = tag::Compound::builder().with_int("x", 1i32).build();
        let list: tag::List = vec![
            NbtTag::Compound(inner.clone()),
            NbtTag::Compound(inner),
        ]
        .into();
        let root =
            NbtTag::Compound(tag::Compound::builder().with_list("entries", list).build());

        use std::io::Write as _;
        let mut w = ByteWriter::new();
        write_tag(&mut w, &root).unwrap();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(&w.into_buffer()).unwrap();
        let gzipped = encoder.finish().unwrap();

        let mut r = ByteReader::new(gzipped);
        assert_eq!(read_tag(&mut r).unwrap(), root);
    }
}
