use nbt_codec::budget::Budget;
use nbt_codec::err::NbtError;
use nbt_codec::stream::{ByteReader, ByteWriter};
use nbt_codec::{codec, tag, NbtTag};

#[test]
fn single_named_byte_tag() {
    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &NbtTag::Byte(tag::Byte(42))).unwrap();
    assert_eq!(w.buffer(), &[0x01, 0x00, 0x00]);

    let mut r = ByteReader::new(w.into_buffer());
    let decoded = codec::read_tag(&mut r).unwrap();
    assert_eq!(decoded, NbtTag::Byte(tag::Byte(42)));
}

#[test]
fn minimal_compound_with_one_short() {
    let root = NbtTag::Compound(tag::Compound::builder().with_short("x", 258i16).build());

    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &root).unwrap();
    assert_eq!(
        w.buffer(),
        &[0x0A, 0x00, 0x00, 0x02, 0x00, 0x01, 0x78, 0x01, 0x02, 0x00]
    );

    let mut r = ByteReader::new(w.into_buffer());
    assert_eq!(codec::read_tag(&mut r).unwrap(), root);
}

#[test]
fn empty_list_of_type_int_at_top_level() {
    let mut w = ByteWriter::new();
    w.write_u8(0x09);
    w.write_uint(16, 0);
    w.write_i8(3);
    w.write_i32(0);

    let mut r = ByteReader::new(w.into_buffer());
    let decoded = codec::read_tag(&mut r).unwrap();
    let NbtTag::List(list) = decoded else {
        panic!("expected a list tag");
    };
    assert_eq!(list.element_type_id(), 3);
    assert!(list.is_empty());
}

#[test]
fn float_round_trip_matches_known_bytes() {
    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &NbtTag::Float(tag::Float(1.0))).unwrap();
    let bytes = w.into_buffer();
    assert_eq!(&bytes[3..], &[0x3F, 0x80, 0x00, 0x00]);

    let mut r = ByteReader::new(bytes);
    assert_eq!(
        codec::read_tag(&mut r).unwrap(),
        NbtTag::Float(tag::Float(1.0))
    );
}

#[test]
fn gzip_wrapped_minimum() {
    use std::io::Write;

    let root = NbtTag::Compound(tag::Compound::builder().with_short("x", 258i16).build());
    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &root).unwrap();

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&w.into_buffer()).unwrap();
    let gzipped = encoder.finish().unwrap();
    assert_eq!(gzipped[0], 0x1f);

    let mut r = ByteReader::new(gzipped);
    assert_eq!(codec::read_tag(&mut r).unwrap(), root);
}

#[test]
fn malformed_list_rejection() {
    let mut w = ByteWriter::new();
    w.write(&[0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]);

    let mut r = ByteReader::new(w.into_buffer());
    assert!(matches!(
        codec::read_tag(&mut r),
        Err(NbtError::MissingListType)
    ));
}

#[test]
fn budget_rejects_payload_over_ceiling() {
    let root = NbtTag::Compound(
        tag::Compound::builder()
            .with_long_array("data", vec![0i64; 16])
            .build(),
    );
    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &root).unwrap();

    let mut r = ByteReader::new(w.into_buffer());
    let mut budget = Budget::bounded(8);
    assert!(matches!(
        codec::read_tag_with_budget(&mut r, &mut budget),
        Err(NbtError::TagTooBig)
    ));
}
