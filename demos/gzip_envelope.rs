//! Demonstrates that `read_tag` transparently inflates a gzip-wrapped stream.
use std::io::Write as _;

use flate2::write::GzEncoder;
use flate2::Compression;
use nbt_codec::stream::{ByteReader, ByteWriter};
use nbt_codec::{codec, tag, NbtTag};

fn main() {
    let root = NbtTag::Compound(tag::Compound::builder().with_long("seed", 42i64).build());

    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &root).unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&w.into_buffer()).unwrap();
    let gzipped = encoder.finish().unwrap();
    println!("gzipped payload is {} bytes", gzipped.len());

    let mut r = ByteReader::new(gzipped);
    let decoded = codec::read_tag(&mut r).unwrap();
    println!("decoded: {decoded:?}");
}
