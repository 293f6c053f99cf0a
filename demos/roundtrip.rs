//! Builds a small compound, writes it, reads it back, and prints the result.
use nbt_codec::stream::{ByteReader, ByteWriter};
use nbt_codec::{codec, tag, NbtTag};

fn main() {
    let player = tag::Compound::builder()
        .with_string("name", "steve")
        .with_int("health", 20)
        .with_list(
            "inventory",
            vec![
                tag::Compound::builder().with_string("item", "pickaxe").build(),
                tag::Compound::builder().with_string("item", "torch").build(),
            ]
            .into_iter()
            .map(NbtTag::Compound)
            .collect::<Vec<_>>(),
        )
        .build();

    let mut w = ByteWriter::new();
    codec::write_tag(&mut w, &NbtTag::Compound(player)).unwrap();
    let bytes = w.into_buffer();
    println!("encoded {} bytes", bytes.len());

    let mut r = ByteReader::new(bytes);
    let decoded = codec::read_tag_compound(&mut r).unwrap();
    println!(
        "name={:?} health={:?} items={}",
        decoded.get_string("name").unwrap().to_string_lossy(),
        decoded.get_int("health").unwrap().0,
        decoded.get_list("inventory").unwrap().len(),
    );
}
