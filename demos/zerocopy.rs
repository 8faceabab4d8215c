use keyset_rs::{Encodable, IdSet, IdSetRef, KeySet, KeySetRead, KeySetWrite, testutil::SetGen};

fn main() {
    let mut setgen = SetGen::new(0xDEAD_BEEF);

    // create a set filled with random u64 ids
    let set = IdSet::from_iter(setgen.random_ids(4096));

    // retrieve an id contained by the set for later
    let id = set.iter_u64().nth(9).unwrap();

    // serialize the set to a byte buffer: 8 bytes per id, no header
    let bytes = set.encode_to_bytes();

    println!("Serialized set size: {} bytes", bytes.len());
    println!("First 32 bytes of serialized set:");
    // print out the first 32 bytes of the serialized set in hex
    for byte in bytes.iter().take(32) {
        print!("{byte:02X} ");
    }
    println!();

    // open the serialized set as an IdSetRef (zero-copy)
    // this function accepts any type which implements Deref<Target=[u8]>
    // which means it works with most byte buffer types in Rust
    let set_ref = IdSetRef::from_bytes(bytes.clone()).unwrap();

    // check that the two sets are equivalent
    assert_eq!(set, set_ref);

    // or just run lookups directly on the IdSetRef
    assert!(set_ref.contains_u64(id));

    // truncated buffers are rejected rather than silently shortened
    assert!(IdSetRef::from_bytes(&bytes[..bytes.len() - 3]).is_err());

    // ids can live alongside arbitrary byte keys in a KeySet
    let mut keys = KeySet::from(set_ref.decode_to_set());
    keys.insert(b"user:alice");
    assert!(keys.contains_u64(id));
    assert!(keys.contains(b"user:alice"));

    println!("Success!");
}
