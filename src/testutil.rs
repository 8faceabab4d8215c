use std::{fmt::Debug, ops::Bound};

use itertools::Itertools;
use rand::{SeedableRng, seq::index};

use crate::{IdSet, KeySet, KeySetRead, KeySetWrite, search::is_strictly_ascending};

/// Spreads sampled `u32` indices across the `u64` space. Any odd constant
/// below 2^32 keeps the mapping injective.
const SPREAD: u64 = 0x9E37_79B9;

pub fn mkidset(ids: impl IntoIterator<Item = u64>) -> IdSet {
    let mut set = IdSet::default();
    for id in ids {
        set.insert_u64(id);
    }
    set
}

pub fn mkkeyset<K: AsRef<[u8]>>(keys: impl IntoIterator<Item = K>) -> KeySet {
    let mut set = KeySet::default();
    for key in keys {
        set.insert(key.as_ref());
    }
    set
}

/// Checks every read operation of `set` against `expected`, which must be
/// sorted and free of duplicates.
#[track_caller]
pub fn test_set_read<S, K>(set: &S, expected: &[K])
where
    S: KeySetRead + Debug,
    K: AsRef<[u8]>,
{
    let expected = expected.iter().map(|k| k.as_ref()).collect_vec();

    assert_eq!(set.len(), expected.len(), "len mismatch for {set:?}");
    assert_eq!(set.is_empty(), expected.is_empty());
    assert_eq!(set.first(), expected.first().copied());
    assert_eq!(set.last(), expected.last().copied());
    assert!(itertools::equal(set.iter(), expected.iter().copied()));

    for (idx, &key) in expected.iter().enumerate() {
        assert!(set.contains(key), "missing key at {idx}");
        assert_eq!(set.locate(key), (idx, true));
        assert_eq!(set.position(key), Some(idx));
        assert_eq!(set.rank(key), idx + 1);
        assert_eq!(set.select(idx), Some(key));

        // a probe just past `key` is only present if the set contains it
        let probe = [key, &[0u8][..]].concat();
        let found = expected.binary_search(&probe.as_slice()).is_ok();
        assert_eq!(set.contains(&probe), found);
    }
    assert_eq!(set.select(expected.len()), None);

    if !expected.is_empty() {
        let (lo, hi) = (expected.len() / 4, expected.len() * 3 / 4);
        let range = (Bound::Included(expected[lo]), Bound::Excluded(expected[hi]));
        assert!(itertools::equal(
            set.range(range),
            expected[lo..hi].iter().copied()
        ));
    }
}

/// Removes and reinserts half of the keys in `set`, checking the results of
/// every write along the way. Leaves the set as it was found.
#[track_caller]
pub fn test_set_write<S>(set: &mut S)
where
    S: KeySetRead + KeySetWrite,
    for<'a> &'a [u8]: TryInto<&'a S::Key>,
{
    let keys = set.iter().map(|k| k.to_vec()).collect_vec();

    for key in &keys {
        assert!(!set.insert(as_key::<S::Key>(key)), "duplicate insert");
    }
    assert_eq!(set.len(), keys.len());

    for key in keys.iter().step_by(2) {
        assert!(set.remove(key));
        assert!(!set.contains(key));
        assert!(!set.remove(key), "removing an absent key");
    }
    assert_eq!(set.len(), keys.len() / 2);
    assert!(is_strictly_ascending(set.iter()));

    for key in keys.iter().step_by(2) {
        assert!(set.insert(as_key::<S::Key>(key)));
    }
    assert!(itertools::equal(set.iter(), keys.iter().map(|k| k.as_slice())));
}

fn as_key<'a, K: ?Sized>(key: &'a [u8]) -> &'a K
where
    &'a [u8]: TryInto<&'a K>,
{
    match key.try_into() {
        Ok(key) => key,
        Err(_) => panic!("key has the wrong width for this set"),
    }
}

pub struct SetGen {
    rng: rand::rngs::StdRng,
}

impl SetGen {
    pub fn new(seed: u64) -> Self {
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self { rng }
    }

    /// Returns `len` sorted, unique ids spread over the whole `u64` range.
    pub fn random_ids(&mut self, len: usize) -> Vec<u64> {
        index::sample(&mut self.rng, u32::MAX as usize, len)
            .into_iter()
            .map(|i| i as u64 * SPREAD)
            .sorted()
            .collect()
    }

    /// Returns `len` sorted, unique keys between 0 and 8 bytes long.
    pub fn random_keys(&mut self, len: usize) -> Vec<Vec<u8>> {
        self.random_ids(len)
            .into_iter()
            .map(|id| {
                let skip = (id.leading_zeros() / 8) as usize;
                id.to_be_bytes()[skip..].to_vec()
            })
            .sorted()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::{SetGen, mkkeyset};
    use crate::KeySetRead;

    #[test]
    fn test_random_keys_are_unique() {
        let mut set_gen = SetGen::new(0xDEAD_BEEF);
        let keys = set_gen.random_keys(2048);
        assert_eq!(keys.iter().dedup().count(), keys.len());
        assert_eq!(mkkeyset(&keys).len(), keys.len());
    }

    #[test]
    fn test_seeded() {
        let a = SetGen::new(42).random_ids(64);
        let b = SetGen::new(42).random_ids(64);
        assert_eq!(a, b);
        assert!(a.iter().tuple_windows().all(|(x, y)| x < y));
    }
}
