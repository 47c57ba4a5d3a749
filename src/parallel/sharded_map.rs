use std::collections::BTreeMap;

use parking_lot::Mutex;

mod sealed {
    pub trait Sealed {}
}

/// Keys admitted into a [`ShardedMap`]. Implemented for the signed
/// integer types only; the shard of a key is its unsigned remainder by
/// the bucket count.
pub trait ShardKey: sealed::Sealed + Ord + Copy + Send {
    fn shard_index(self, bucket_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl ShardKey for $ty {
                fn shard_index(self, bucket_count: usize) -> usize {
                    (self as i64 as u64 % bucket_count as u64) as usize
                }
            }
        )*
    };
}

impl_shard_key!(i8, i16, i32, i64, isize);

/// Fixed-width bucketed map with one lock per bucket. Writers on
/// different shards never contend; additions to one key are serialized
/// under its shard lock, so per-key accumulation order is total.
///
/// The map lives inside a single ranking call: producers accumulate,
/// quiesce, and the owner drains it into one ordered map.
pub struct ShardedMap<K: ShardKey, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V: Default> ShardedMap<K, V> {
    /// `bucket_count` must be non-zero.
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "bucket count must be non-zero");
        ShardedMap {
            buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    /// Run `mutate` on the value for `key`, default-initializing it on
    /// first touch. The shard lock is held for the duration of the
    /// closure and no longer.
    pub fn with_value<R>(&self, key: K, mutate: impl FnOnce(&mut V) -> R) -> R {
        let mut bucket = self.buckets[key.shard_index(self.buckets.len())].lock();
        mutate(bucket.entry(key).or_default())
    }

    /// Merge every shard into a single ordered map. Consumes the map,
    /// so all producers have necessarily quiesced.
    pub fn into_sorted_map(self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for bucket in self.buckets {
            result.append(&mut bucket.into_inner());
        }
        result
    }
}
