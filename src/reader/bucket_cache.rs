use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use lru::LruCache;
use parking_lot::Mutex;
use uuid::Uuid;
use crate::core::error::{Error, Result};
use crate::core::stats::CacheStats;
use crate::index::bucket::BucketIndex;
use crate::storage::bucket_file::read_bucket;
use crate::storage::layout::StorageLayout;

/// Lazy bucket loader with LRU cache
pub struct BucketCache {
    layout: StorageLayout,
    database_id: Uuid,
    stride: usize,
    cache: Mutex<LruCache<u32, Arc<BucketIndex>>>,   // gram count -> decoded bucket
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl BucketCache {
    pub fn new(layout: StorageLayout, database_id: Uuid, stride: usize, capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::invalid_parameter("bucket cache capacity must be at least 1"))?;
        Ok(BucketCache {
            layout,
            database_id,
            stride,
            cache: Mutex::new(LruCache::new(capacity)),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        })
    }

    /// Get a bucket, mapping and decoding its file on a miss.
    pub fn get(&self, gram_count: u32) -> Result<Arc<BucketIndex>> {
        {
            let mut cache = self.cache.lock();
            if let Some(bucket) = cache.get(&gram_count) {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Ok(bucket.clone());
            }
        }

        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        let bucket = Arc::new(read_bucket(&self.layout, gram_count, self.database_id, self.stride)?);

        let mut cache = self.cache.lock();
        cache.put(gram_count, bucket.clone());
        Ok(bucket)
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.lock();
        CacheStats::new(
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
            cache.len(),
            cache.cap().get(),
        )
    }
}
