use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;
use crate::analysis::char_unit::CharMode;

/// Database statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    // Persisted metadata
    pub num_entries: u32,
    pub gram_size: u32,
    pub char_mode: CharMode,
    pub boundary_marks: bool,
    pub database_id: Uuid,
    pub created_at: DateTime<Utc>,

    // Length buckets
    pub num_buckets: usize,
    pub min_gram_count: Option<u32>,
    pub max_gram_count: Option<u32>,

    // Reader side
    pub cache_stats: CacheStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn new(hits: u64, misses: u64, size: usize, capacity: usize) -> Self {
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64) / (total as f64)
        } else {
            0.0
        };
        CacheStats { hits, misses, hit_rate, size, capacity }
    }
}
