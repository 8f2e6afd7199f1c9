use std::path::Path;
use std::sync::Arc;
use tracing::info;
use crate::analysis::ngram::NGramGenerator;
use crate::core::config::ReaderConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::DatabaseStats;
use crate::index::bucket::BucketIndex;
use crate::reader::bucket_cache::BucketCache;
use crate::scoring::measure::{validate_threshold, Measure};
use crate::search::executor::{BucketSource, QueryExecutor};
use crate::search::pruning::Candidate;
use crate::search::results::{sort_by_rank, Match};
use crate::storage::header::DatabaseHeader;
use crate::storage::layout::StorageLayout;

/// Read-only handle on a finalized database.
///
/// Measure and threshold belong to the handle and apply to the calls made
/// after they are set. Every query method fails with `ClosedResource` once
/// the handle is closed.
pub struct Reader {
    measure: Option<Measure>,
    threshold: f64,
    state: Option<OpenDatabase>,
}

struct OpenDatabase {
    header: DatabaseHeader,
    generator: NGramGenerator,
    buckets: BucketCache,
}

impl Reader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        let layout = StorageLayout::new(path);
        let header = DatabaseHeader::load(&layout)?;

        if let Some(expected) = config.expected_mode {
            if expected != header.char_mode {
                return Err(Error::new(
                    ErrorKind::ModeMismatch,
                    format!(
                        "database was written in {} mode, reader expects {}",
                        header.char_mode.name(),
                        expected.name()
                    ),
                ));
            }
        }

        let generator = NGramGenerator::new(header.gram_size as usize, header.boundary_marks, header.char_mode)
            .map_err(|e| Error::corrupt(e.context))?;
        let buckets = BucketCache::new(layout.clone(), header.database_id, generator.n() + 1, config.cache_capacity)?;

        info!(
            path = %layout.base_dir.display(),
            entries = header.num_entries,
            buckets = header.bucket_keys.len(),
            gram_size = header.gram_size,
            mode = header.char_mode.name(),
            "opened database"
        );

        Ok(Reader {
            measure: config.measure,
            threshold: config.threshold,
            state: Some(OpenDatabase { header, generator, buckets }),
        })
    }

    pub fn measure(&self) -> Option<Measure> {
        self.measure
    }

    pub fn set_measure(&mut self, measure: Measure) {
        self.measure = Some(measure);
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rejects values outside `(0, 1]` and keeps the previous threshold.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.threshold = validate_threshold(threshold)?;
        Ok(())
    }

    /// Stored strings similar to `query`, in insertion order.
    pub fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        let matches = self.executor()?.execute(self.open_state()?, query)?;
        Ok(matches.into_iter().map(|m| m.text).collect())
    }

    /// Matches with their scores, best first.
    pub fn retrieve_scored(&self, query: &str) -> Result<Vec<Match>> {
        let mut matches = self.executor()?.execute(self.open_state()?, query)?;
        sort_by_rank(&mut matches);
        Ok(matches)
    }

    /// True as soon as one stored string is similar to `query`.
    pub fn check(&self, query: &str) -> Result<bool> {
        self.executor()?.exists(self.open_state()?, query)
    }

    /// Strings surviving the pruning stage for `query`, before verification.
    pub fn candidates(&self, query: &str) -> Result<Vec<Candidate>> {
        self.executor()?.candidates(self.open_state()?, query)
    }

    pub fn stats(&self) -> Result<DatabaseStats> {
        let state = self.open_state()?;
        let header = &state.header;
        Ok(DatabaseStats {
            num_entries: header.num_entries,
            gram_size: header.gram_size,
            char_mode: header.char_mode,
            boundary_marks: header.boundary_marks,
            database_id: header.database_id,
            created_at: header.created_at,
            num_buckets: header.bucket_keys.len(),
            min_gram_count: header.bucket_keys.first().copied(),
            max_gram_count: Some(header.max_gram_count).filter(|&m| m > 0),
            cache_stats: state.buckets.cache_stats(),
        })
    }

    pub fn num_entries(&self) -> Result<u32> {
        Ok(self.open_state()?.header.num_entries)
    }

    pub fn generator(&self) -> Result<&NGramGenerator> {
        Ok(&self.open_state()?.generator)
    }

    /// Drop cached buckets and mappings. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            state.buckets.clear();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_none()
    }

    fn open_state(&self) -> Result<&OpenDatabase> {
        self.state.as_ref().ok_or_else(|| Error::closed("reader is closed"))
    }

    fn executor(&self) -> Result<QueryExecutor> {
        self.open_state()?;
        let measure = self
            .measure
            .ok_or_else(|| Error::invalid_parameter("similarity measure is not set"))?;
        QueryExecutor::new(measure, self.threshold)
    }
}

impl BucketSource for OpenDatabase {
    fn generator(&self) -> &NGramGenerator {
        &self.generator
    }

    fn bucket_keys(&self) -> Vec<u32> {
        self.header.bucket_keys.clone()
    }

    fn bucket(&self, gram_count: u32) -> Result<Option<Arc<BucketIndex>>> {
        if self.header.bucket_keys.binary_search(&gram_count).is_err() {
            return Ok(None);
        }
        self.buckets.get(gram_count).map(Some)
    }
}
