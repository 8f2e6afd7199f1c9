use std::sync::Arc;
use tracing::debug;
use crate::analysis::ngram::{NGram, NGramGenerator, NGramSet};
use crate::core::error::{Error, Result};
use crate::index::bucket::BucketIndex;
use crate::index::inverted::MemoryIndex;
use crate::scoring::measure::{meets_threshold, validate_threshold, Measure};
use crate::search::pruning::{prune_bucket, Candidate};
use crate::search::results::{sort_by_id, Match};

/// Anything that can hand out finalized length buckets.
pub trait BucketSource {
    fn generator(&self) -> &NGramGenerator;

    /// Populated bucket keys, ascending.
    fn bucket_keys(&self) -> Vec<u32>;

    fn bucket(&self, gram_count: u32) -> Result<Option<Arc<BucketIndex>>>;
}

impl BucketSource for MemoryIndex {
    fn generator(&self) -> &NGramGenerator {
        MemoryIndex::generator(self)
    }

    fn bucket_keys(&self) -> Vec<u32> {
        MemoryIndex::bucket_keys(self)
    }

    fn bucket(&self, gram_count: u32) -> Result<Option<Arc<BucketIndex>>> {
        Ok(MemoryIndex::bucket(self, gram_count))
    }
}

/// Runs similarity queries for one measure and threshold.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor {
    measure: Measure,
    threshold: f64,
}

struct Query {
    features: NGramSet,
    keys: Vec<Vec<u32>>,
}

impl QueryExecutor {
    pub fn new(measure: Measure, threshold: f64) -> Result<Self> {
        let threshold = validate_threshold(threshold)?;
        Ok(QueryExecutor { measure, threshold })
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Every stored string meeting the threshold, in ascending id order.
    pub fn execute<S: BucketSource + ?Sized>(&self, source: &S, query: &str) -> Result<Vec<Match>> {
        let mut matches = self.run(source, query, false)?;
        sort_by_id(&mut matches);
        Ok(matches)
    }

    /// Whether any stored string meets the threshold. Stops at the first one.
    pub fn exists<S: BucketSource + ?Sized>(&self, source: &S, query: &str) -> Result<bool> {
        Ok(!self.run(source, query, true)?.is_empty())
    }

    /// Output of the pruning stage alone, before scores are checked.
    pub fn candidates<S: BucketSource + ?Sized>(&self, source: &S, query: &str) -> Result<Vec<Candidate>> {
        let query = Self::prepare(source.generator(), query);
        let mut candidates = Vec::new();
        for gram_count in self.selected_buckets(source, query.features.len()) {
            if let Some(bucket) = source.bucket(gram_count)? {
                candidates.extend(self.prune(&bucket, &query));
            }
        }
        Ok(candidates)
    }

    fn run<S: BucketSource + ?Sized>(&self, source: &S, query: &str, first_only: bool) -> Result<Vec<Match>> {
        let generator = source.generator();
        let query = Self::prepare(generator, query);
        let a = query.features.len();

        let mut matches = Vec::new();
        let (mut buckets, mut candidates) = (0usize, 0usize);
        for gram_count in self.selected_buckets(source, a) {
            let Some(bucket) = source.bucket(gram_count)? else {
                continue;
            };
            buckets += 1;

            let survivors = self.prune(&bucket, &query);
            candidates += survivors.len();
            for candidate in survivors {
                let text = bucket.text(candidate.id).ok_or_else(|| {
                    Error::corrupt(format!(
                        "bucket {}: string {} listed but not stored",
                        gram_count, candidate.id.0
                    ))
                })?;
                let shared = generator.generate(text).intersection_size(&query.features);
                let score = self.measure.score(shared, a, gram_count as usize);
                if meets_threshold(score, self.threshold) {
                    matches.push(Match::new(candidate.id, text, score));
                    if first_only {
                        break;
                    }
                }
            }
            if first_only && !matches.is_empty() {
                break;
            }
        }

        debug!(
            measure = %self.measure,
            threshold = self.threshold,
            query_grams = a,
            buckets,
            candidates,
            matches = matches.len(),
            "retrieval finished"
        );
        Ok(matches)
    }

    fn prepare(generator: &NGramGenerator, query: &str) -> Query {
        let features = generator.generate(query);
        let keys = features.iter().map(NGram::key).collect();
        Query { features, keys }
    }

    /// Populated buckets whose feature count can reach the threshold.
    fn selected_buckets<S: BucketSource + ?Sized>(&self, source: &S, a: usize) -> Vec<u32> {
        let range = self.measure.candidate_size_range(a, self.threshold);
        source
            .bucket_keys()
            .into_iter()
            .filter(|&b| range.contains(&(b as usize)))
            .collect()
    }

    fn prune(&self, bucket: &BucketIndex, query: &Query) -> Vec<Candidate> {
        let a = query.features.len();
        let b = bucket.gram_count() as usize;
        let min_overlap = self.measure.min_overlap(a, b, self.threshold);
        prune_bucket(bucket, &query.keys, min_overlap)
    }
}
