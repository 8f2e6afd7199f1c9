use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use crate::analysis::ngram::{NGram, NGramGenerator};
use crate::core::error::{Error, Result};
use crate::core::types::{StringEntry, StringId};
use crate::index::bucket::BucketIndex;
use crate::index::posting::PostingList;

/// Inverted index under construction, bucketed by feature count.
pub struct InvertedIndex {
    generator: NGramGenerator,
    buckets: BTreeMap<u32, BucketBuilder>,
    num_entries: u32,
}

#[derive(Default)]
struct BucketBuilder {
    postings: HashMap<NGram, PostingList>,
    ids: Vec<u32>,
    strings: Vec<String>,
}

impl InvertedIndex {
    pub fn new(generator: NGramGenerator) -> Self {
        InvertedIndex {
            generator,
            buckets: BTreeMap::new(),
            num_entries: 0,
        }
    }

    pub fn generator(&self) -> &NGramGenerator {
        &self.generator
    }

    /// Index one string and return the identifier it was given.
    pub fn add(&mut self, text: &str) -> Result<StringId> {
        if self.num_entries == u32::MAX {
            return Err(Error::invalid_parameter("database is full: 2^32 - 1 strings"));
        }
        let id = StringId(self.num_entries);
        let grams = self.generator.generate(text);
        let gram_count = u32::try_from(grams.len())
            .map_err(|_| Error::invalid_parameter("string too long to index"))?;

        let bucket = self.buckets.entry(gram_count).or_default();
        for gram in grams.iter() {
            bucket.postings
                .entry(gram.clone())
                .or_insert_with(PostingList::new)
                .add(id);
        }
        bucket.ids.push(id.0);
        bucket.strings.push(text.to_string());

        self.num_entries += 1;
        Ok(id)
    }

    pub fn num_entries(&self) -> u32 {
        self.num_entries
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket_keys(&self) -> Vec<u32> {
        self.buckets.keys().copied().collect()
    }

    /// Compact each bucket into its arena form on demand, in ascending key
    /// order. The index itself is left intact.
    pub fn compact_buckets(&self) -> impl Iterator<Item = Result<BucketIndex>> + '_ {
        let stride = self.generator.n() + 1;
        self.buckets
            .iter()
            .map(move |(&gram_count, builder)| builder.compact(gram_count, stride))
    }

    pub fn into_buckets(self) -> Result<Vec<BucketIndex>> {
        self.compact_buckets().collect()
    }

    /// Read-only view over the compacted buckets, without touching disk.
    pub fn freeze(self) -> Result<MemoryIndex> {
        let generator = self.generator;
        let num_entries = self.num_entries;
        let buckets = self
            .into_buckets()?
            .into_iter()
            .map(|bucket| (bucket.gram_count(), Arc::new(bucket)))
            .collect();
        Ok(MemoryIndex { generator, num_entries, buckets })
    }
}

impl BucketBuilder {
    fn compact(&self, gram_count: u32, stride: usize) -> Result<BucketIndex> {
        let mut lists: Vec<(&NGram, &PostingList)> = self.postings.iter().collect();
        lists.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut keys = Vec::with_capacity(lists.len() * stride);
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        let mut postings = Vec::new();
        offsets.push(0u32);
        for (gram, list) in lists {
            gram.write_key(&mut keys);
            postings.extend_from_slice(list.as_slice());
            let end = u32::try_from(postings.len())
                .map_err(|_| Error::invalid_parameter("bucket exceeds 2^32 postings"))?;
            offsets.push(end);
        }

        BucketIndex::from_parts(
            gram_count,
            stride,
            keys,
            offsets,
            postings,
            self.ids.clone(),
            self.strings.clone(),
        )
    }
}

/// Finalized index held in memory.
pub struct MemoryIndex {
    generator: NGramGenerator,
    num_entries: u32,
    buckets: BTreeMap<u32, Arc<BucketIndex>>,
}

impl MemoryIndex {
    pub fn generator(&self) -> &NGramGenerator {
        &self.generator
    }

    pub fn num_entries(&self) -> u32 {
        self.num_entries
    }

    pub fn bucket_keys(&self) -> Vec<u32> {
        self.buckets.keys().copied().collect()
    }

    pub fn bucket(&self, gram_count: u32) -> Option<Arc<BucketIndex>> {
        self.buckets.get(&gram_count).cloned()
    }

    /// Every stored string, in insertion order.
    pub fn entries(&self) -> Vec<StringEntry> {
        let mut all: Vec<StringEntry> = self
            .buckets
            .values()
            .flat_map(|b| b.entries().map(|(id, text)| StringEntry::new(id, text.to_string())))
            .collect();
        all.sort_by_key(|entry| entry.id);
        all
    }
}
