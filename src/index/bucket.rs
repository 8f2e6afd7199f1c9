use std::cmp::Ordering;
use crate::core::error::{Error, Result};
use crate::core::types::StringId;

/// All strings sharing one feature count, with their inverted lists.
///
/// Layout is a flat arena: gram keys are packed into `keys` with a fixed
/// stride of `n + 1` words (units, then occurrence number) in ascending
/// order, list `i` is `postings[offsets[i]..offsets[i + 1]]`, and the bucket's
/// strings are kept in `strings`, parallel to the ascending `ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketIndex {
    gram_count: u32,
    stride: usize,
    keys: Vec<u32>,
    offsets: Vec<u32>,
    postings: Vec<u32>,
    ids: Vec<u32>,
    strings: Vec<String>,
}

impl BucketIndex {
    pub fn from_parts(
        gram_count: u32,
        stride: usize,
        keys: Vec<u32>,
        offsets: Vec<u32>,
        postings: Vec<u32>,
        ids: Vec<u32>,
        strings: Vec<String>,
    ) -> Result<Self> {
        if stride < 2 || keys.len() % stride != 0 {
            return Err(Error::corrupt(format!(
                "bucket {}: key array does not divide into stride {}",
                gram_count, stride
            )));
        }
        let num_grams = keys.len() / stride;
        if offsets.len() != num_grams + 1
            || offsets.first() != Some(&0)
            || offsets.last().map(|&o| o as usize) != Some(postings.len())
            || offsets.windows(2).any(|w| w[0] > w[1])
        {
            return Err(Error::corrupt(format!("bucket {}: bad list offsets", gram_count)));
        }
        if ids.len() != strings.len() || ids.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::corrupt(format!("bucket {}: bad string table", gram_count)));
        }

        let bucket = BucketIndex { gram_count, stride, keys, offsets, postings, ids, strings };
        if (1..num_grams).any(|i| bucket.key_at(i - 1) >= bucket.key_at(i)) {
            return Err(Error::corrupt(format!("bucket {}: keys out of order", gram_count)));
        }
        Ok(bucket)
    }

    /// Feature count shared by every string of the bucket.
    pub fn gram_count(&self) -> u32 {
        self.gram_count
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn num_grams(&self) -> usize {
        self.keys.len() / self.stride
    }

    pub fn num_strings(&self) -> usize {
        self.ids.len()
    }

    pub fn key_at(&self, index: usize) -> &[u32] {
        &self.keys[index * self.stride..(index + 1) * self.stride]
    }

    pub fn list_at(&self, index: usize) -> &[u32] {
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        &self.postings[start..end]
    }

    /// Inverted list for a flat gram key; empty when the gram is absent.
    pub fn postings(&self, key: &[u32]) -> &[u32] {
        match self.find(key) {
            Some(index) => self.list_at(index),
            None => &[],
        }
    }

    fn find(&self, key: &[u32]) -> Option<usize> {
        if key.len() != self.stride {
            return None;
        }
        let (mut lo, mut hi) = (0, self.num_grams());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.key_at(mid).cmp(key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    pub fn text(&self, id: StringId) -> Option<&str> {
        self.ids
            .binary_search(&id.0)
            .ok()
            .map(|pos| self.strings[pos].as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (StringId, &str)> {
        self.ids
            .iter()
            .zip(self.strings.iter())
            .map(|(&id, text)| (StringId(id), text.as_str()))
    }

    pub fn keys(&self) -> &[u32] {
        &self.keys
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}
