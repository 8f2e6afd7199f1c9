use std::cmp::Reverse;
use std::collections::BinaryHeap;
use crate::core::types::StringId;
use crate::index::bucket::BucketIndex;

/// A string that survived pruning, pending exact verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: StringId,
    pub gram_count: u32,   // Bucket the string lives in
    pub overlap: usize,    // Query features found in the string's lists
}

/// Strings of `bucket` sharing at least `min_overlap` of the query features.
///
/// With `k` query features, the `k - min_overlap + 1` shortest lists are
/// merged; a string absent from all of them shares at most
/// `min_overlap - 1` features. Every merged string is then probed against
/// the remaining lists and dropped once it can no longer get there.
pub fn prune_bucket(bucket: &BucketIndex, query_keys: &[Vec<u32>], min_overlap: usize) -> Vec<Candidate> {
    let k = query_keys.len();
    if min_overlap == 0 || min_overlap > k {
        return Vec::new();
    }

    let mut lists: Vec<&[u32]> = query_keys.iter().map(|key| bucket.postings(key)).collect();
    lists.sort_by_key(|list| list.len());
    let (pivots, rest) = lists.split_at(k - min_overlap + 1);

    let mut candidates = Vec::new();
    'merged: for (id, mut count) in merge_counts(pivots) {
        for (j, list) in rest.iter().enumerate() {
            if count + (rest.len() - j) < min_overlap {
                continue 'merged;
            }
            if list.binary_search(&id).is_ok() {
                count += 1;
            }
        }
        if count >= min_overlap {
            candidates.push(Candidate {
                id: StringId(id),
                gram_count: bucket.gram_count(),
                overlap: count,
            });
        }
    }
    candidates
}

/// K-way merge of ascending id lists. Each id is reported once, in ascending
/// order, with the number of lists holding it.
pub fn merge_counts(lists: &[&[u32]]) -> Vec<(u32, usize)> {
    let mut heap = BinaryHeap::with_capacity(lists.len());
    for (i, list) in lists.iter().enumerate() {
        if let Some(&first) = list.first() {
            heap.push(Reverse((first, i, 0usize)));
        }
    }

    let mut merged: Vec<(u32, usize)> = Vec::new();
    while let Some(Reverse((id, i, pos))) = heap.pop() {
        match merged.last_mut() {
            Some((last, count)) if *last == id => *count += 1,
            _ => merged.push((id, 1)),
        }
        if let Some(&next) = lists[i].get(pos + 1) {
            heap.push(Reverse((next, i, pos + 1)));
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::char_unit::CharMode;
    use crate::analysis::ngram::{NGram, NGramGenerator};
    use crate::index::inverted::InvertedIndex;

    #[test]
    fn test_merge_counts() {
        let a: &[u32] = &[1, 4, 9];
        let b: &[u32] = &[4, 5];
        let c: &[u32] = &[];
        let d: &[u32] = &[1, 4];
        assert_eq!(merge_counts(&[a, b, c, d]), vec![(1, 2), (4, 3), (5, 1), (9, 1)]);
        assert!(merge_counts(&[]).is_empty());
    }

    #[test]
    fn test_pruning_keeps_exactly_the_strings_with_enough_overlap() {
        let generator = NGramGenerator::new(2, false, CharMode::Byte).unwrap();
        let words = ["abcd", "abce", "abxy", "zzzz", "bcde", "abab", "cdab"];
        let mut index = InvertedIndex::new(generator);
        for word in words {
            index.add(word).unwrap();
        }
        let frozen = index.freeze().unwrap();
        let bucket = frozen.bucket(3).unwrap();

        let query = generator.generate("abcd");
        let keys: Vec<Vec<u32>> = query.iter().map(NGram::key).collect();
        for min_overlap in 1..=3 {
            let mut found: Vec<u32> = prune_bucket(&bucket, &keys, min_overlap)
                .into_iter()
                .map(|c| {
                    assert!(c.overlap >= min_overlap);
                    c.id.0
                })
                .collect();
            found.sort_unstable();
            let expected: Vec<u32> = words
                .iter()
                .enumerate()
                .filter(|(_, w)| generator.generate(w).intersection_size(&query) >= min_overlap)
                .map(|(i, _)| i as u32)
                .collect();
            assert_eq!(found, expected, "min_overlap={}", min_overlap);
        }
    }

    #[test]
    fn test_unreachable_overlap_yields_nothing() {
        let generator = NGramGenerator::new(2, false, CharMode::Byte).unwrap();
        let mut index = InvertedIndex::new(generator);
        index.add("abc").unwrap();
        let bucket = index.freeze().unwrap().bucket(2).unwrap();
        let keys: Vec<Vec<u32>> = generator.generate("abc").iter().map(NGram::key).collect();
        assert!(prune_bucket(&bucket, &keys, 3).is_empty());
        assert_eq!(prune_bucket(&bucket, &keys, 2).len(), 1);
    }
}
