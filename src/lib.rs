pub mod core;
pub mod storage;
pub mod analysis;
pub mod index;
pub mod scoring;
pub mod search;
pub mod writer;
pub mod reader;
pub mod mmap;
pub mod compression;

pub use crate::analysis::char_unit::CharMode;
pub use crate::analysis::ngram::{NGram, NGramGenerator, NGramSet};
pub use crate::compression::compress::CompressionType;
pub use crate::core::config::{ReaderConfig, WriterConfig};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::stats::{CacheStats, DatabaseStats};
pub use crate::core::types::{StringEntry, StringId};
pub use crate::index::inverted::{InvertedIndex, MemoryIndex};
pub use crate::reader::database_reader::Reader;
pub use crate::scoring::measure::Measure;
pub use crate::search::executor::{BucketSource, QueryExecutor};
pub use crate::search::pruning::Candidate;
pub use crate::search::results::Match;
pub use crate::writer::database_writer::Writer;

/*
┌──────────────────────────────────────────────────────────────────────────────────┐
│                              SIMGRAM ARCHITECTURE                                │
└──────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── WRITE PATH ───────────────────────────────────────┐
│                                                                                  │
│  Writer::insert(text)                                                            │
│     │                                                                            │
│     ▼                                                                            │
│  NGramGenerator::generate      text -> [Unit] -> padded -> numbered n-grams      │
│     │                                                                            │
│     ▼                                                                            │
│  InvertedIndex::add            bucket = feature count b                          │
│     │                          (b, gram) -> PostingList of StringId              │
│     ▼                                                                            │
│  Writer::close                                                                   │
│     ├── BucketIndex (flat arena: keys stride n+1 | offsets | postings | strings) │
│     ├── BucketWriter  -> buckets/<b>.bkt  [framed header | lz4 block]            │
│     └── DatabaseHeader::save -> header.bin (tmp + rename, written last)          │
│                                                                                  │
└──────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── READ PATH ────────────────────────────────────────┐
│                                                                                  │
│  Reader::open          header.bin -> NGramGenerator + bucket keys                │
│  Reader::retrieve(q)                                                             │
│     │                                                                            │
│     ▼                                                                            │
│  QueryExecutor                                                                   │
│     ├── a = |features(q)|                                                        │
│     ├── Measure::candidate_size_range(a, τ)  -> buckets b worth opening          │
│     ├── BucketCache::get(b)    mmap + crc + decode, LRU of Arc<BucketIndex>      │
│     ├── Measure::min_overlap(a, b, τ) = t                                        │
│     ├── prune_bucket           k-t+1 shortest lists merged, rest probed          │
│     └── verify                 Measure::score(|X ∩ Y|, a, b) >= τ                │
│                                                                                  │
└──────────────────────────────────────────────────────────────────────────────────┘
*/
