use std::fs::File;
use std::io::Write;
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::compression::compress::{CompressedBlock, CompressionType};
use crate::compression::delta::DeltaEncoder;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::bucket::BucketIndex;
use crate::mmap::mmap_file::MmapFile;
use crate::storage::header::{frame, unframe};
use crate::storage::layout::StorageLayout;

/// Bucket file header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketFileHeader {
    pub version: u32,        // Format version
    pub gram_count: u32,     // Bucket key
    pub num_strings: u32,
    pub num_grams: u32,
    pub compression: CompressionType,
    pub checksum: u32,       // CRC32 of the block that follows
    pub database_id: Uuid,   // Database this bucket was written for
}

impl BucketFileHeader {
    pub const VERSION: u32 = 1;
}

/// Serialized arena. Posting lists are delta + varint encoded back to back;
/// `list_ends[i]` is the byte offset one past the end of list `i`.
#[derive(Serialize, Deserialize)]
struct BucketBody {
    stride: u32,
    keys: Vec<u32>,
    list_ends: Vec<u32>,
    postings: Vec<u8>,
    ids: Vec<u8>,
    strings: Vec<String>,
}

// [ LEN | BUCKET FILE HEADER | CRC ]
// [ COMPRESSED BLOCK (bincode BucketBody) ]
pub struct BucketWriter<'a> {
    layout: &'a StorageLayout,
    database_id: Uuid,
    compression: CompressionType,
}

impl<'a> BucketWriter<'a> {
    pub fn new(layout: &'a StorageLayout, database_id: Uuid, compression: CompressionType) -> Self {
        BucketWriter { layout, database_id, compression }
    }

    /// Write one bucket, returns the file size in bytes.
    pub fn write(&self, bucket: &BucketIndex) -> Result<u64> {
        let body = encode_body(bucket)?;
        let block = CompressedBlock::compress(&bincode::serialize(&body)?, self.compression);
        let block_data = bincode::serialize(&block)?;

        let mut hasher = Hasher::new();
        hasher.update(&block_data);

        let header = BucketFileHeader {
            version: BucketFileHeader::VERSION,
            gram_count: bucket.gram_count(),
            num_strings: bucket.num_strings() as u32,
            num_grams: bucket.num_grams() as u32,
            compression: self.compression,
            checksum: hasher.finalize(),
            database_id: self.database_id,
        };
        let header_data = frame(&bincode::serialize(&header)?);

        let mut file = File::create(self.layout.bucket_path(bucket.gram_count()))?;
        file.write_all(&header_data)?;
        file.write_all(&block_data)?;
        file.sync_all()?;

        Ok((header_data.len() + block_data.len()) as u64)
    }
}

/// Load a bucket written by `BucketWriter` for the database `database_id`.
pub fn read_bucket(
    layout: &StorageLayout,
    gram_count: u32,
    database_id: Uuid,
    stride: usize,
) -> Result<BucketIndex> {
    let path = layout.bucket_path(gram_count);
    let file = MmapFile::open_read_only(&path).map_err(|e| match e.kind() {
        ErrorKind::Io => Error::corrupt(format!("bucket {}: {}", gram_count, e.context)),
        _ => e,
    })?;

    let what = format!("bucket {}", gram_count);
    let (header_data, block_data) = unframe(file.data(), &what)?;
    let header: BucketFileHeader = bincode::deserialize(header_data)
        .map_err(|e| Error::corrupt(format!("{}: {}", what, e)))?;

    if header.version != BucketFileHeader::VERSION {
        return Err(Error::corrupt(format!("{}: incompatible version {}", what, header.version)));
    }
    if header.database_id != database_id {
        return Err(Error::corrupt(format!("{}: belongs to another database", what)));
    }
    if header.gram_count != gram_count {
        return Err(Error::corrupt(format!("{}: file holds bucket {}", what, header.gram_count)));
    }
    if crc32fast::hash(block_data) != header.checksum {
        return Err(Error::corrupt(format!("{}: checksum mismatch", what)));
    }

    let block: CompressedBlock = bincode::deserialize(block_data)
        .map_err(|e| Error::corrupt(format!("{}: {}", what, e)))?;
    if block.compression != header.compression {
        return Err(Error::corrupt(format!("{}: compression mismatch", what)));
    }
    let body: BucketBody = bincode::deserialize(&block.decompress()?)
        .map_err(|e| Error::corrupt(format!("{}: {}", what, e)))?;

    if body.stride as usize != stride {
        return Err(Error::corrupt(format!("{}: gram stride {} != {}", what, body.stride, stride)));
    }
    let bucket = decode_body(gram_count, body)?;
    if bucket.num_strings() != header.num_strings as usize || bucket.num_grams() != header.num_grams as usize {
        return Err(Error::corrupt(format!("{}: counts disagree with header", what)));
    }
    Ok(bucket)
}

fn encode_body(bucket: &BucketIndex) -> Result<BucketBody> {
    let mut postings = Vec::new();
    let mut list_ends = Vec::with_capacity(bucket.num_grams());
    for i in 0..bucket.num_grams() {
        DeltaEncoder::encode_sorted(bucket.list_at(i), &mut postings);
        let end = u32::try_from(postings.len())
            .map_err(|_| Error::invalid_parameter("bucket posting data exceeds 4 GiB"))?;
        list_ends.push(end);
    }

    let mut ids = Vec::new();
    DeltaEncoder::encode_sorted(bucket.ids(), &mut ids);

    Ok(BucketBody {
        stride: bucket.stride() as u32,
        keys: bucket.keys().to_vec(),
        list_ends,
        postings,
        ids,
        strings: bucket.strings().to_vec(),
    })
}

fn decode_body(gram_count: u32, body: BucketBody) -> Result<BucketIndex> {
    let mut postings = Vec::new();
    let mut offsets = Vec::with_capacity(body.list_ends.len() + 1);
    offsets.push(0u32);

    let mut start = 0usize;
    for &end in &body.list_ends {
        let end = end as usize;
        let list = body
            .postings
            .get(start..end)
            .ok_or_else(|| Error::corrupt(format!("bucket {}: bad list offsets", gram_count)))?;
        DeltaEncoder::decode_sorted_into(list, &mut postings)?;
        offsets.push(postings.len() as u32);
        start = end;
    }
    if start != body.postings.len() {
        return Err(Error::corrupt(format!("bucket {}: trailing posting data", gram_count)));
    }

    let ids = DeltaEncoder::decode_sorted(&body.ids)?;
    BucketIndex::from_parts(
        gram_count,
        body.stride as usize,
        body.keys,
        offsets,
        postings,
        ids,
        body.strings,
    )
}
