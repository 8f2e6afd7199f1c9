use std::fs::{self, File};
use std::io::Write;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::analysis::char_unit::CharMode;
use crate::analysis::ngram::MAX_GRAM_SIZE;
use crate::core::error::{Error, ErrorKind, Result};
use crate::storage::layout::StorageLayout;

pub const MAGIC: [u8; 4] = *b"SGDB";
pub const BYTE_ORDER_CHECK: u32 = 0x6244_5371;
pub const FORMAT_VERSION: u32 = 1;

/// Database header, the last file written by a writer.
///
/// On disk: `[u32 len][bincode header][u32 crc32 of the bincode bytes]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseHeader {
    pub magic: [u8; 4],
    pub byte_order: u32,
    pub version: u32,
    pub gram_size: u32,
    pub char_mode: CharMode,
    pub boundary_marks: bool,
    pub num_entries: u32,
    pub bucket_keys: Vec<u32>,   // Ascending feature counts of populated buckets
    pub max_gram_count: u32,     // Largest bucket key, 0 when empty
    pub database_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl DatabaseHeader {
    pub fn new(
        gram_size: u32,
        char_mode: CharMode,
        boundary_marks: bool,
        database_id: Uuid,
    ) -> Self {
        DatabaseHeader {
            magic: MAGIC,
            byte_order: BYTE_ORDER_CHECK,
            version: FORMAT_VERSION,
            gram_size,
            char_mode,
            boundary_marks,
            num_entries: 0,
            bucket_keys: Vec::new(),
            max_gram_count: 0,
            database_id,
            created_at: Utc::now(),
        }
    }

    /// Record a populated bucket. Keys must arrive in ascending order.
    pub fn push_bucket(&mut self, gram_count: u32) {
        self.bucket_keys.push(gram_count);
        self.max_gram_count = self.max_gram_count.max(gram_count);
    }

    /// Write through a temporary file and rename into place.
    pub fn save(&self, layout: &StorageLayout) -> Result<()> {
        let body = bincode::serialize(self)?;
        let data = frame(&body);

        let tmp = layout.header_tmp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, layout.header_path())?;
        Ok(())
    }

    pub fn load(layout: &StorageLayout) -> Result<Self> {
        let path = layout.header_path();
        if !layout.base_dir.is_dir() || !path.is_file() {
            return Err(Error::new(
                ErrorKind::DatabaseNotFound,
                format!("no finalized database at {}", layout.base_dir.display()),
            ));
        }

        let data = fs::read(&path)?;
        let (body, rest) = unframe(&data, "database header")?;
        if !rest.is_empty() {
            return Err(Error::corrupt("database header: trailing bytes"));
        }

        let header: DatabaseHeader = bincode::deserialize(body)
            .map_err(|e| Error::corrupt(format!("database header: {}", e)))?;
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::corrupt("incorrect file format"));
        }
        if self.byte_order != BYTE_ORDER_CHECK {
            return Err(Error::corrupt("incompatible byte order"));
        }
        if self.version != FORMAT_VERSION {
            return Err(Error::corrupt(format!(
                "incompatible format version {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        if self.gram_size == 0 || self.gram_size as usize > MAX_GRAM_SIZE {
            return Err(Error::corrupt(format!("unusable gram size {}", self.gram_size)));
        }
        if self.bucket_keys.first() == Some(&0)
            || self.bucket_keys.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(Error::corrupt("bucket list out of order"));
        }
        if self.max_gram_count != self.bucket_keys.last().copied().unwrap_or(0) {
            return Err(Error::corrupt(format!(
                "max feature count {} disagrees with bucket list",
                self.max_gram_count
            )));
        }
        Ok(())
    }
}

/// `[u32 len][body][u32 crc32(body)]`
pub(crate) fn frame(body: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(body.len() + 8);
    data.extend_from_slice(&(body.len() as u32).to_le_bytes());
    data.extend_from_slice(body);
    data.extend_from_slice(&crc32fast::hash(body).to_le_bytes());
    data
}

/// Split one checksummed section off the front of `data`, returning the
/// section body and whatever follows it.
pub(crate) fn unframe<'a>(data: &'a [u8], what: &str) -> Result<(&'a [u8], &'a [u8])> {
    let truncated = || Error::corrupt(format!("{}: truncated", what));
    let len_bytes: [u8; 4] = data.get(..4).ok_or_else(truncated)?.try_into().map_err(|_| truncated())?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    let body = data.get(4..4 + len).ok_or_else(truncated)?;
    let crc_bytes: [u8; 4] = data.get(4 + len..8 + len).ok_or_else(truncated)?.try_into().map_err(|_| truncated())?;
    if crc32fast::hash(body) != u32::from_le_bytes(crc_bytes) {
        return Err(Error::corrupt(format!("{}: checksum mismatch", what)));
    }
    Ok((body, &data[8 + len..]))
}
