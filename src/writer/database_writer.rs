use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;
use crate::core::config::WriterConfig;
use crate::core::error::{Error, Result};
use crate::core::types::StringId;
use crate::index::inverted::InvertedIndex;
use crate::storage::bucket_file::BucketWriter;
use crate::storage::header::DatabaseHeader;
use crate::storage::layout::StorageLayout;

/// Builds a database from inserted strings.
///
/// Nothing is readable until `close` has written the bucket files and then
/// the header. A failed close keeps the writer open so it can be retried.
/// Dropping an open writer closes it.
pub struct Writer {
    layout: StorageLayout,
    config: WriterConfig,
    database_id: Uuid,
    index: Option<InvertedIndex>,   // None once closed
}

impl Writer {
    /// Create (or overwrite) the database at `path` with default settings.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, WriterConfig::default())
    }

    pub fn open(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self> {
        let generator = config.generator()?;
        let layout = StorageLayout::create(path)?;
        // A previous build must not stay readable while this one is in progress.
        layout.clear()?;

        Ok(Writer {
            layout,
            config,
            database_id: Uuid::new_v4(),
            index: Some(InvertedIndex::new(generator)),
        })
    }

    pub fn insert(&mut self, text: &str) -> Result<StringId> {
        self.index
            .as_mut()
            .ok_or_else(|| Error::closed("writer is closed"))?
            .add(text)
    }

    pub fn num_entries(&self) -> u32 {
        self.index.as_ref().map_or(0, |index| index.num_entries())
    }

    pub fn is_closed(&self) -> bool {
        self.index.is_none()
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write every bucket, then the header. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(index) = self.index.as_ref() else {
            return Ok(());
        };
        let start = Instant::now();

        let mut header = DatabaseHeader::new(
            self.config.gram_size as u32,
            self.config.char_mode,
            self.config.boundary_marks,
            self.database_id,
        );
        header.num_entries = index.num_entries();

        let bucket_writer = BucketWriter::new(&self.layout, self.database_id, self.config.compression);
        let mut bytes = 0u64;
        for bucket in index.compact_buckets() {
            let bucket = bucket?;
            bytes += bucket_writer.write(&bucket)?;
            header.push_bucket(bucket.gram_count());
        }
        header.save(&self.layout)?;
        self.index = None;

        info!(
            path = %self.layout.base_dir.display(),
            entries = header.num_entries,
            buckets = header.bucket_keys.len(),
            bytes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "database finalized"
        );
        Ok(())
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if self.index.is_some() {
            warn!(path = %self.layout.base_dir.display(), "writer dropped without close, finalizing");
            if let Err(e) = self.close() {
                error!(path = %self.layout.base_dir.display(), error = %e, "failed to finalize database");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::create(dir.path().join("names.db")).unwrap();
        assert_eq!(writer.insert("Gordon Brown").unwrap(), StringId(0));
        assert_eq!(writer.insert("Gordon Brown").unwrap(), StringId(1));
        assert_eq!(writer.num_entries(), 2);
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.db");
        let mut writer = Writer::create(&path).unwrap();
        writer.insert("Barack Obama").unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert!(writer.is_closed());
        assert_eq!(writer.insert("late").unwrap_err().kind(), ErrorKind::ClosedResource);

        let header = DatabaseHeader::load(&StorageLayout::new(&path)).unwrap();
        assert_eq!(header.num_entries, 1);
        assert_eq!(header.bucket_keys, vec![10]);
        assert_eq!(header.max_gram_count, 10);
    }

    #[test]
    fn test_failed_close_keeps_writer_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.db");
        let mut writer = Writer::create(&path).unwrap();
        writer.insert("Gordon Brown").unwrap();
        std::fs::remove_dir_all(&path).unwrap();

        assert_eq!(writer.close().unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(writer.close().unwrap_err().kind(), ErrorKind::Io);
        assert!(!writer.is_closed());
        assert_eq!(writer.num_entries(), 1);
        assert!(!StorageLayout::new(&path).is_finalized());

        // Once the directory is back the same strings can still be finalized
        StorageLayout::create(&path).unwrap();
        writer.insert("James Gordon Brown").unwrap();
        writer.close().unwrap();
        assert!(writer.is_closed());
        let header = DatabaseHeader::load(&StorageLayout::new(&path)).unwrap();
        assert_eq!(header.num_entries, 2);
        assert_eq!(header.bucket_keys, vec![10, 16]);
    }

    #[test]
    fn test_drop_retries_failed_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.db");
        {
            let mut writer = Writer::create(&path).unwrap();
            writer.insert("Angela Merkel").unwrap();
            std::fs::remove_dir_all(&path).unwrap();
            assert!(writer.close().is_err());
            StorageLayout::create(&path).unwrap();
        }
        let header = DatabaseHeader::load(&StorageLayout::new(&path)).unwrap();
        assert_eq!(header.num_entries, 1);
    }

    #[test]
    fn test_reopening_discards_previous_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.db");
        let mut writer = Writer::create(&path).unwrap();
        writer.insert("Barack Obama").unwrap();
        writer.close().unwrap();

        let layout = StorageLayout::new(&path);
        let writer = Writer::create(&path).unwrap();
        assert!(!layout.is_finalized());
        assert!(!layout.bucket_path(10).exists());
        drop(writer);
        assert!(layout.is_finalized());
    }

    #[test]
    fn test_drop_finalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.db");
        {
            let mut writer = Writer::create(&path).unwrap();
            writer.insert("Angela Merkel").unwrap();
        }
        let header = DatabaseHeader::load(&StorageLayout::new(&path)).unwrap();
        assert_eq!(header.num_entries, 1);
    }
}
