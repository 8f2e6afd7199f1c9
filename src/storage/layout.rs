use std::path::{Path, PathBuf};
use std::fs;
use crate::core::error::Result;

/// Directory structure of one database
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // Root directory, the database path
    pub buckets_dir: PathBuf,   // One .bkt file per length bucket
}

impl StorageLayout {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let buckets_dir = base_dir.join("buckets");
        StorageLayout { base_dir, buckets_dir }
    }

    /// Create the directories for a database that is about to be written.
    pub fn create(base_dir: impl AsRef<Path>) -> Result<Self> {
        let layout = Self::new(base_dir);
        fs::create_dir_all(&layout.buckets_dir)?;
        Ok(layout)
    }

    pub fn header_path(&self) -> PathBuf {
        self.base_dir.join("header.bin")
    }

    pub fn header_tmp_path(&self) -> PathBuf {
        self.base_dir.join("header.bin.tmp")
    }

    pub fn bucket_path(&self, gram_count: u32) -> PathBuf {
        self.buckets_dir.join(format!("{:08}.bkt", gram_count))
    }

    /// Whether a finalized database lives here.
    pub fn is_finalized(&self) -> bool {
        self.header_path().is_file()
    }

    /// Remove the header and every bucket file left by a previous build.
    pub fn clear(&self) -> Result<()> {
        for path in [self.header_path(), self.header_tmp_path()] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        for entry in fs::read_dir(&self.buckets_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "bkt") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = StorageLayout::new("/tmp/names.db");
        assert_eq!(layout.bucket_path(21), PathBuf::from("/tmp/names.db/buckets/00000021.bkt"));
        assert_eq!(layout.header_path(), PathBuf::from("/tmp/names.db/header.bin"));
    }

    #[test]
    fn test_clear_removes_previous_build() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::create(dir.path()).unwrap();
        fs::write(layout.header_path(), b"old").unwrap();
        fs::write(layout.bucket_path(3), b"old").unwrap();
        fs::write(layout.buckets_dir.join("notes.txt"), b"keep").unwrap();
        layout.clear().unwrap();
        assert!(!layout.is_finalized());
        assert!(!layout.bucket_path(3).exists());
        assert!(layout.buckets_dir.join("notes.txt").exists());
    }
}
