use crate::analysis::char_unit::CharMode;
use crate::analysis::ngram::NGramGenerator;
use crate::compression::compress::CompressionType;
use crate::core::error::{Error, Result};
use crate::scoring::measure::Measure;

/// Settings fixed when a database is created.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub gram_size: usize,               // n, characters per gram
    pub boundary_marks: bool,           // Pad n-1 BEGIN/END markers around every string
    pub char_mode: CharMode,            // Bytes or Unicode scalar values
    pub compression: CompressionType,   // Bucket body compression
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            gram_size: 3,
            boundary_marks: false,
            char_mode: CharMode::Byte,
            compression: CompressionType::Lz4,
        }
    }
}

impl WriterConfig {
    pub fn with_gram_size(mut self, gram_size: usize) -> Self {
        self.gram_size = gram_size;
        self
    }

    pub fn with_boundary_marks(mut self, boundary_marks: bool) -> Self {
        self.boundary_marks = boundary_marks;
        self
    }

    pub fn with_char_mode(mut self, char_mode: CharMode) -> Self {
        self.char_mode = char_mode;
        self
    }

    /// Build the generator these settings describe, rejecting unusable ones.
    pub fn generator(&self) -> Result<NGramGenerator> {
        NGramGenerator::new(self.gram_size, self.boundary_marks, self.char_mode)
    }
}

/// Per-reader retrieval state. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub measure: Option<Measure>,       // None leaves the measure unset
    pub threshold: f64,                 // Checked on every retrieval
    pub cache_capacity: usize,          // Decoded buckets kept in memory
    pub expected_mode: Option<CharMode>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            measure: Some(Measure::Cosine),
            threshold: 0.7,
            cache_capacity: 64,
            expected_mode: None,
        }
    }
}

impl ReaderConfig {
    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_expected_mode(mut self, mode: CharMode) -> Self {
        self.expected_mode = Some(mode);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::invalid_parameter("bucket cache capacity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_writer_defaults() {
        let config = WriterConfig::default();
        assert_eq!(config.gram_size, 3);
        assert!(!config.boundary_marks);
        assert_eq!(config.char_mode, CharMode::Byte);
        let generator = config.generator().unwrap();
        assert_eq!(generator.n(), 3);
    }

    #[test]
    fn test_zero_gram_size_is_invalid() {
        let err = WriterConfig::default().with_gram_size(0).generator().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_reader_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.measure, Some(Measure::Cosine));
        assert_eq!(config.threshold, 0.7);
        assert!(config.validate().is_ok());
        let config = ReaderConfig { cache_capacity: 0, ..ReaderConfig::default() };
        assert!(config.validate().is_err());
    }
}
