use crate::core::error::{Error, Result};
use serde::{Serialize, Deserialize};

/// Block compression applied to a whole bucket body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompressionType {
    None,
    #[default]
    Lz4,      // lz4_flex block format
}

/// Compressed block storage for general purpose data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedBlock {
    pub data: Vec<u8>,
    pub original_size: usize,
    pub compression: CompressionType,
}

impl CompressedBlock {
    pub fn compress(data: &[u8], compression: CompressionType) -> Self {
        let compressed = match compression {
            CompressionType::None => data.to_vec(),
            CompressionType::Lz4 => lz4_flex::block::compress(data),
        };

        CompressedBlock {
            data: compressed,
            original_size: data.len(),
            compression,
        }
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        match self.compression {
            CompressionType::None => Ok(self.data.clone()),
            CompressionType::Lz4 => {
                lz4_flex::block::decompress(&self.data, self.original_size)
                    .map_err(|e| Error::corrupt(format!("lz4 block: {}", e)))
            }
        }
    }
}
