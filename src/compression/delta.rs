use crate::compression::vbyte::VByteEncoder;
use crate::core::error::{Error, Result};

/// Delta + varint encoding for strictly increasing identifier lists.
///
/// IDs [100, 105, 108, 200] are stored as the varints 100, 5, 3, 92.
pub struct DeltaEncoder;

impl DeltaEncoder {
    /// Append the encoding of `ids` to `output`.
    pub fn encode_sorted(ids: &[u32], output: &mut Vec<u8>) {
        let mut prev = 0u32;
        for (i, &id) in ids.iter().enumerate() {
            debug_assert!(i == 0 || id > prev, "ids must be strictly increasing");
            VByteEncoder::encode_u32(output, id - prev);
            prev = id;
        }
    }

    /// Decode a whole list, appending the ids to `output`.
    pub fn decode_sorted_into(data: &[u8], output: &mut Vec<u32>) -> Result<()> {
        let mut pos = 0;
        let mut prev = 0u32;
        let mut first = true;

        while pos < data.len() {
            let (delta, consumed) = VByteEncoder::decode_u32(&data[pos..])?;
            if !first && delta == 0 {
                return Err(Error::corrupt("posting list is not strictly increasing"));
            }
            prev = prev
                .checked_add(delta)
                .ok_or_else(|| Error::corrupt("posting list overflows u32"))?;
            output.push(prev);
            pos += consumed;
            first = false;
        }

        Ok(())
    }

    pub fn decode_sorted(data: &[u8]) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        Self::decode_sorted_into(data, &mut ids)?;
        Ok(ids)
    }
}
