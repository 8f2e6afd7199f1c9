use crate::core::error::{Error, Result};

/// Variable byte encoding for integers (best for small integers)
pub struct VByteEncoder;

impl VByteEncoder {
    /// Values < 128 use 1 byte, < 16384 use 2 bytes, at most 5 bytes.
    pub fn encode_u32(output: &mut Vec<u8>, mut value: u32) {
        while value >= 128 {
            output.push((value & 127) as u8 | 128);  // Set continuation bit
            value >>= 7;
        }
        output.push(value as u8);
    }

    /// Decode one value, returns (value, bytes_consumed)
    pub fn decode_u32(input: &[u8]) -> Result<(u32, usize)> {
        let mut value = 0u32;
        let mut shift = 0;

        for (i, &byte) in input.iter().enumerate() {
            let bits = (byte & 127) as u32;
            if shift == 28 && bits > 0x0F {
                return Err(Error::corrupt("varint overflows u32"));
            }
            value |= bits << shift;

            if byte & 128 == 0 {  // No continuation bit
                return Ok((value, i + 1));
            }

            shift += 7;
            if shift > 28 {
                return Err(Error::corrupt("varint longer than 5 bytes"));
            }
        }

        Err(Error::corrupt("truncated varint"))
    }
}
