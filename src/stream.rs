//! Raw file bytes to text and back.
//!
//! The reader stores `.an` and `.po` files either as plain UTF-8 or as a
//! zlib stream written at the default compression level.

use crate::error::{AppError, Result};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

/// Header of a zlib stream at default compression.
pub const ZLIB_MAGIC: [u8; 2] = [0x78, 0x9C];

/// Check whether a buffer starts with the zlib default-compression header.
pub fn is_compressed(data: &[u8]) -> bool {
    data.len() >= 2 && data[..2] == ZLIB_MAGIC
}

/// Decompress if needed and decode as UTF-8.
pub fn normalize(data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }

    let bytes = if is_compressed(data) {
        inflate(data)?
    } else {
        data.to_vec()
    };

    Ok(String::from_utf8(bytes)?)
}

/// Inflate a complete zlib stream. A stream that ends before its final
/// block is an error rather than a short read.
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(data.len() * 4);

    loop {
        if output.len() == output.capacity() {
            output.reserve(output.capacity().max(1024));
        }

        let consumed = inflater.total_in() as usize;
        let produced = output.len();
        let status = inflater
            .decompress_vec(&data[consumed..], &mut output, FlushDecompress::None)
            .map_err(|e| AppError::Decompression(e.to_string()))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if inflater.total_in() as usize == consumed && output.len() == produced {
                    return Err(AppError::Decompression("truncated zlib stream".into()));
                }
            }
        }
    }

    tracing::trace!(
        compressed = data.len(),
        inflated = output.len(),
        "Inflated zlib stream"
    );

    Ok(output)
}

/// Encode text as bytes, optionally zlib-compressed.
pub fn denormalize(text: &str, compress: bool) -> Result<Vec<u8>> {
    if !compress {
        return Ok(text.as_bytes().to_vec());
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}
