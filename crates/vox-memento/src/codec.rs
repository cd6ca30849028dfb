//! Zlib snapshot codec for voxel buffers.
//!
//! Snapshots compress well because voxel buffers are dominated by runs of
//! air. The codec is stateless; both directions are plain functions.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

use vox_scene::Region;

use crate::data::MementoData;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("snapshot compression failed: {0}")]
    Compress(#[source] std::io::Error),
    #[error("snapshot decompression failed: {0}")]
    Decompress(#[source] std::io::Error),
    #[error("compressed stream ended after {got} of {expected} bytes")]
    TruncatedStream { expected: usize, got: usize },
}

/// Compresses the full voxel byte buffer of a node into a [`MementoData`]
/// bound to `region`.
///
/// `buffer` must cover the whole region, `region.voxels() * VOXEL_STRIDE`
/// bytes.
pub fn compress(buffer: &[u8], region: Region) -> Result<MementoData, CodecError> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(buffer.len() / 2),
        Compression::default(),
    );
    encoder.write_all(buffer).map_err(CodecError::Compress)?;
    let compressed = encoder.finish().map_err(CodecError::Compress)?;
    Ok(MementoData::from_compressed(compressed, region))
}

/// Inflates `data` into `out`, which must be pre-sized to the snapshot's
/// uncompressed size. `out` is only meaningful when `Ok` is returned.
pub fn decompress(data: &MementoData, out: &mut [u8]) -> Result<(), CodecError> {
    debug_assert_eq!(out.len(), data.uncompressed_size());
    let mut decoder = ZlibDecoder::new(data.buffer());
    let mut filled = 0usize;
    while filled < out.len() {
        match decoder.read(&mut out[filled..]) {
            Ok(0) => {
                return Err(CodecError::TruncatedStream {
                    expected: out.len(),
                    got: filled,
                })
            }
            Ok(n) => filled += n,
            Err(err) => return Err(CodecError::Decompress(err)),
        }
    }
    Ok(())
}
