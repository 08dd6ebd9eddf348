//! External decompression boundary.

pub mod blast;

use crate::error::UncookResult;

/// Contract with the external decompressor: given the compressed byte
/// stream and the size the archive directory promised, produce exactly
/// that many bytes or fail. Tests substitute a deterministic stub.
pub trait Decompressor {
    fn decompress(&self, compressed: &[u8], expected_size: usize) -> UncookResult<Vec<u8>>;
}
