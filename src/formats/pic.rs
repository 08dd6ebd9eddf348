//! PIC raster image header.
//!
//! A fixed 64-byte header followed by one palette-index byte per pixel.
//! The palette either lives at a declared offset inside the same file or
//! in a shared PALETTE.PAL resolved by directory search. The row-header
//! region is carried by the format but not needed for decoding.

use std::io::Cursor;

use serde::Serialize;

use crate::binary_utils::{read_u16_le, read_u32_le};
use crate::error::{UncookError, UncookResult};

pub const HEADER_SIZE: usize = 64;

/// The eleven documented header fields, in file order. `unk0` and `unk1`
/// are preserved but never interpreted.
#[derive(Debug, Clone, Serialize)]
pub struct PicHeader {
    pub format: u16,
    pub width: u32,
    pub height: u32,
    /// Always 64, the size of this header.
    pub header_size: u32,
    pub pixels_size: u32,
    /// Zero means the palette is not embedded in this file.
    pub palette_offset: u32,
    pub palette_size: u32,
    pub unk0: u32,
    pub unk1: u32,
    pub rowheads_offset: u32,
    pub rowheads_size: u16,
}

/// Decode the first 64 bytes of a PIC file.
///
/// Geometry is deliberately not checked against `pixels_size`; corpus
/// files disagree with their own dimensions and still decode.
pub fn parse_header(data: &[u8]) -> UncookResult<PicHeader> {
    if data.len() < HEADER_SIZE {
        return Err(UncookError::Format(format!(
            "file too short for a PIC header ({} of {} bytes)",
            data.len(),
            HEADER_SIZE
        )));
    }

    let mut cursor = Cursor::new(data);
    let header = PicHeader {
        format: read_u16_le(&mut cursor)?,
        width: read_u32_le(&mut cursor)?,
        height: read_u32_le(&mut cursor)?,
        header_size: read_u32_le(&mut cursor)?,
        pixels_size: read_u32_le(&mut cursor)?,
        palette_offset: read_u32_le(&mut cursor)?,
        palette_size: read_u32_le(&mut cursor)?,
        unk0: read_u32_le(&mut cursor)?,
        unk1: read_u32_le(&mut cursor)?,
        rowheads_offset: read_u32_le(&mut cursor)?,
        rowheads_size: read_u16_le(&mut cursor)?,
    };

    if header.header_size != HEADER_SIZE as u32 {
        return Err(UncookError::Format(format!(
            "bad fixed marker: expected {}, found {}",
            HEADER_SIZE, header.header_size
        )));
    }

    Ok(header)
}

/// The pixel index bytes immediately after the header, clamped to the
/// actual file size.
pub fn pixel_data<'a>(data: &'a [u8], header: &PicHeader) -> &'a [u8] {
    let start = HEADER_SIZE.min(data.len());
    let end = (HEADER_SIZE + header.pixels_size as usize).min(data.len());
    &data[start..end]
}
