//! RGB composition and PNG output.

use std::io;
use std::path::Path;

use image::RgbImage;

use crate::error::{UncookError, UncookResult};

/// Map palette indexes to RGB triples, row-major.
///
/// Out-of-range indexes fall back to palette entry 0; corpus files are
/// known to reference colors past a truncated palette and still render.
pub fn compose_rgb(indexes: &[u8], palette: &[[u8; 3]]) -> UncookResult<Vec<u8>> {
    let fallback = palette
        .first()
        .ok_or_else(|| UncookError::Integrity("palette has no entries".to_string()))?;

    let mut pixels = Vec::with_capacity(indexes.len() * 3);
    for &index in indexes {
        let rgb = palette.get(index as usize).unwrap_or(fallback);
        pixels.extend_from_slice(rgb);
    }
    Ok(pixels)
}

/// Encode the composed buffer as a PNG. With `optimize` set, an oxipng
/// pass rewrites the file in place after the initial save.
pub fn write_png(
    path: &Path,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    optimize: bool,
) -> UncookResult<()> {
    let found = pixels.len();
    let img = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        UncookError::Integrity(format!(
            "pixel buffer is {} bytes, {}x{} RGB needs {}",
            found,
            width,
            height,
            width as usize * height as usize * 3
        ))
    })?;
    img.save(path)?;

    if optimize {
        let options = oxipng::Options::from_preset(2);
        oxipng::optimize(
            &oxipng::InFile::Path(path.to_path_buf()),
            &oxipng::OutFile::Path(Some(path.to_path_buf())),
            &options,
        )
        .map_err(|e| {
            UncookError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("PNG optimisation failed: {}", e),
            ))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_indexes_fall_back_to_entry_zero() {
        let palette = vec![[10, 20, 30], [40, 50, 60], [70, 80, 90]];
        let pixels = compose_rgb(&[0, 5, 255], &palette).unwrap();
        assert_eq!(pixels, vec![10, 20, 30, 10, 20, 30, 10, 20, 30]);
    }

    #[test]
    fn in_range_indexes_use_their_own_entry() {
        let palette = vec![[1, 1, 1], [2, 2, 2]];
        let pixels = compose_rgb(&[1, 0, 1], &palette).unwrap();
        assert_eq!(pixels, vec![2, 2, 2, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn an_empty_palette_cannot_compose() {
        let err = compose_rgb(&[0], &[]).unwrap_err();
        assert!(matches!(err, UncookError::Integrity(_)), "{:?}", err);
    }

    #[test]
    fn a_short_pixel_buffer_cannot_encode() {
        let dir = std::env::temp_dir();
        let err = write_png(&dir.join("uncook-short.png"), vec![0u8; 3], 2, 2, false)
            .unwrap_err();
        assert!(matches!(err, UncookError::Integrity(_)), "{:?}", err);
    }
}
