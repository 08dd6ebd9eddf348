//! Palette resolution and construction.
//!
//! Palettes come from one of two places: a region embedded in the image
//! file itself, or a shared PALETTE.PAL located by directory search.
//! Raw channel values sit in [0, 63] and are expanded before use.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{UncookError, UncookResult};
use crate::formats::pic::PicHeader;

/// Conventional name of the shared external palette file.
pub const PALETTE_FILE: &str = "PALETTE.PAL";

/// Filesystem lookup for external palettes, injected so resolution can
/// be tested against fixture layouts.
pub trait PaletteLocator {
    /// Find the palette file serving the image at `image_path`.
    fn find(&self, image_path: &Path) -> UncookResult<PathBuf>;
}

/// Looks in the image's own directory first, then in every sibling
/// directory in no particular order. Asset groups commonly share one
/// palette file instead of embedding their own.
pub struct SiblingSearch;

impl PaletteLocator for SiblingSearch {
    fn find(&self, image_path: &Path) -> UncookResult<PathBuf> {
        let own_dir = match image_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let candidate = own_dir.join(PALETTE_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }

        if let (Some(parent), Some(own_name)) = (own_dir.parent(), own_dir.file_name()) {
            for entry in fs::read_dir(parent)? {
                let entry = entry?;
                if entry.file_name() == own_name || !entry.path().is_dir() {
                    continue;
                }
                let candidate = entry.path().join(PALETTE_FILE);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(UncookError::PaletteNotFound(image_path.to_path_buf()))
    }
}

/// Obtain the raw palette bytes for an image: the embedded region when
/// the header declares one, an external file otherwise.
pub fn resolve_palette_bytes(
    data: &[u8],
    header: &PicHeader,
    image_path: &Path,
    locator: &dyn PaletteLocator,
) -> UncookResult<Vec<u8>> {
    if header.palette_offset == 0 {
        let palette_path = locator.find(image_path)?;
        return Ok(fs::read(palette_path)?);
    }

    if header.palette_size == 0 {
        return Err(UncookError::Format(format!(
            "{}: palette offset {} with zero palette size",
            image_path.display(),
            header.palette_offset
        )));
    }

    let start = header.palette_offset as usize;
    if start >= data.len() {
        return Err(UncookError::Format(format!(
            "{}: palette offset {} past end of {}-byte file",
            image_path.display(),
            start,
            data.len()
        )));
    }
    let end = (start + header.palette_size as usize).min(data.len());
    Ok(data[start..end].to_vec())
}

/// Expand raw [0, 63] channel values to full range.
///
/// The source format scales by 3, not 4; existing decoded assets depend
/// on that factor. A channel that scales past 255 means the data was
/// never a palette, so it is fatal rather than clamped. A trailing
/// partial group is ignored.
pub fn build_palette(raw: &[u8]) -> UncookResult<Vec<[u8; 3]>> {
    let mut palette = Vec::with_capacity(raw.len() / 3);
    for group in raw.chunks_exact(3) {
        let mut rgb = [0u8; 3];
        for (dst, &src) in rgb.iter_mut().zip(group) {
            let scaled = src as u16 * 3;
            if scaled > 255 {
                return Err(UncookError::Integrity(format!(
                    "palette channel {} scales to {} (max 255), corrupt palette data",
                    src, scaled
                )));
            }
            *dst = scaled as u8;
        }
        palette.push(rgb);
    }
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::pic;
    use crate::formats::pic::tests::header_bytes;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("uncook-palette-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn scales_channels_by_three() {
        let palette = build_palette(&[0, 0, 0, 85, 85, 85, 10, 20, 30]).unwrap();
        assert_eq!(palette[0], [0, 0, 0]);
        assert_eq!(palette[1], [255, 255, 255]);
        assert_eq!(palette[2], [30, 60, 90]);
    }

    #[test]
    fn channel_scaling_past_255_is_fatal() {
        let err = build_palette(&[86, 0, 0]).unwrap_err();
        assert!(matches!(err, UncookError::Integrity(_)), "{:?}", err);
    }

    #[test]
    fn ignores_a_trailing_partial_group() {
        let palette = build_palette(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0], [3, 6, 9]);
    }

    #[test]
    fn embedded_palette_comes_from_the_declared_region() {
        let header = pic::parse_header(&header_bytes(2, 2, 4, 70, 6)).unwrap();
        let mut data = vec![0u8; 70];
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let raw =
            resolve_palette_bytes(&data, &header, Path::new("X.PIC"), &SiblingSearch).unwrap();
        assert_eq!(raw, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn nonzero_offset_with_zero_size_is_a_format_error() {
        let header = pic::parse_header(&header_bytes(2, 2, 4, 70, 0)).unwrap();
        let data = vec![0u8; 100];
        let err = resolve_palette_bytes(&data, &header, Path::new("X.PIC"), &SiblingSearch)
            .unwrap_err();
        assert!(matches!(err, UncookError::Format(_)), "{:?}", err);
    }

    #[test]
    fn finds_palette_in_the_images_own_directory() {
        let root = fixture_dir("own");
        let group = root.join("group1");
        fs::create_dir_all(&group).unwrap();
        fs::write(group.join(PALETTE_FILE), [0u8; 3]).unwrap();
        let found = SiblingSearch.find(&group.join("IMG.PIC")).unwrap();
        assert_eq!(found, group.join(PALETTE_FILE));
    }

    #[test]
    fn falls_back_to_a_sibling_directory() {
        let root = fixture_dir("sibling");
        let group1 = root.join("group1");
        let group2 = root.join("group2");
        fs::create_dir_all(&group1).unwrap();
        fs::create_dir_all(&group2).unwrap();
        fs::write(group2.join(PALETTE_FILE), [0u8; 3]).unwrap();
        let found = SiblingSearch.find(&group1.join("IMG.PIC")).unwrap();
        assert_eq!(found, group2.join(PALETTE_FILE));
    }

    #[test]
    fn reports_when_no_palette_exists_anywhere() {
        let root = fixture_dir("none");
        let group = root.join("group1");
        fs::create_dir_all(&group).unwrap();
        let err = SiblingSearch.find(&group.join("IMG.PIC")).unwrap_err();
        assert!(matches!(err, UncookError::PaletteNotFound(_)), "{:?}", err);
    }
}
