use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{UncookError, UncookResult};
use crate::formats::pic::{self, PicHeader};
use crate::graphics::palette::{build_palette, resolve_palette_bytes, PaletteLocator};
use crate::graphics::render::{compose_rgb, write_png};

/// Decode one PIC file to a PNG named after the input basename.
///
/// Only format tag 0 is supported; anything else is rejected rather
/// than silently skipped.
pub fn decode_pic(
    input: &Path,
    output_dir: &Path,
    locator: &dyn PaletteLocator,
    optimize: bool,
) -> UncookResult<PathBuf> {
    let data = fs::read(input)?;
    let header = pic::parse_header(&data)?;
    if header.format != 0 {
        return Err(UncookError::Format(format!(
            "{}: unsupported format tag {}",
            input.display(),
            header.format
        )));
    }

    let raw_palette = resolve_palette_bytes(&data, &header, input, locator)?;
    let palette = build_palette(&raw_palette)?;
    let rgb = compose_rgb(pic::pixel_data(&data, &header), &palette)?;

    let output = output_path(input, output_dir, "png");
    write_png(&output, rgb, header.width, header.height, optimize)?;
    Ok(output)
}

/// Input basename with the extension replaced, under `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_else(|| input.as_os_str());
    output_dir.join(stem).with_extension(extension)
}

/// Print the header fields plus region-size sanity values without
/// decoding anything.
pub fn discover(input: &Path, json: bool) -> UncookResult<()> {
    let data = fs::read(input)?;
    let header = pic::parse_header(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&header)?);
        return Ok(());
    }

    print_regions(input, &data, &header);
    Ok(())
}

fn print_regions(input: &Path, data: &[u8], header: &PicHeader) {
    println!("{} sz: 0x{:x}", input.display(), data.len());
    println!(
        "fmt:{}, {:>4} x{:>4}, npix: 0x{:x}, nbytes: 0x{:x}",
        header.format,
        header.width,
        header.height,
        header.width as u64 * header.height as u64,
        header.pixels_size
    );
    println!(
        "palette @: 0x{:x}, sz: 0x{:x}",
        header.palette_offset, header.palette_size
    );
    println!("unk: 0: 0x{:x}, 1: 0x{:x}", header.unk0, header.unk1);
    println!(
        "rowheads @: 0x{:x}, sz: 0x{:x}",
        header.rowheads_offset, header.rowheads_size
    );

    let pixels = pic::pixel_data(data, header);
    let rowheads_start = (header.rowheads_offset as usize).min(data.len());
    let rowheads_end =
        (header.rowheads_offset as usize + header.rowheads_size as usize).min(data.len());
    let rowheads = &data[rowheads_start..rowheads_end];
    let palette = if header.palette_offset != 0 && header.palette_size != 0 {
        &data[(header.palette_offset as usize).min(data.len())..]
    } else {
        &[][..]
    };

    println!("header: 0x{:x}", pic::HEADER_SIZE);
    println!("pixeldata: 0x{:x}", pixels.len());
    println!("rowheaddata: 0x{:x}", rowheads.len());
    println!("palette: 0x{:x}", palette.len());
    let accounted = pic::HEADER_SIZE + pixels.len() + rowheads.len() + palette.len();
    println!("sum: 0x{:x}", accounted);
    println!("full file: 0x{:x}", data.len());

    if let (Some(min), Some(max)) = (pixels.iter().min(), pixels.iter().max()) {
        println!("min pixel: 0x{:x}", min);
        println!("max pixel: 0x{:x}", max);
    }
    if !rowheads.is_empty() {
        println!("rowhead count: 0x{:x}", rowheads.len() / 4);
    }
    if let (Some(min), Some(max)) = (palette.iter().min(), palette.iter().max()) {
        println!("min color: 0x{:x}", min);
        println!("max color: 0x{:x}", max);
        println!("color count: 0x{:x}", palette.len() / 3);
    }
}
