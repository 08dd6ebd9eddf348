//! Extension-based dispatch over a directory of cooked assets.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::UncookResult;
use crate::formats::wav;
use crate::graphics::palette::SiblingSearch;
use crate::pic_extractor::{self, output_path};

/// Wrap a raw 11K sample file in a WAV container next to its basename.
pub fn uncook_snd(input: &Path, output_dir: &Path) -> UncookResult<PathBuf> {
    let samples = fs::read(input)?;
    let output = output_path(input, output_dir, "wav");
    fs::write(&output, wav::cook_wav(&samples))?;
    Ok(output)
}

/// Route one file to its decoder by extension. Returns `None` when no
/// uncooker is registered for the extension.
pub fn uncook_file(
    input: &Path,
    output_dir: &Path,
    optimize: bool,
) -> UncookResult<Option<PathBuf>> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_uppercase();

    match ext.as_str() {
        "PIC" => pic_extractor::decode_pic(input, output_dir, &SiblingSearch, optimize).map(Some),
        "11K" => uncook_snd(input, output_dir).map(Some),
        _ => Ok(None),
    }
}

/// Uncook every recognised file directly inside `input_dir`.
///
/// A failure is fatal only to the file that caused it; the remaining
/// files are still processed and the first error is reported at the
/// end.
pub fn uncook_dir(input_dir: &Path, output_dir: &Path, optimize: bool) -> UncookResult<()> {
    let mut first_error = None;

    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match uncook_file(&path, output_dir, optimize) {
            Ok(Some(output)) => println!("{} -> {}", path.display(), output.display()),
            Ok(None) => println!("No uncooker for {}", path.display()),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
