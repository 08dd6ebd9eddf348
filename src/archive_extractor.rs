use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::containers::Decompressor;
use crate::error::{UncookError, UncookResult};
use crate::formats::ealib::{infer_lengths, parse_directory, EntryFlag, LibEntry};

/// Extracts every entry of one EALIB archive into a directory, in
/// directory order, one entry fully materialized before the next.
pub struct ArchiveExtractor<'a, D: Decompressor> {
    decompressor: &'a D,
}

impl<'a, D: Decompressor> ArchiveExtractor<'a, D> {
    pub fn new(decompressor: &'a D) -> Self {
        ArchiveExtractor { decompressor }
    }

    /// Parse the directory, infer entry lengths, then materialize each
    /// blob. A failing entry stops extraction of this archive; entries
    /// already written stay on disk.
    pub fn extract<P: AsRef<Path>>(&self, archive_path: P, output_dir: &Path) -> UncookResult<()> {
        let archive_path = archive_path.as_ref();
        println!(
            "Extracting {} -> {}",
            archive_path.display(),
            output_dir.display()
        );

        let data = fs::read(archive_path)?;
        let mut entries = parse_directory(&data)?;
        infer_lengths(&mut entries, data.len() as u64)?;

        for entry in &entries {
            self.materialize(entry, &data, output_dir)?;
        }

        Ok(())
    }

    fn materialize(&self, entry: &LibEntry, data: &[u8], output_dir: &Path) -> UncookResult<()> {
        println!(
            "{:>13} sz: {:>7} flags: {:>2} @ {:>9}",
            entry.name,
            entry.length,
            entry.flag.code(),
            entry.start_offset
        );

        let start = entry.start_offset as usize;
        let span = data
            .get(start..start + entry.length as usize)
            .ok_or_else(|| {
                UncookError::Format(format!(
                    "entry {}: span [{}, {}) exceeds the {}-byte archive",
                    entry.name,
                    start,
                    start + entry.length as usize,
                    data.len()
                ))
            })?;

        let dest = output_dir.join(&entry.name);
        match entry.flag {
            EntryFlag::Raw => write_blob(&dest, span),
            EntryFlag::Compressed => {
                if span.len() < 4 {
                    return Err(UncookError::Format(format!(
                        "entry {}: compressed blob shorter than its 4-byte size prefix",
                        entry.name
                    )));
                }
                let expected =
                    u32::from_le_bytes([span[0], span[1], span[2], span[3]]) as usize;
                let blob = self.decompressor.decompress(&span[4..], expected)?;
                if blob.len() != expected {
                    return Err(UncookError::Integrity(format!(
                        "entry {}: decompressed to {} bytes, expected {}",
                        entry.name,
                        blob.len(),
                        expected
                    )));
                }
                write_blob(&dest, &blob)
            }
        }
    }
}

/// Exclusive create: extraction never overwrites an existing file.
fn write_blob(dest: &Path, bytes: &[u8]) -> UncookResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                UncookError::Conflict(dest.to_path_buf())
            } else {
                UncookError::Io(e)
            }
        })?;
    file.write_all(bytes)?;
    Ok(())
}
