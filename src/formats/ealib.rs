//! EALIB archive directory format.
//!
//! The container starts with a 5-byte magic and a 16-bit entry count,
//! followed by one fixed-size record per entry. Records carry no length;
//! each entry's byte span runs from its own start offset to the next
//! entry's start offset (the last entry runs to the end of the file).

use std::io::Cursor;

use crate::binary_utils::{read_padded_name, read_u16_le, read_u32_le, read_u8};
use crate::error::{UncookError, UncookResult};

pub const MAGIC: &[u8; 5] = b"EALIB";

/// Magic plus the 16-bit entry count.
pub const HEADER_SIZE: usize = 7;

pub const NAME_SIZE: usize = 13;

/// NUL-padded name, flag byte, 32-bit start offset.
pub const RECORD_SIZE: usize = NAME_SIZE + 1 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFlag {
    Raw,
    Compressed,
}

impl EntryFlag {
    fn from_code(code: u8, name: &str) -> UncookResult<Self> {
        match code {
            0 => Ok(EntryFlag::Raw),
            4 => Ok(EntryFlag::Compressed),
            other => Err(UncookError::Format(format!(
                "entry {}: unknown flag code {} (expected 0 or 4)",
                name, other
            ))),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            EntryFlag::Raw => 0,
            EntryFlag::Compressed => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LibEntry {
    pub name: String,
    pub flag: EntryFlag,
    pub start_offset: u32,
    /// Derived from the next entry's start offset, filled in by
    /// [`infer_lengths`] before any entry is materialized.
    pub length: u64,
}

/// Total bytes occupied by the header and all directory records.
pub fn directory_size(count: usize) -> usize {
    HEADER_SIZE + count * RECORD_SIZE
}

/// Decode the archive directory into entries with lengths still unset.
pub fn parse_directory(data: &[u8]) -> UncookResult<Vec<LibEntry>> {
    let mut cursor = Cursor::new(data);

    let magic = crate::binary_utils::read_bytes(&mut cursor, MAGIC.len())?;
    if magic != MAGIC {
        return Err(UncookError::Format(format!(
            "not an EALIB archive (magic {:?})",
            String::from_utf8_lossy(&magic)
        )));
    }

    let count = read_u16_le(&mut cursor)? as usize;
    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        let name = read_padded_name(&mut cursor, NAME_SIZE).map_err(|e| {
            UncookError::Format(format!("directory record {}: {}", index, e))
        })?;
        let code = read_u8(&mut cursor)?;
        let flag = EntryFlag::from_code(code, &name)?;
        let start_offset = read_u32_le(&mut cursor)?;
        entries.push(LibEntry {
            name,
            flag,
            start_offset,
            length: 0,
        });
    }

    // The directory must end strictly before the first blob begins.
    if let Some(first) = entries.first() {
        let dir_end = directory_size(entries.len()) as u64;
        if first.start_offset as u64 <= dir_end {
            return Err(UncookError::Format(format!(
                "directory overruns first blob (entry {} at {}, directory ends at {})",
                first.name, first.start_offset, dir_end
            )));
        }
    }

    Ok(entries)
}

/// Fill in each entry's length from the start offset of the next one.
///
/// Directory order must be ascending offset order; the format gives no
/// other way to recover spans, so an out-of-order directory is rejected
/// rather than silently producing wrong lengths.
pub fn infer_lengths(entries: &mut [LibEntry], archive_len: u64) -> UncookResult<()> {
    if entries.is_empty() {
        return Ok(());
    }

    for i in 0..entries.len() - 1 {
        let start = entries[i].start_offset;
        let next = entries[i + 1].start_offset;
        if next < start {
            return Err(UncookError::Format(format!(
                "directory offsets not ascending: {} at {} followed by {} at {}",
                entries[i].name, start, entries[i + 1].name, next
            )));
        }
        entries[i].length = (next - start) as u64;
    }

    let last = entries.len() - 1;
    if entries[last].start_offset as u64 > archive_len {
        return Err(UncookError::Format(format!(
            "entry {} starts at {} beyond the {}-byte archive",
            entries[last].name, entries[last].start_offset, archive_len
        )));
    }
    entries[last].length = archive_len - entries[last].start_offset as u64;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, flag: u8, offset: u32) -> Vec<u8> {
        let mut rec = vec![0u8; RECORD_SIZE];
        rec[..name.len()].copy_from_slice(name.as_bytes());
        rec[NAME_SIZE] = flag;
        rec[NAME_SIZE + 1..].copy_from_slice(&offset.to_le_bytes());
        rec
    }

    fn archive(records: &[(&str, u8, u32)], total_len: usize) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&(records.len() as u16).to_le_bytes());
        for &(name, flag, offset) in records {
            data.extend_from_slice(&record(name, flag, offset));
        }
        data.resize(total_len, 0xAA);
        data
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = archive(&[("A", 0, 50)], 60);
        data[..5].copy_from_slice(b"EALIC");
        let err = parse_directory(&data).unwrap_err();
        assert!(matches!(err, UncookError::Format(_)), "{:?}", err);
    }

    #[test]
    fn rejects_unknown_flag_code() {
        let data = archive(&[("A", 3, 50)], 60);
        let err = parse_directory(&data).unwrap_err();
        assert!(matches!(err, UncookError::Format(_)), "{:?}", err);
    }

    fn entry(name: &str, offset: u32) -> LibEntry {
        LibEntry {
            name: name.to_string(),
            flag: EntryFlag::Raw,
            start_offset: offset,
            length: 0,
        }
    }

    #[test]
    fn infers_lengths_from_adjacent_offsets() {
        let mut entries = vec![entry("A", 40), entry("B", 50)];
        infer_lengths(&mut entries, 60).unwrap();
        assert_eq!(entries[0].length, 10);
        assert_eq!(entries[1].length, 10);
    }

    #[test]
    fn inferred_lengths_cover_whole_archive() {
        let data = archive(&[("A", 0, 62), ("B", 4, 80), ("C", 0, 95)], 130);
        let mut entries = parse_directory(&data).unwrap();
        infer_lengths(&mut entries, data.len() as u64).unwrap();
        let gap = entries[0].start_offset as u64 - directory_size(entries.len()) as u64;
        let total: u64 = entries.iter().map(|e| e.length).sum();
        assert_eq!(
            directory_size(entries.len()) as u64 + gap + total,
            data.len() as u64
        );
    }

    #[test]
    fn rejects_directory_overrunning_first_blob() {
        // Directory for one entry ends at byte 25; an entry starting
        // there or earlier would overlap its own descriptor.
        let data = archive(&[("A", 0, 25)], 60);
        let err = parse_directory(&data).unwrap_err();
        assert!(matches!(err, UncookError::Format(_)), "{:?}", err);
    }

    #[test]
    fn rejects_descending_offsets() {
        let mut entries = vec![entry("A", 80), entry("B", 50)];
        let err = infer_lengths(&mut entries, 100).unwrap_err();
        assert!(matches!(err, UncookError::Format(_)), "{:?}", err);
    }

    #[test]
    fn rejects_entry_past_end_of_archive() {
        let mut entries = vec![entry("A", 500)];
        let err = infer_lengths(&mut entries, 60).unwrap_err();
        assert!(matches!(err, UncookError::Format(_)), "{:?}", err);
    }

    #[test]
    fn trims_nul_padded_names() {
        let data = archive(&[("TITLE.PIC", 0, 50)], 60);
        let entries = parse_directory(&data).unwrap();
        assert_eq!(entries[0].name, "TITLE.PIC");
        assert_eq!(entries[0].flag, EntryFlag::Raw);
    }
}
