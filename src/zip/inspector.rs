//! Central directory inspection over an in-memory archive.
//!
//! ## Scanning Strategy
//!
//! 1. Scan backwards from `len - 22` for the EOCD signature; the first hit wins
//! 2. Read the Central Directory size and offset from the EOCD
//! 3. Walk the Central Directory File Headers until a signature mismatch,
//!    the recorded end of the directory, or the end of the buffer
//!
//! Nothing here fails: a missing EOCD lists no entries and a damaged
//! directory lists the entries read before the damage.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use tracing::debug;

use super::structures::*;

/// Number of entries previewed in the debug log.
const PREVIEW_ENTRIES: usize = 5;

/// Result of inspecting a buffer.
///
/// Separates "there was no directory at all" from "the directory listed
/// nothing", which [`inspect`] folds together into an empty vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// No EOCD signature anywhere in the buffer
    NoDirectory,
    /// EOCD found but no readable Central Directory records
    Empty,
    Entries(Vec<ZipEntryMetadata>),
}

impl Inspection {
    pub fn into_entries(self) -> Vec<ZipEntryMetadata> {
        match self {
            Inspection::Entries(entries) => entries,
            Inspection::NoDirectory | Inspection::Empty => Vec::new(),
        }
    }
}

/// List member metadata in Central Directory order.
pub fn inspect(bytes: &[u8]) -> Vec<ZipEntryMetadata> {
    inspect_archive(bytes).into_entries()
}

/// Inspect a buffer, keeping the reason when nothing is listed.
pub fn inspect_archive(bytes: &[u8]) -> Inspection {
    let Some(eocd_offset) = find_eocd(bytes) else {
        debug!(len = bytes.len(), "no end of central directory signature");
        return Inspection::NoDirectory;
    };

    let Ok(eocd) = EndOfCentralDirectory::from_bytes(&bytes[eocd_offset..]) else {
        return Inspection::Empty;
    };

    let entries = walk_central_directory(bytes, eocd.cd_offset as usize, eocd.cd_size as usize);
    preview(&entries, eocd.total_entries);

    if entries.is_empty() {
        Inspection::Empty
    } else {
        Inspection::Entries(entries)
    }
}

/// Find the EOCD record by scanning backwards over the whole buffer.
///
/// The first signature found from `len - 22` downwards wins. The scan is not
/// bounded to the trailing comment window, so a stray signature inside member
/// data of a truncated archive can be picked up.
pub fn find_eocd(bytes: &[u8]) -> Option<usize> {
    let last = bytes.len().checked_sub(EndOfCentralDirectory::SIZE)?;
    (0..=last)
        .rev()
        .find(|&i| &bytes[i..i + 4] == EndOfCentralDirectory::SIGNATURE)
}

fn walk_central_directory(bytes: &[u8], cd_offset: usize, cd_size: usize) -> Vec<ZipEntryMetadata> {
    let cd_end = cd_offset.saturating_add(cd_size);
    let mut entries = Vec::new();
    let mut offset = cd_offset;

    while offset < cd_end {
        match parse_cdfh(bytes, offset) {
            Some((entry, record_len)) => {
                entries.push(entry);
                offset += record_len;
            }
            None => break,
        }
    }

    entries
}

/// Parse one Central Directory File Header at `offset`.
///
/// Returns the entry and the full record length, or `None` when the
/// signature does not match or the record runs past the buffer.
fn parse_cdfh(bytes: &[u8], offset: usize) -> Option<(ZipEntryMetadata, usize)> {
    let header = bytes.get(offset..offset.checked_add(CDFH_MIN_SIZE)?)?;
    if &header[0..4] != CDFH_SIGNATURE {
        return None;
    }

    let mut cursor = Cursor::new(&header[8..]);
    let flags = cursor.read_u16::<LittleEndian>().ok()?;
    let compression_method = cursor.read_u16::<LittleEndian>().ok()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>().ok()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>().ok()?;
    let _crc32 = cursor.read_u32::<LittleEndian>().ok()?;
    let compressed_size = cursor.read_u32::<LittleEndian>().ok()?;
    let uncompressed_size = cursor.read_u32::<LittleEndian>().ok()?;
    let file_name_length = cursor.read_u16::<LittleEndian>().ok()? as usize;
    let extra_field_length = cursor.read_u16::<LittleEndian>().ok()? as usize;
    let file_comment_length = cursor.read_u16::<LittleEndian>().ok()? as usize;
    let _disk_number_start = cursor.read_u16::<LittleEndian>().ok()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>().ok()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>().ok()?;
    let lfh_offset = cursor.read_u32::<LittleEndian>().ok()?;

    let name_start = offset + CDFH_MIN_SIZE;
    let name_bytes = bytes.get(name_start..name_start + file_name_length)?;
    // Byte-per-char mapping; the UTF-8 flag (bit 11) is not consulted.
    let name: String = name_bytes.iter().map(|&b| char::from(b)).collect();

    let entry = ZipEntryMetadata {
        name,
        compression_method: CompressionMethod::from_u16(compression_method),
        encrypted: flags & 0x0001 != 0,
        compressed_size,
        uncompressed_size,
        lfh_offset,
    };
    let record_len = CDFH_MIN_SIZE + file_name_length + extra_field_length + file_comment_length;

    Some((entry, record_len))
}

fn preview(entries: &[ZipEntryMetadata], recorded: u16) {
    debug!(count = entries.len(), recorded, "central directory listed");
    for entry in entries.iter().take(PREVIEW_ENTRIES) {
        debug!(
            name = %entry.name,
            method = %entry.compression_method,
            encrypted = if entry.encrypted { "yes" } else { "no" },
            "zip entry"
        );
    }
}
