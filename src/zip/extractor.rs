use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};

use anyhow::{Context, Result, bail};

use super::structures::{CompressionMethod, LFH_SIGNATURE, LFH_SIZE, ZipEntryMetadata};

/// Upper bound on the DEFLATE expansion ratio
const MAX_DEFLATE_RATIO: u64 = 1032;

/// Reads member data out of an in-memory archive.
///
/// Only STORED and DEFLATE members can be read; other methods are refused
/// before any data is touched.
pub struct MemberReader<'a> {
    bytes: &'a [u8],
}

impl<'a> MemberReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Get the offset where a member's data begins.
    ///
    /// The Local File Header repeats the name and may carry a different
    /// extra field than the Central Directory, so its own lengths are used.
    pub fn data_offset(&self, entry: &ZipEntryMetadata) -> Result<usize> {
        let lfh_offset = entry.lfh_offset as usize;
        let lfh = self
            .bytes
            .get(lfh_offset..lfh_offset + LFH_SIZE)
            .context("Local File Header is outside the archive")?;

        // Verify LFH signature (PK\x03\x04)
        if &lfh[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header");
        }

        let mut cursor = Cursor::new(lfh);
        cursor.set_position(26); // Offset to filename length field

        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        Ok(lfh_offset + LFH_SIZE + file_name_length + extra_field_length)
    }

    /// Read a member's uncompressed data.
    pub fn read(&self, entry: &ZipEntryMetadata) -> Result<Vec<u8>> {
        if entry.encrypted {
            bail!("{} is encrypted", entry.name);
        }
        if !entry.compression_method.is_supported() {
            bail!(
                "Unsupported compression method: {} ({})",
                entry.compression_method,
                entry.compression_method.as_u16()
            );
        }

        let data_offset = self.data_offset(entry)?;
        let data = self
            .bytes
            .get(data_offset..data_offset + entry.compressed_size as usize)
            .context("member data runs past the end of the archive")?;

        match entry.compression_method {
            CompressionMethod::Stored => Ok(data.to_vec()),
            CompressionMethod::Deflate => {
                let declared = entry.uncompressed_size as u64;
                // The declared size is untrusted; DEFLATE cannot expand more
                // than about 1032:1, so capacity never exceeds that bound.
                let capacity = declared.min(data.len() as u64 * MAX_DEFLATE_RATIO);
                let mut out = Vec::with_capacity(capacity as usize);
                DeflateDecoder::new(data)
                    .take(declared + 1)
                    .read_to_end(&mut out)
                    .context("failed to inflate member data")?;
                let inflated = out.len() as u64;
                if inflated > declared {
                    bail!("{} inflates past its declared size of {declared} bytes", entry.name);
                }
                if inflated < declared {
                    bail!("{} inflated to {inflated} bytes, expected {declared}", entry.name);
                }
                Ok(out)
            }
            other => bail!("Unsupported compression method: {other}"),
        }
    }
}
