//! ZIP container inspection.
//!
//! This module lists what an archive holds without decompressing anything,
//! and separately reads member data for the methods the pipeline accepts.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, header constants, entries)
//! - [`inspector`]: Central Directory walk over an in-memory buffer
//! - [`extractor`]: Member data reader (STORED copy, DEFLATE via `flate2`)
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The inspector reads the EOCD first, then the Central Directory, so a
//! listing never depends on member data being intact.
//!
//! ## Limitations
//!
//! - No ZIP64 support
//! - No multi-disk archive support
//! - Names are not decoded as UTF-8 or any code page

mod extractor;
mod inspector;
mod structures;

pub use extractor::MemberReader;
pub use inspector::{Inspection, find_eocd, inspect, inspect_archive};
pub use structures::*;

use crate::error::{PipelineError, Result};

/// Reject archives the member reader cannot handle.
///
/// This is policy, not parsing: the inspector reports any method, and the
/// caller decides. Encrypted members and every method other than STORED and
/// DEFLATE (Deflate64 in particular) are refused.
pub fn check_supported(entries: &[ZipEntryMetadata]) -> Result<()> {
    for entry in entries {
        if entry.encrypted {
            return Err(PipelineError::Encrypted {
                name: entry.name.clone(),
            });
        }
        if !entry.compression_method.is_supported() {
            return Err(PipelineError::UnsupportedMethod {
                name: entry.name.clone(),
                method: entry.compression_method,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, method: u16, encrypted: bool) -> ZipEntryMetadata {
        ZipEntryMetadata {
            name: name.to_string(),
            compression_method: CompressionMethod::from_u16(method),
            encrypted,
            compressed_size: 0,
            uncompressed_size: 0,
            lfh_offset: 0,
        }
    }

    #[test]
    fn test_check_supported() {
        assert!(check_supported(&[entry("a", 0, false), entry("b", 8, false)]).is_ok());

        let err = check_supported(&[entry("a", 0, false), entry("big", 9, false)]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnsupportedMethod { ref name, method: CompressionMethod::Deflate64 } if name == "big"
        ));
        assert_eq!(err.to_string(), "unsupported compression method Deflate64 (9) for big");

        let err = check_supported(&[entry("s", 8, true)]).unwrap_err();
        assert!(matches!(err, PipelineError::Encrypted { .. }));
    }
}
