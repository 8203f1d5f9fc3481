//! One attachment in, one record out.
//!
//! The pipeline is synchronous and free of I/O; fetching attachments and
//! delivering records belong to the caller.

use tracing::{debug, info, warn};

use crate::config::ExtractorConfig;
use crate::error::{PipelineError, Result};
use crate::extract::{ParsedRequestRecord, extract_blocks};
use crate::io::Attachment;
use crate::payload;
use crate::text::decode_text;
use crate::zip::{Inspection, MemberReader, check_supported, inspect_archive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Allow comma-segmented payloads
    pub allow_segmented: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            allow_segmented: true,
        }
    }
}

/// Why an attachment produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Decoded bytes hold no End of Central Directory record
    NotAnArchive,
    /// The Central Directory listed nothing
    NoEntries,
    /// Every entry is a directory
    NoFiles,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Parsed(ParsedRequestRecord),
    Empty(EmptyReason),
}

/// Decode, inspect, read and extract a single attachment.
///
/// Decode failures and unsupported members are errors; an archive that
/// simply holds nothing is [`Outcome::Empty`].
pub fn process_attachment(
    attachment: &Attachment,
    options: &PipelineOptions,
    config: &ExtractorConfig,
) -> Result<Outcome> {
    let bytes = payload::decode_with(&attachment.payload, options.allow_segmented)?;
    debug!(name = %attachment.name, decoded = bytes.len(), declared = ?attachment.declared_size, "payload decoded");

    let entries = match inspect_archive(&bytes) {
        Inspection::NoDirectory => return Ok(Outcome::Empty(EmptyReason::NotAnArchive)),
        Inspection::Empty => return Ok(Outcome::Empty(EmptyReason::NoEntries)),
        Inspection::Entries(entries) => entries,
    };

    if let Err(e) = check_supported(&entries) {
        warn!(name = %attachment.name, error = %e, "attachment rejected");
        return Err(e);
    }

    let reader = MemberReader::new(&bytes);
    let mut blocks = Vec::new();
    for entry in entries.iter().filter(|e| !e.is_directory()) {
        let data = reader.read(entry).map_err(|source| PipelineError::Member {
            name: entry.name.clone(),
            source: source.into(),
        })?;
        blocks.push(decode_text(&data));
    }

    if blocks.is_empty() {
        return Ok(Outcome::Empty(EmptyReason::NoFiles));
    }

    let record = extract_blocks(&blocks, config);
    info!(name = %attachment.name, members = blocks.len(), "attachment parsed");
    Ok(Outcome::Parsed(record))
}
