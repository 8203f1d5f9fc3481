//! # zipform
//!
//! Turn a possibly mis-encoded ZIP attachment into a structured request record.
//!
//! The library is three pure components plus the glue between them:
//!
//! - [`payload`]: decodes the attachment text (base64 in either alphabet,
//!   decimal byte lists, comma-segmented chunks) through a fixed strategy order
//! - [`zip`]: lists the Central Directory by hand, without decompressing, and
//!   reads STORED/DEFLATE members for the pipeline
//! - [`extract`]: pulls a fixed set of fields out of label/value form text,
//!   splitting composite lines, addresses and dates
//!
//! [`pipeline::process_attachment`] runs the three in order for one attachment.
//!
//! ## Example
//!
//! ```no_run
//! use zipform::{Attachment, ExtractorConfig, Outcome, PipelineOptions, process_attachment};
//!
//! fn main() -> anyhow::Result<()> {
//!     let attachment = Attachment {
//!         name: "form.zip".to_string(),
//!         mime_type: Some("application/zip".to_string()),
//!         declared_size: None,
//!         payload: std::fs::read_to_string("form.zip.b64")?,
//!     };
//!
//!     let config = ExtractorConfig::default();
//!     if let Outcome::Parsed(record) = process_attachment(&attachment, &PipelineOptions::default(), &config)? {
//!         println!("{} {}", record.brand, record.model);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod payload;
pub mod pipeline;
pub mod text;
pub mod zip;

pub use cli::Cli;
pub use config::{ExtractorConfig, LabelOverrides};
pub use error::{DecodeError, PipelineError};
pub use extract::{DateInput, Field, ParsedRequestRecord, extract, extract_blocks};
pub use io::{Attachment, AttachmentSource, LocalAttachments};
pub use payload::decode;
pub use pipeline::{EmptyReason, Outcome, PipelineOptions, process_attachment};
pub use zip::{CompressionMethod, ZipEntryMetadata, inspect};
