//! Main entry point for the zipform CLI application.
//!
//! Reads attachment payloads from local files or stdin and prints one JSON
//! record per attachment.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zipform::config::{ExtractorConfig, LabelOverrides, parse_zone};
use zipform::{
    Attachment, AttachmentSource, Cli, LocalAttachments, Outcome, PipelineOptions, inspect,
    process_attachment,
};
use zipform::payload::decode_with;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ExtractorConfig::new(parse_zone(&cli.zone)?);
    if let Some(path) = &cli.labels {
        config = config.with_label_overrides(&LabelOverrides::load(path)?)?;
    }

    let source = LocalAttachments::new(cli.files.iter());
    let attachments = source.attachments().await?;

    let options = PipelineOptions {
        allow_segmented: !cli.no_segmented,
    };

    if let Some(dir) = &cli.decode_only {
        return write_decoded(&attachments, &options, dir).await;
    }
    if cli.list {
        return list_members(&attachments, &options);
    }

    // Keep going after a failed attachment; report failure at the end.
    let mut failures = 0usize;
    for attachment in &attachments {
        match process_attachment(attachment, &options, &config) {
            Ok(Outcome::Parsed(record)) => println!("{}", serde_json::to_string(&record)?),
            Ok(Outcome::Empty(reason)) => info!(name = %attachment.name, ?reason, "no record"),
            Err(e) => {
                error!(name = %attachment.name, "{e}");
                failures += 1;
            }
        }
    }

    finish(failures, attachments.len())
}

/// Fail once every attachment has been tried.
fn finish(failures: usize, total: usize) -> Result<()> {
    if failures > 0 {
        anyhow::bail!("{failures} of {total} attachments failed");
    }
    Ok(())
}

/// Print the Central Directory of each attachment.
fn list_members(attachments: &[Attachment], options: &PipelineOptions) -> Result<()> {
    let mut failures = 0usize;
    for attachment in attachments {
        let bytes = match decode_with(&attachment.payload, options.allow_segmented) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(name = %attachment.name, "{e}");
                failures += 1;
                continue;
            }
        };
        let entries = inspect(&bytes);

        println!("{}:", attachment.name);
        println!("{:>10}  {:>10}  {:<10}  {:>3}  Name", "Length", "Size", "Method", "Enc");
        println!("{}", "-".repeat(50));
        for entry in &entries {
            println!(
                "{:>10}  {:>10}  {:<10}  {:>3}  {}",
                entry.uncompressed_size,
                entry.compressed_size,
                entry.compression_method.to_string(),
                if entry.encrypted { "*" } else { "" },
                entry.name
            );
        }
        println!("{}", "-".repeat(50));
        println!("{} entries", entries.len());
    }
    finish(failures, attachments.len())
}

/// Write decoded archive bytes to `dir`, one file per attachment.
async fn write_decoded(attachments: &[Attachment], options: &PipelineOptions, dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let mut failures = 0usize;
    for attachment in attachments {
        let bytes = match decode_with(&attachment.payload, options.allow_segmented) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(name = %attachment.name, "{e}");
                failures += 1;
                continue;
            }
        };
        let file_name = Path::new(&attachment.name)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|name| name != "-")
            .unwrap_or_else(|| "stdin.zip".to_string());
        let output = dir.join(file_name);
        tokio::fs::write(&output, &bytes)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(path = %output.display(), len = bytes.len(), "decoded");
    }
    finish(failures, attachments.len())
}
