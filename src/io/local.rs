use super::{Attachment, AttachmentSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Name used for a payload read from standard input
const STDIN_NAME: &str = "-";

/// Attachment payloads stored as local text files, or `-` for stdin
pub struct LocalAttachments {
    paths: Vec<PathBuf>,
}

impl LocalAttachments {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    async fn read_one(path: &Path) -> Result<Attachment> {
        let payload = if path.as_os_str() == STDIN_NAME {
            let mut payload = String::new();
            tokio::io::stdin()
                .read_to_string(&mut payload)
                .await
                .context("failed to read payload from stdin")?;
            payload
        } else {
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read payload {}", path.display()))?
        };

        // Payload files are commonly named after the archive plus an encoding
        // suffix, e.g. `form.zip.b64`.
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| STDIN_NAME.to_string());
        let name = name
            .strip_suffix(".b64")
            .or_else(|| name.strip_suffix(".txt"))
            .unwrap_or(&name)
            .to_string();
        let mime_type = name
            .to_ascii_lowercase()
            .ends_with(".zip")
            .then(|| "application/zip".to_string());

        Ok(Attachment {
            name,
            mime_type,
            declared_size: None,
            payload,
        })
    }
}

#[async_trait]
impl AttachmentSource for LocalAttachments {
    async fn attachments(&self) -> Result<Vec<Attachment>> {
        let mut attachments = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            attachments.push(Self::read_one(path).await?);
        }
        Ok(attachments)
    }
}
