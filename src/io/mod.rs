mod local;

pub use local::LocalAttachments;

use anyhow::Result;
use async_trait::async_trait;

/// An attachment as handed over by the mailbox side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: Option<String>,
    /// Size declared by the sender, not the payload length
    pub declared_size: Option<u64>,
    /// Opaque textual payload (base64, decimal list, ...)
    pub payload: String,
}

/// Trait for sources that supply already-fetched attachments
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Fetch every attachment the source holds
    async fn attachments(&self) -> Result<Vec<Attachment>>;
}
