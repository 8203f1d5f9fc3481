//! Error types for payload decoding and attachment processing

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::payload::Strategy;
use crate::zip::CompressionMethod;

/// One strategy's reason for not producing bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: Strategy,
    pub reason: String,
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

/// Every decoding strategy was exhausted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_decode_error(.attempts, .invalid_chars))]
pub struct DecodeError {
    /// Strategies in the order they were tried
    pub attempts: Vec<StrategyFailure>,
    /// Distinct characters outside the base64 and decimal alphabets
    pub invalid_chars: BTreeSet<char>,
}

fn render_decode_error(attempts: &[StrategyFailure], invalid_chars: &BTreeSet<char>) -> String {
    let tried: Vec<String> = attempts.iter().map(ToString::to_string).collect();
    let mut message = format!("could not decode payload ({})", tried.join("; "));
    if !invalid_chars.is_empty() {
        let chars: String = invalid_chars.iter().map(|c| c.escape_debug().to_string()).collect();
        message.push_str(&format!(", invalid characters: [{chars}]"));
    }
    message
}

/// Attachment pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Payload text could not be turned into bytes
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Member uses a method the member reader cannot handle
    #[error("unsupported compression method {method} ({code}) for {name}", code = .method.as_u16())]
    UnsupportedMethod {
        name: String,
        method: CompressionMethod,
    },

    /// Member is encrypted
    #[error("encrypted member {name} cannot be read")]
    Encrypted { name: String },

    /// Member data could not be read or decompressed
    #[error("failed to read member {name}: {source}")]
    Member {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for attachment processing
pub type Result<T> = std::result::Result<T, PipelineError>;
