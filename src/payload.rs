//! Attachment payload decoding.
//!
//! Upstream systems hand over attachment bodies as text in several shapes:
//! standard or URL-safe base64 with or without padding, a literal decimal
//! byte dump such as `80,75,3,4`, or base64 chunks joined by commas.
//! [`decode`] does not guess between them. It runs a fixed list of
//! strategies in order and returns the bytes from the first one that
//! succeeds:
//!
//! 1. [`Strategy::DecimalList`]: the whitespace-stripped text is a comma
//!    separated list of signed integers, each wrapped into `0..=255`
//! 2. [`Strategy::Base64`]: up to four base64 candidates, URL-safe before
//!    standard, raw before cleaned
//! 3. [`Strategy::Segmented`]: comma separated parts decoded one by one
//!    (without further segmentation) and concatenated
//!
//! When all of them fail the error lists every reason together with the
//! characters that fall outside the accepted alphabets.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use regex::Regex;
use tracing::debug;

use crate::error::{DecodeError, StrategyFailure};

static RE_DECIMAL_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+(,-?[0-9]+)*$").expect("regex is compile-time constant")
});

/// Decoding strategies, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    DecimalList,
    Base64,
    Segmented,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DecimalList => f.write_str("decimal list"),
            Strategy::Base64 => f.write_str("base64"),
            Strategy::Segmented => f.write_str("segmented"),
        }
    }
}

/// Outcome of a single strategy
enum Attempt {
    Decoded(Vec<u8>),
    Failed(String),
}

type StrategyFn = fn(&str, bool) -> Attempt;

const STRATEGIES: [(Strategy, StrategyFn); 3] = [
    (Strategy::DecimalList, decimal_list),
    (Strategy::Base64, base64_variants),
    (Strategy::Segmented, segmented),
];

/// Decode a payload, allowing comma-segmented input.
pub fn decode(raw: &str) -> Result<Vec<u8>, DecodeError> {
    decode_with(raw, true)
}

/// Decode a payload.
///
/// `allow_segmented` gates the last strategy; recursive calls on individual
/// segments pass `false`.
pub fn decode_with(raw: &str, allow_segmented: bool) -> Result<Vec<u8>, DecodeError> {
    let outcome = STRATEGIES.iter().try_fold(Vec::new(), |mut failures, &(strategy, run)| {
        match run(raw, allow_segmented) {
            Attempt::Decoded(bytes) => {
                debug!(%strategy, len = bytes.len(), "payload decoded");
                ControlFlow::Break(bytes)
            }
            Attempt::Failed(reason) => {
                debug!(%strategy, %reason, "decode strategy failed");
                failures.push(StrategyFailure { strategy, reason });
                ControlFlow::Continue(failures)
            }
        }
    });

    match outcome {
        ControlFlow::Break(bytes) => Ok(bytes),
        ControlFlow::Continue(attempts) => Err(DecodeError {
            attempts,
            invalid_chars: invalid_chars(raw),
        }),
    }
}

fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '_' | '-')
}

fn invalid_chars(raw: &str) -> BTreeSet<char> {
    raw.chars()
        .filter(|&c| !is_base64_char(c) && c != ',' && !c.is_whitespace())
        .collect()
}

fn decimal_list(raw: &str, _allow_segmented: bool) -> Attempt {
    let stripped = strip_whitespace(raw);
    if !RE_DECIMAL_LIST.is_match(&stripped) {
        return Attempt::Failed("not a comma separated list of integers".to_string());
    }

    let mut bytes = Vec::with_capacity(stripped.len() / 2);
    for part in stripped.split(',') {
        match part.parse::<i64>() {
            Ok(n) => bytes.push(n.rem_euclid(256) as u8),
            Err(e) => return Attempt::Failed(format!("{part}: {e}")),
        }
    }
    Attempt::Decoded(bytes)
}

fn pad(candidate: &str) -> String {
    let mut padded = candidate.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    padded
}

fn url_safe(candidate: &str) -> Result<Vec<u8>, String> {
    URL_SAFE
        .decode(pad(candidate))
        .map_err(|e| format!("url-safe: {e}"))
}

fn standard(candidate: &str) -> Result<Vec<u8>, String> {
    let swapped: String = candidate
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    STANDARD
        .decode(pad(&swapped))
        .map_err(|e| format!("standard: {e}"))
}

type AlphabetFn = fn(&str) -> Result<Vec<u8>, String>;

fn base64_variants(raw: &str, _allow_segmented: bool) -> Attempt {
    let stripped = strip_whitespace(raw);
    let cleaned: String = stripped.chars().filter(|&c| is_base64_char(c)).collect();

    let mut candidates: Vec<(&str, AlphabetFn)> = Vec::with_capacity(4);
    candidates.push((stripped.as_str(), url_safe));
    candidates.push((stripped.as_str(), standard));
    if cleaned != stripped {
        candidates.push((cleaned.as_str(), url_safe));
        candidates.push((cleaned.as_str(), standard));
    }

    let mut reasons = Vec::with_capacity(candidates.len());
    for (candidate, engine) in candidates {
        match engine(candidate) {
            Ok(bytes) => return Attempt::Decoded(bytes),
            Err(reason) => reasons.push(reason),
        }
    }
    Attempt::Failed(reasons.join(", "))
}

fn segmented(raw: &str, allow_segmented: bool) -> Attempt {
    if !allow_segmented {
        return Attempt::Failed("segmentation disabled".to_string());
    }
    if !strip_whitespace(raw).contains(',') {
        return Attempt::Failed("no comma separated segments".to_string());
    }

    let mut bytes = Vec::new();
    for (index, part) in raw.split(',').map(str::trim).filter(|p| !p.is_empty()).enumerate() {
        match decode_with(part, false) {
            Ok(decoded) => bytes.extend(decoded),
            Err(e) => return Attempt::Failed(format!("segment {index}: {e}")),
        }
    }
    Attempt::Decoded(bytes)
}
