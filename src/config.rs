//! Extraction configuration.
//!
//! Everything the extractor depends on is carried in [`ExtractorConfig`] and
//! passed to each call; there is no process-wide state.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::extract::FieldTable;

/// Default decorative token stripped from the end of captured values.
pub const DEFAULT_VALUE_MARKER: &str = "【必須】";

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Zone that form wall-clock times are read in
    pub zone: Tz,
    pub table: FieldTable,
    /// Token stripped from the end of captured values
    pub value_marker: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Tokyo)
    }
}

impl ExtractorConfig {
    pub fn new(zone: Tz) -> Self {
        Self {
            zone,
            table: FieldTable::default(),
            value_marker: DEFAULT_VALUE_MARKER.to_string(),
        }
    }

    /// Append label revisions to the built-in table.
    pub fn with_label_overrides(mut self, overrides: &LabelOverrides) -> Result<Self> {
        for (name, aliases) in &overrides.0 {
            if !self.table.add_aliases(name, aliases)? {
                bail!("unknown field in label overrides: {name}");
            }
        }
        Ok(self)
    }
}

/// Extra labels keyed by field spec name, e.g.
///
/// ```yaml
/// model: [モデル名]
/// bodyColorDoorCount: [外装色・ドア数]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LabelOverrides(pub BTreeMap<String, Vec<String>>);

impl LabelOverrides {
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read label overrides {}", path.display()))?;
        Self::from_yaml(&source).with_context(|| format!("invalid label overrides {}", path.display()))
    }
}

/// Parse an IANA zone name such as `Asia/Tokyo`.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("unknown time zone {name}: {e}"))
}
