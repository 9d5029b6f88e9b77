use crate::Path;
use anyhow::{Context as _, Result};
use serde_json::Value;

/// Reads and parses a JSON document. The value is returned as is, the caller
/// decides whether it's a schema worth looking at.
pub fn json_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    serde_json::from_str(&content).with_context(|| format!("Unable to parse JSON in `{path}`"))
}
