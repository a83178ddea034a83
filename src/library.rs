use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;

use crate::app::media::{MediaRecord, parse_media_record};

pub struct Library {
    pub records: Vec<MediaRecord>,
    pub skipped: usize,
}

pub fn load_library(path: &Path) -> Result<Library> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read library file {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("library file {} is not valid JSON", path.display()))?;
    let (records, skipped) = parse_library(&value)
        .with_context(|| format!("library file {} has no entry list", path.display()))?;
    if skipped > 0 {
        warn!("skipped {skipped} malformed library entries");
    }
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(Library { records, skipped })
}

pub(crate) fn parse_library(value: &Value) -> Option<(Vec<MediaRecord>, usize)> {
    let items = value
        .as_array()
        .or_else(|| value.pointer("/entries").and_then(Value::as_array))?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for item in items {
        match parse_media_record(item) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    Some((records, skipped))
}
