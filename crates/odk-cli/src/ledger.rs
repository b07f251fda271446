//! Ledger file handling: a JSON array of order snapshots on disk.
//!
//! A missing file is an empty directory (first run); everything else that
//! goes wrong — unreadable file, malformed JSON, unknown status names,
//! duplicate ids — is an error with the path attached.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use odk_orders::OrderDirectory;
use odk_schemas::OrderSnapshot;

pub fn load(path: &Path) -> Result<OrderDirectory> {
    if !path.exists() {
        return Ok(OrderDirectory::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading ledger {}", path.display()))?;
    let snaps: Vec<OrderSnapshot> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing ledger {}", path.display()))?;
    let dir = OrderDirectory::from_snapshots(snaps)
        .with_context(|| format!("loading ledger {}", path.display()))?;
    Ok(dir)
}

pub fn save(path: &Path, dir: &OrderDirectory) -> Result<()> {
    let mut json = serde_json::to_string_pretty(&dir.snapshots())?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("writing ledger {}", path.display()))
}
