use std::path::Path;

use tracing::info;

use super::Workspace;
use crate::error::Result;

/// Fetch a previously published output by name
pub fn fetch(workspace: &Workspace, filename: &str) -> Result<Vec<u8>> {
    workspace.store.get(filename)
}

/// Copy a published output to `destination`, returning its size
pub fn download<P: AsRef<Path>>(
    workspace: &Workspace,
    filename: &str,
    destination: P,
) -> Result<usize> {
    let destination = destination.as_ref();
    let bytes = fetch(workspace, filename)?;
    std::fs::write(destination, &bytes)?;

    info!(filename, destination = %destination.display(), size = bytes.len(), "downloaded output");
    Ok(bytes.len())
}

/// Remove a published output. Returns whether it existed.
pub fn delete(workspace: &Workspace, filename: &str) -> Result<bool> {
    let removed = workspace.store.delete(filename)?;
    info!(filename, removed, "deleted output");
    Ok(removed)
}
