pub mod compress;
pub mod merge;
pub mod outputs;
pub mod pages;
pub mod rotate;
pub mod split;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Result;
use crate::storage::OutputStore;

/// Collaborators every operation needs: where outputs go and how they are addressed
#[derive(Clone)]
pub struct Workspace {
    pub store: Arc<dyn OutputStore>,
    pub settings: Settings,
}

impl Workspace {
    pub fn new(store: Arc<dyn OutputStore>, settings: Settings) -> Self {
        Workspace { store, settings }
    }

    /// Store an output and describe where it can be downloaded
    pub fn publish(&self, filename: &str, bytes: &[u8]) -> Result<Published> {
        if self.store.exists(filename)? {
            debug!(filename, "replacing existing output");
        }
        self.store.put(filename, bytes)?;
        info!(filename, size = bytes.len(), "published output");
        Ok(Published {
            success: true,
            download_url: self.settings.download_url(filename),
            filename: filename.to_string(),
        })
    }
}

/// A single stored output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Published {
    pub success: bool,
    pub download_url: String,
    pub filename: String,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::upload::Upload;

    pub fn workspace() -> (Workspace, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let workspace = Workspace::new(store.clone(), Settings::default());
        (workspace, store)
    }

    pub fn pdf_upload(name: &str, pages: u32) -> Upload {
        Upload::new(name, crate::pdf::fixtures::sample_pdf(pages))
    }
}
