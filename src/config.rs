use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "/download";

/// Runtime settings shared by every operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory generated files are written to
    pub output_dir: PathBuf,
    /// URL prefix under which stored outputs are served
    pub download_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// The download URL for a stored output, e.g. `/download/page_1.pdf/`
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/{}/",
            self.download_prefix.trim_end_matches('/'),
            filename
        )
    }
}
