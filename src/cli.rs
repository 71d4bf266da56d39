use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::rotate::DEFAULT_DEGREES;
use crate::config::{Settings, DEFAULT_DOWNLOAD_PREFIX, DEFAULT_OUTPUT_DIR};

#[derive(Parser)]
#[command(name = "pdfdesk")]
#[command(about = "Merge, split, compress and rotate PDFs, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Directory generated files are stored in
    #[arg(long, global = true, env = "PDFDESK_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// URL prefix for download links
    #[arg(
        long,
        global = true,
        env = "PDFDESK_DOWNLOAD_PREFIX",
        default_value = DEFAULT_DOWNLOAD_PREFIX
    )]
    pub download_prefix: String,

    /// Keep generated files in memory instead of writing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            output_dir: self.output_dir.clone(),
            download_prefix: self.download_prefix.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (primary mode)
    Mcp,

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
    },

    /// Split a PDF into single pages, or extract a page range
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Page ranges (e.g., "1-3,5,7-9"); all pages when omitted
        #[arg(short, long, default_value = "")]
        range: String,

        /// Write the selected pages to one file instead of one file per page
        #[arg(short, long)]
        merge_pages: bool,
    },

    /// Rewrite a PDF with unused objects dropped and streams compressed
    Compress {
        /// PDF file to compress
        path: PathBuf,
    },

    /// Rotate every page clockwise
    Rotate {
        /// PDF file to rotate
        path: PathBuf,

        /// Degrees: 90, 180 or 270
        #[arg(short, long, default_value_t = DEFAULT_DEGREES, allow_negative_numbers = true)]
        degrees: i64,
    },

    /// Copy a generated file out of the output directory
    Download {
        /// Name of the generated file (e.g., "page_1.pdf")
        filename: String,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Remove a generated file from the output directory
    Delete {
        /// Name of the generated file
        filename: String,
    },

    /// Show which pages a range selects, without writing anything
    Pages {
        /// PDF file to inspect
        path: PathBuf,

        /// Page ranges (e.g., "1-3,5,7-9")
        range: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_split_flags() {
        let cli = Cli::try_parse_from([
            "pdfdesk",
            "split",
            "doc.pdf",
            "--range",
            "1-3,5",
            "--merge-pages",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();

        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
        match cli.command {
            Commands::Split {
                range, merge_pages, ..
            } => {
                assert_eq!(range, "1-3,5");
                assert!(merge_pages);
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_merge_needs_two_inputs() {
        assert!(Cli::try_parse_from(["pdfdesk", "merge", "a.pdf"]).is_err());
    }

    #[test]
    fn test_rotate_default_degrees() {
        let cli = Cli::try_parse_from(["pdfdesk", "rotate", "doc.pdf"]).unwrap();
        assert!(matches!(cli.command, Commands::Rotate { degrees: 90, .. }));
    }
}
