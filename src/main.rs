mod cli;
mod commands;
mod config;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod storage;
mod upload;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use commands::Workspace;
use serde::Serialize;
use storage::{DirStore, MemoryStore, OutputStore};
use tracing::info;
use tracing_subscriber::EnvFilter;
use upload::Upload;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries results (and the MCP transport), so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdfdesk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();
    let dry_run = cli.dry_run.then(|| Arc::new(MemoryStore::new()));
    let store: Arc<dyn OutputStore> = match &dry_run {
        Some(memory) => memory.clone(),
        None => {
            let store = DirStore::new(&settings.output_dir);
            info!(output_dir = %store.root().display(), "using output directory");
            Arc::new(store)
        }
    };
    let workspace = Workspace::new(store, settings);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(workspace).await?;
        }
        Commands::Merge { inputs } => {
            let uploads = inputs
                .iter()
                .map(read_upload)
                .collect::<Result<Vec<_>>>()?;
            print_json(&commands::merge::run(&workspace, &uploads)?)?;
        }
        Commands::Split {
            path,
            range,
            merge_pages,
        } => {
            let options = commands::split::SplitOptions { range, merge_pages };
            let result = commands::split::run(&workspace, &read_upload(&path)?, &options)?;
            print_json(&result)?;
        }
        Commands::Compress { path } => {
            print_json(&commands::compress::run(&workspace, &read_upload(&path)?)?)?;
        }
        Commands::Rotate { path, degrees } => {
            print_json(&commands::rotate::run(&workspace, &read_upload(&path)?, degrees)?)?;
        }
        Commands::Download { filename, output } => {
            let size = commands::outputs::download(&workspace, &filename, &output)?;
            println!("Wrote {} bytes to {}", size, output.display());
        }
        Commands::Delete { filename } => {
            if commands::outputs::delete(&workspace, &filename)? {
                println!("Deleted {}", filename);
            } else {
                println!("No such file: {}", filename);
            }
        }
        Commands::Pages { path, range } => {
            print_json(&commands::pages::run(&read_upload(&path)?, &range)?)?;
        }
    }

    if let Some(memory) = dry_run {
        info!(files = ?memory.keys(), "dry run, nothing was written");
    }

    Ok(())
}

fn read_upload<P: AsRef<Path>>(path: P) -> Result<Upload> {
    let path = path.as_ref();
    Upload::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
