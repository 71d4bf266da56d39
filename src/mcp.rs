use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::commands::rotate::DEFAULT_DEGREES;
use crate::commands::split::SplitOptions;
use crate::commands::{self, Workspace};
use crate::error;
use crate::upload::Upload;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "Paths of the PDF files to merge, in order (at least 2)")]
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-3,5,7-9'); all pages when empty")]
    #[serde(default)]
    pub range: String,
    #[schemars(description = "Write the selection as one file instead of one file per page (default: false)")]
    #[serde(default)]
    pub merge_pages: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRotateRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Clockwise rotation in degrees: 90, 180 or 270 (default: 90)")]
    #[serde(default = "default_degrees")]
    pub degrees: i64,
}

fn default_degrees() -> i64 {
    DEFAULT_DEGREES
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfDownloadRequest {
    #[schemars(description = "Name of a generated file, as returned by another tool")]
    pub filename: String,
    #[schemars(description = "Where to write the file")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FilenameRequest {
    #[schemars(description = "Name of a generated file, as returned by another tool")]
    pub filename: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSelectPagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-3,5,7-9')")]
    pub range: String,
}

#[derive(Clone)]
pub struct PdfServer {
    workspace: Workspace,
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Merge two or more PDFs, in the order given, into merged_document.pdf")]
    fn pdf_merge(&self, Parameters(PdfMergeRequest { paths }): Parameters<PdfMergeRequest>) -> String {
        respond(
            paths
                .iter()
                .map(Upload::from_path)
                .collect::<error::Result<Vec<_>>>()
                .and_then(|uploads| commands::merge::run(&self.workspace, &uploads)),
        )
    }

    #[tool(description = "Split a PDF into one file per page, or extract a page range such as '1-3,5,7-9' into a single file with merge_pages. Malformed or out-of-range tokens are skipped; if nothing usable remains every page is selected.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let options = SplitOptions {
            range: req.range,
            merge_pages: req.merge_pages,
        };
        respond(
            Upload::from_path(&req.path)
                .and_then(|upload| commands::split::run(&self.workspace, &upload, &options)),
        )
    }

    #[tool(description = "Rewrite a PDF with unused objects dropped and streams compressed")]
    fn pdf_compress(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        respond(
            Upload::from_path(&path)
                .and_then(|upload| commands::compress::run(&self.workspace, &upload)),
        )
    }

    #[tool(description = "Rotate every page of a PDF clockwise by 90, 180 or 270 degrees")]
    fn pdf_rotate(&self, Parameters(req): Parameters<PdfRotateRequest>) -> String {
        respond(
            Upload::from_path(&req.path)
                .and_then(|upload| commands::rotate::run(&self.workspace, &upload, req.degrees)),
        )
    }

    #[tool(description = "Copy a generated file to a path of your choice")]
    fn pdf_download(&self, Parameters(req): Parameters<PdfDownloadRequest>) -> String {
        respond(
            commands::outputs::download(&self.workspace, &req.filename, &req.output).map(
                |size_bytes| DownloadResult {
                    filename: req.filename.clone(),
                    output_path: req.output.clone(),
                    size_bytes,
                },
            ),
        )
    }

    #[tool(description = "Delete a generated file")]
    fn pdf_delete(&self, Parameters(FilenameRequest { filename }): Parameters<FilenameRequest>) -> String {
        respond(
            commands::outputs::delete(&self.workspace, &filename)
                .map(|deleted| DeleteResult { filename, deleted }),
        )
    }

    #[tool(description = "Preview which pages a range such as '1-3,5,7-9' selects from a PDF, including the tokens that were ignored")]
    fn pdf_select_pages(&self, Parameters(req): Parameters<PdfSelectPagesRequest>) -> String {
        respond(
            Upload::from_path(&req.path)
                .and_then(|upload| commands::pages::run(&upload, &req.range)),
        )
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DownloadResult {
    pub filename: String,
    pub output_path: String,
    pub size_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DeleteResult {
    pub filename: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ErrorResult {
    pub error: String,
    pub status: u16,
}

fn respond<T: Serialize>(result: error::Result<T>) -> String {
    match result {
        Ok(value) => to_json(&value),
        Err(e) => {
            warn!(error = %e, status = e.status(), "tool call failed");
            to_json(&ErrorResult {
                error: e.to_string(),
                status: e.status(),
            })
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF manipulation tools. Use pdf_merge to combine files, pdf_split to extract \
                 pages (one file per page, or a range into one file), pdf_compress to shrink a \
                 file, and pdf_rotate to turn every page. Each returns the generated file name \
                 and download URL; pdf_download copies a generated file out and pdf_delete \
                 removes it. pdf_select_pages previews a page range."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(workspace: Workspace) -> Result<()> {
    let server = PdfServer::new(workspace);
    info!("serving MCP over stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
