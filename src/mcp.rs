use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::job::{Job, JobRunner};
use crate::output::OutputResolver;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathsRequest {
    #[schemars(description = "PDF files to process, in order")]
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "PDF files to extract from, in order")]
    pub paths: Vec<String>,
    #[schemars(description = "Page selection (e.g., '1,2,5-10,20,30')")]
    pub pages: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    resolver: OutputResolver,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new(resolver: OutputResolver) -> Self {
        Self {
            resolver,
            tool_router: Self::tool_router(),
        }
    }

    fn run_job(&self, job: Job) -> String {
        let mut runner = JobRunner::new(self.resolver.clone());
        let mut messages = Vec::new();

        match runner.run(&job, |p| messages.push(p.to_string())) {
            Ok(outputs) => {
                let result = JobResult {
                    outputs: outputs.iter().map(|o| o.to_string()).collect(),
                    messages,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn to_paths(paths: Vec<String>) -> Vec<PathBuf> {
    paths.into_iter().map(PathBuf::from).collect()
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Merge PDFs in the given order into <dir-of-first>/<first>/<first>_Merge.pdf")]
    fn pdf_merge(&self, Parameters(PathsRequest { paths }): Parameters<PathsRequest>) -> String {
        self.run_job(Job::merge(to_paths(paths)))
    }

    #[tool(description = "Split each PDF into one file per page, named <stem>_00001.pdf, <stem>_00002.pdf, ...")]
    fn pdf_split(&self, Parameters(PathsRequest { paths }): Parameters<PathsRequest>) -> String {
        self.run_job(Job::split(to_paths(paths)))
    }

    #[tool(description = "Write only the selected pages of each PDF, one file per page. Use selection syntax like '1,2,5-10'.")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        self.run_job(Job::extract(to_paths(req.paths), req.pages))
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct JobResult {
    pub outputs: Vec<String>,
    pub messages: Vec<String>,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page management tools. Use pdf_merge to combine files, pdf_split to write \
                 every page to its own file, and pdf_extract to write only selected pages. \
                 Outputs go to a directory named after each input file."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(resolver: OutputResolver) -> Result<()> {
    let server = PdfServer::new(resolver);

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
