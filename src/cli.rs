use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpages")]
#[command(about = "Merge, split and extract PDF pages, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Log filter, e.g. "debug" or "pdfpages=trace" (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write outputs under this directory instead of next to each input
    #[arg(long, global = true)]
    pub result_dir: Option<PathBuf>,

    /// JSON parameter file; its values override the flags above
    #[arg(long, global = true, default_value = "param/param.json")]
    pub param: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Combine PDFs, in the given order, into <first>/<first>_Merge.pdf
    Merge {
        /// PDF files to merge
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Write every page of each PDF to its own file
    #[command(alias = "burst")]
    Split {
        /// PDF files to split
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Write only the selected pages of each PDF, one file per page
    Extract {
        /// Page selection (e.g., "1,2,5-10,20,30")
        #[arg(short, long)]
        pages: String,

        /// PDF files to extract from
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}
