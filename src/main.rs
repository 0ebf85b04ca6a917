mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pdfpages::config::{self, Settings};
use pdfpages::{mcp, Job, JobRunner, OutputResolver};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings {
        log_level: cli.global.log_level,
        result_dir: cli.global.result_dir,
    }
    .with_param_file(&cli.global.param)?;
    config::init_logging(&settings);
    settings.prepare_result_dir()?;

    let resolver = OutputResolver::new(settings.result_dir.clone());

    let job = match cli.command {
        Commands::Mcp => {
            mcp::run_server(resolver).await?;
            return Ok(());
        }
        Commands::Merge { inputs } => Job::merge(inputs),
        Commands::Split { inputs } => Job::split(inputs),
        Commands::Extract { pages, inputs } => Job::extract(inputs, pages),
    };

    let mut runner = JobRunner::new(resolver);
    runner.run(&job, |progress| println!("{}", progress))?;

    Ok(())
}
