use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings. Values from the parameter file win over the command line.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub log_level: Option<String>,
    pub result_dir: Option<PathBuf>,
}

impl Settings {
    /// Overlay the parameter file at `path`, if there is one.
    pub fn with_param_file(self, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(self);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
        let file: Settings = serde_json::from_str(&text)
            .with_context(|| format!("Invalid parameter file: {}", path.display()))?;

        Ok(Settings {
            log_level: file.log_level.or(self.log_level),
            result_dir: file.result_dir.or(self.result_dir),
        })
    }

    /// Create the result directory if one is configured.
    pub fn prepare_result_dir(&self) -> Result<()> {
        if let Some(dir) = &self.result_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Log to stderr; stdout belongs to command output and the MCP transport.
pub fn init_logging(settings: &Settings) {
    let level = settings.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
