use crate::error::JobError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Used when an input path has no file stem (e.g. `/`).
const FALLBACK_STEM: &str = "document";

/// Where a generated document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub dir: PathBuf,
    pub file_name: String,
}

impl OutputSpec {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl fmt::Display for OutputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Derives output locations from input paths.
///
/// For `<parent>/<stem>.pdf` everything lands in `<parent>/<stem>/`, or in
/// `<root>/<stem>/` when a result root is configured. With a root, inputs
/// that share a stem (`/x/a.pdf`, `/y/a.pdf`) share a directory; the job
/// runner rejects such input lists for split and extract.
#[derive(Debug, Clone, Default)]
pub struct OutputResolver {
    root: Option<PathBuf>,
}

impl OutputResolver {
    pub fn new(root: Option<PathBuf>) -> Self {
        OutputResolver { root }
    }

    /// Output directory for `input`, created (with parents) if missing.
    pub fn resolve_directory(&self, input: &Path) -> Result<PathBuf, JobError> {
        let dir = self.directory_for(input);
        std::fs::create_dir_all(&dir).map_err(|source| JobError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    pub fn resolve_merge_file(&self, input: &Path, label: &str) -> Result<OutputSpec, JobError> {
        Ok(OutputSpec {
            dir: self.resolve_directory(input)?,
            file_name: format!("{}_{}.pdf", stem(input), label),
        })
    }

    /// `ordinal` is the 1-based page position in the source document.
    pub fn resolve_page_file(&self, input: &Path, ordinal: u32) -> Result<OutputSpec, JobError> {
        Ok(OutputSpec {
            dir: self.resolve_directory(input)?,
            file_name: format!("{}_{:05}.pdf", stem(input), ordinal),
        })
    }

    /// Output directory for `input`, without touching the filesystem.
    pub fn directory_for(&self, input: &Path) -> PathBuf {
        let base = match &self.root {
            Some(root) => root.as_path(),
            None => input.parent().unwrap_or_else(|| Path::new("")),
        };
        base.join(stem(input))
    }
}

fn stem(input: &Path) -> &str {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(FALLBACK_STEM)
}
