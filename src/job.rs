//! One merge/split/extract request and the state machine that runs it.

use crate::commands::{merge, split};
use crate::error::{JobError, ValidationError};
use crate::output::{OutputResolver, OutputSpec};
use crate::page_range::PageSelection;
use crate::pdf::PdfDocument;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Merge,
    Split,
    /// `pages` is a selection expression such as "1,2,5-10".
    Extract { pages: String },
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Merge => "Merge",
            Operation::Split => "Split",
            Operation::Extract { .. } => "Extract",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub operation: Operation,
    pub inputs: Vec<PathBuf>,
}

impl Job {
    pub fn merge(inputs: Vec<PathBuf>) -> Self {
        Job {
            operation: Operation::Merge,
            inputs,
        }
    }

    pub fn split(inputs: Vec<PathBuf>) -> Self {
        Job {
            operation: Operation::Split,
            inputs,
        }
    }

    pub fn extract(inputs: Vec<PathBuf>, pages: impl Into<String>) -> Self {
        Job {
            operation: Operation::Extract {
                pages: pages.into(),
            },
            inputs,
        }
    }
}

/// Human-readable progress, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Started(&'static str),
    Wrote(PathBuf),
    Done,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Started(label) => write!(f, "{} progressing...", label),
            Progress::Wrote(path) => write!(f, "+ {}", path.display()),
            Progress::Done => write!(f, "Done!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Validating,
    Running,
    Completed,
    Rejected,
    Failed,
}

/// Runs jobs one at a time, synchronously.
///
/// Every input is opened (and, for extract, bounds-checked) before the
/// first output is written, so a bad input anywhere in the list leaves the
/// filesystem untouched. Once writing has started, the first error stops
/// the job and whatever was already written stays on disk.
#[derive(Debug)]
pub struct JobRunner {
    resolver: OutputResolver,
    state: JobState,
}

impl JobRunner {
    pub fn new(resolver: OutputResolver) -> Self {
        JobRunner {
            resolver,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn run<F>(&mut self, job: &Job, mut on_progress: F) -> Result<Vec<OutputSpec>, JobError>
    where
        F: FnMut(&Progress),
    {
        self.state = JobState::Idle;
        let result = self.drive(job, &mut on_progress);

        self.state = match &result {
            Ok(_) => JobState::Completed,
            Err(e) if e.is_validation() => JobState::Rejected,
            Err(_) => JobState::Failed,
        };
        match &result {
            Ok(outputs) => {
                tracing::info!(job = job.operation.label(), outputs = outputs.len(), "job done");
                on_progress(&Progress::Done);
            }
            Err(e) => tracing::warn!(job = job.operation.label(), state = ?self.state, "{}", e),
        }
        result
    }

    fn drive(
        &mut self,
        job: &Job,
        on_progress: &mut dyn FnMut(&Progress),
    ) -> Result<Vec<OutputSpec>, JobError> {
        self.state = JobState::Validating;
        if job.inputs.is_empty() {
            return Err(ValidationError::NoInputs.into());
        }
        let selection = match &job.operation {
            Operation::Extract { pages } => Some(PageSelection::parse(pages)?),
            Operation::Merge | Operation::Split => None,
        };
        if job.operation != Operation::Merge {
            self.check_distinct_outputs(&job.inputs)?;
        }

        let docs = job
            .inputs
            .iter()
            .map(PdfDocument::open)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(selection) = &selection {
            for doc in &docs {
                selection.check_bounds(doc.page_count(), doc.path())?;
            }
        }

        self.state = JobState::Running;
        on_progress(&Progress::Started(job.operation.label()));

        match &job.operation {
            Operation::Merge => {
                let output = merge::merge(docs, &self.resolver)?;
                on_progress(&Progress::Wrote(output.path()));
                Ok(vec![output])
            }
            Operation::Split | Operation::Extract { .. } => {
                let scope = selection
                    .as_ref()
                    .map_or(split::PageScope::All, split::PageScope::Selected);
                let mut outputs = Vec::new();
                for doc in docs {
                    outputs.extend(split::run(doc, scope, &self.resolver, |output| {
                        on_progress(&Progress::Wrote(output.path()))
                    })?);
                }
                Ok(outputs)
            }
        }
    }

    /// Split and extract name files by stem and ordinal, so two different
    /// inputs sharing an output directory would overwrite each other.
    fn check_distinct_outputs(&self, inputs: &[PathBuf]) -> Result<(), ValidationError> {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        for input in inputs {
            let dir = self.resolver.directory_for(input);
            match claimed.get(&dir) {
                Some(first) if *first != input.as_path() => {
                    return Err(ValidationError::OutputCollision {
                        first: first.to_path_buf(),
                        second: input.clone(),
                        dir,
                    });
                }
                Some(_) => {}
                None => {
                    claimed.insert(dir, input.as_path());
                }
            }
        }
        Ok(())
    }
}
