//! Merge PDFs, split them into single pages, or extract selected pages.
//!
//! A [`job::Job`] names the operation and its ordered inputs;
//! [`job::JobRunner`] validates it, drives the engines in [`commands`] and
//! reports [`job::Progress`] as it goes. Outputs for `<parent>/<stem>.pdf`
//! land in `<parent>/<stem>/`.

pub mod commands;
pub mod config;
pub mod error;
pub mod job;
pub mod mcp;
pub mod output;
pub mod page_range;
pub mod pdf;

pub use error::{JobError, ValidationError};
pub use job::{Job, JobRunner, JobState, Operation, Progress};
pub use output::{OutputResolver, OutputSpec};
pub use page_range::PageSelection;
