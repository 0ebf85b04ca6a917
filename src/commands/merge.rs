use crate::error::{JobError, ValidationError};
use crate::output::{OutputResolver, OutputSpec};
use crate::pdf::{assemble, PdfDocument};
use std::path::Path;

pub const MERGE_LABEL: &str = "Merge";

/// Merge already-opened documents, in order, into the first one's output directory.
pub fn merge(docs: Vec<PdfDocument>, resolver: &OutputResolver) -> Result<OutputSpec, JobError> {
    let Some(first) = docs.first() else {
        return Err(ValidationError::NoInputs.into());
    };
    let first_path = first.path().to_path_buf();
    let total_pages: u32 = docs.iter().map(PdfDocument::page_count).sum();
    let file_count = docs.len();

    let mut sources = docs.into_iter().map(PdfDocument::into_document);
    let base = sources.next().ok_or(ValidationError::NoInputs)?;

    let mut merged = assemble::concatenate(base, sources).map_err(|e| JobError::Pdf {
        path: first_path.clone(),
        message: e.to_string(),
    })?;
    // Nothing is created on disk until the merged tree is built.
    let output = resolver.resolve_merge_file(&first_path, MERGE_LABEL)?;
    PdfDocument::save(&mut merged, output.path())?;

    tracing::info!(
        files = file_count,
        pages = total_pages,
        output = %output,
        "merged PDFs"
    );
    Ok(output)
}

/// Open `inputs` in order (fail-fast) and merge them.
pub fn merge_files<P: AsRef<Path>>(
    inputs: &[P],
    resolver: &OutputResolver,
) -> Result<OutputSpec, JobError> {
    if inputs.is_empty() {
        return Err(ValidationError::NoInputs.into());
    }

    // On error, handles opened so far are dropped with `docs`.
    let docs = inputs
        .iter()
        .map(PdfDocument::open)
        .collect::<Result<Vec<_>, _>>()?;

    merge(docs, resolver)
}
