use crate::error::JobError;
use crate::output::{OutputResolver, OutputSpec};
use crate::page_range::PageSelection;
use crate::pdf::PdfDocument;

/// Which pages of a document get their own output file.
#[derive(Debug, Clone, Copy)]
pub enum PageScope<'a> {
    /// Split: every page.
    All,
    /// Extract: only pages in the selection.
    Selected(&'a PageSelection),
}

impl PageScope<'_> {
    fn includes(&self, ordinal: u32) -> bool {
        match self {
            PageScope::All => true,
            PageScope::Selected(selection) => selection.contains(ordinal),
        }
    }
}

/// Write each in-scope page of `doc` to its own file, in page order.
///
/// `on_written` is called once per file, right after it is saved. The
/// handle is released whether or not every page could be written.
pub fn run<F>(
    doc: PdfDocument,
    scope: PageScope<'_>,
    resolver: &OutputResolver,
    mut on_written: F,
) -> Result<Vec<OutputSpec>, JobError>
where
    F: FnMut(&OutputSpec),
{
    let pages = doc.page_ids();
    let total_pages = pages.len();
    let mut written = Vec::new();

    for (ordinal, page_id) in pages.into_iter().filter(|&(n, _)| scope.includes(n)) {
        let mut page_doc = doc.single_page(page_id)?;
        let output = resolver.resolve_page_file(doc.path(), ordinal)?;
        PdfDocument::save(&mut page_doc, output.path())?;

        tracing::info!(page = ordinal, output = %output, "wrote page");
        on_written(&output);
        written.push(output);
    }

    tracing::debug!(
        input = %doc.path().display(),
        pages = total_pages,
        written = written.len(),
        "finished document"
    );
    doc.close();
    Ok(written)
}
