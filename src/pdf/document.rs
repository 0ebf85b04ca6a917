use crate::error::JobError;
use crate::pdf::assemble;
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

/// An opened PDF. Released when closed or dropped.
pub struct PdfDocument {
    pub doc: Document,
    path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let path = path.as_ref().to_path_buf();
        let doc = Document::load(&path).map_err(|source| JobError::Open {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), pages = doc.get_pages().len(), "opened PDF");
        Ok(PdfDocument { doc, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// 1-based ordinals and page object IDs, in page order
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        // get_pages is a BTreeMap keyed by ordinal
        self.doc.get_pages().into_iter().collect()
    }

    /// Page object for a 0-based index.
    pub fn page(&self, index: u32) -> Result<ObjectId, JobError> {
        let pages = self.page_ids();
        pages
            .get(index as usize)
            .map(|&(_, id)| id)
            .ok_or_else(|| JobError::Pdf {
                path: self.path.clone(),
                message: format!("page index {} out of bounds (0..{})", index, pages.len()),
            })
    }

    /// New document holding only `page_id` and what it references.
    pub fn single_page(&self, page_id: ObjectId) -> Result<Document, JobError> {
        tracing::debug!(object = ?page_id, "extracting page");
        assemble::single_page(&self.doc, page_id).map_err(|e| JobError::Pdf {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    #[cfg(test)]
    pub fn from_document(doc: Document, path: impl Into<PathBuf>) -> Self {
        PdfDocument {
            doc,
            path: path.into(),
        }
    }

    /// Release the handle, keeping the parsed document.
    pub fn into_document(self) -> Document {
        tracing::debug!(path = %self.path.display(), "closed PDF");
        self.doc
    }

    pub fn close(self) {
        tracing::debug!(path = %self.path.display(), "closed PDF");
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<(), JobError> {
        doc.save(&path).map_err(|e| JobError::Write {
            path: path.as_ref().to_path_buf(),
            source: e.into(),
        })?;
        Ok(())
    }
}
