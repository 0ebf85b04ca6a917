pub mod assemble;
pub mod document;
#[cfg(test)]
pub mod fixtures;

pub use document::PdfDocument;
