use crate::error::{Result, SplitError};
use crate::output::write_atomically;
use crate::pdf::outline::{extract_outline_from_doc, OutlineNode};
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = Document::load(&path).map_err(|source| SplitError::DocumentOpen {
            path: path.clone(),
            source,
        })?;
        Ok(PdfDocument { doc, path })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    pub fn outline_roots(&self) -> Result<Vec<OutlineNode>> {
        let roots = extract_outline_from_doc(&self.doc)?;
        if roots.is_empty() {
            tracing::debug!(path = %self.path.display(), "document has no outline");
        }
        Ok(roots)
    }

    /// Copy pages `start..=end` (1-based) into a new document, keeping their
    /// order. The source outline is dropped since its entries would point at
    /// pages that no longer exist.
    pub fn extract_page_range(&self, start: u32, end: u32) -> Result<Document> {
        let total = self.page_count();
        if start == 0 || start > end || end > total {
            return Err(SplitError::Extract { start, end, total });
        }

        let mut new_doc = self.doc.clone();

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| *num < start || *num > end)
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        if let Ok(catalog) = new_doc.catalog_mut() {
            catalog.remove(b"Outlines");
        }

        new_doc.prune_objects();
        new_doc.compress();

        Ok(new_doc)
    }
}

/// Write `doc` to `path` via a temporary file in the same directory, so a
/// failed save never leaves a truncated PDF behind.
pub fn save_document<P: AsRef<Path>>(doc: &mut Document, path: P, overwrite: bool) -> Result<()> {
    let path = path.as_ref();
    write_atomically(path, overwrite, |file| {
        doc.save_to(file).map_err(|source| SplitError::Save {
            path: path.to_path_buf(),
            source: lopdf::Error::IO(source),
        })
    })
}
