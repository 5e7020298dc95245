//! Page-oriented document text extraction.
//!
//! Produces one plain-text string per document with a page-number marker line
//! before each page's content, so retrieval hits can be traced back to a page.

use std::path::Path;

use tracing::debug;

use crate::errors::IndexError;

/// Extracts plain text from a PDF, preserving page boundaries.
///
/// Output layout per page: a `Page N` marker line, then the page text, then a
/// blank line.
///
/// # Errors
/// Returns [`IndexError::Load`] if the file cannot be opened or parsed. The
/// caller should surface this as an ingestion failure for that document, not
/// crash the process.
pub fn load_document(path: &Path) -> Result<String, IndexError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| IndexError::Load(format!("{}: {e}", path.display())))?;

    debug!("loaded {} pages from {}", pages.len(), path.display());

    let mut text = String::new();
    for (page_num, page) in pages.iter().enumerate() {
        text.push_str(&format!("\nPage {} \n", page_num + 1));
        text.push_str(page);
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_document(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, IndexError::Load(_)));
    }
}
