//! Corpus store: source documents on the local filesystem.
//!
//! The documents directory is the sole store of truth; the vector index is
//! always derived from it. One file per document, filename as the display
//! identifier.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::PipelineError;

/// Lists the indexable documents in `docs_dir`, sorted by filename.
///
/// Only `.pdf` files count; other entries are ignored.
///
/// # Errors
/// Returns I/O errors from directory traversal.
pub fn list_documents(docs_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut docs = Vec::new();
    for entry in fs::read_dir(docs_dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        {
            docs.push(path);
        }
    }
    docs.sort();
    Ok(docs)
}

/// Display names (filenames) of the corpus documents, sorted.
///
/// # Errors
/// Returns I/O errors from directory traversal.
pub fn document_names(docs_dir: &Path) -> Result<Vec<String>, PipelineError> {
    Ok(list_documents(docs_dir)?
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect())
}

/// Brings a source file into the corpus store.
///
/// Returns the in-corpus path and whether a copy was made. A path that
/// already points at the stored file is left alone; copying a file onto
/// itself would truncate it to zero bytes.
///
/// # Errors
/// Returns I/O errors from path resolution or the copy.
pub fn import_document(docs_dir: &Path, src: &Path) -> Result<(PathBuf, bool), PipelineError> {
    let name = src
        .file_name()
        .ok_or_else(|| PipelineError::Config(format!("not a file path: {}", src.display())))?;
    let dest = docs_dir.join(name);

    if dest.exists() && fs::canonicalize(src)? == fs::canonicalize(&dest)? {
        return Ok((dest, false));
    }

    fs::copy(src, &dest)?;
    info!("imported document {}", name.to_string_lossy());
    Ok((dest, true))
}

/// Deletes the document named `name` from the corpus store.
///
/// Returns `false` when no such document exists. `name` must be a bare
/// filename; anything containing a path separator is rejected so a caller
/// cannot reach outside the corpus directory.
///
/// # Errors
/// Returns I/O errors from file removal.
pub fn remove_document(docs_dir: &Path, name: &str) -> Result<bool, PipelineError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Ok(false);
    }
    let path = docs_dir.join(name);
    if !path.is_file() {
        return Ok(false);
    }
    fs::remove_file(&path)?;
    info!("removed document {name}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_pdfs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let names = document_names(dir.path()).unwrap();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn remove_deletes_and_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.pdf"), b"x").unwrap();

        assert!(remove_document(dir.path(), "doc.pdf").unwrap());
        assert!(!dir.path().join("doc.pdf").exists());
        assert!(!remove_document(dir.path(), "doc.pdf").unwrap());
    }

    #[test]
    fn import_copies_external_files() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        let src = dir.path().join("manual.pdf");
        fs::write(&src, b"content").unwrap();

        let (dest, copied) = import_document(&docs, &src).unwrap();
        assert!(copied);
        assert_eq!(dest, docs.join("manual.pdf"));
        assert_eq!(fs::read(&dest).unwrap(), b"content");
    }

    #[test]
    fn import_of_stored_file_leaves_it_intact() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        let src = docs.join("manual.pdf");
        fs::write(&src, b"nineteen byte file!").unwrap();

        let (dest, copied) = import_document(&docs, &src).unwrap();
        assert!(!copied);
        assert_eq!(fs::read(&dest).unwrap(), b"nineteen byte file!");
    }

    #[test]
    fn remove_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!remove_document(dir.path(), "../doc.pdf").unwrap());
        assert!(!remove_document(dir.path(), "").unwrap());
    }
}
