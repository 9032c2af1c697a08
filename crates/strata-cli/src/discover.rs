//! Document discovery in an input directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use strata::{Document, StrataError};

/// Read every file in `dir` with the given extension, sorted by file name.
///
/// Subdirectories are not searched. A leading `.` on `extension` is ignored.
///
/// # Errors
///
/// Returns [`StrataError::Io`] if the directory cannot be listed or a
/// document cannot be read as UTF-8 text.
pub fn discover_documents(dir: &Path, extension: &str) -> Result<Vec<Document>, StrataError> {
    let extension = extension.trim_start_matches('.');

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension)
        })
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let documents = paths
        .iter()
        .map(|path| -> Result<Document, StrataError> {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = fs::read_to_string(path)?;
            debug!(document = name, bytes = text.len(); "Document read");
            Ok(Document::new(name, text))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        dir = dir.display().to_string(),
        extension = extension,
        documents = documents.len();
        "Documents discovered"
    );

    Ok(documents)
}
