use std::path::Path;

/// Load an optional free-text context file from the context directory.
///
/// Context files (ICP profile, positioning notes) are descriptive input
/// for future richer scoring; today they are loaded and reported but not
/// consumed by the scoring algorithm. Returns `None` when the file is
/// absent or unreadable — an unreadable context file is worth a warning,
/// never a failed run.
#[must_use]
pub fn load_context(dir: &Path, filename: &str) -> Option<String> {
    let path = dir.join(filename);
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read context file");
            None
        }
    }
}
