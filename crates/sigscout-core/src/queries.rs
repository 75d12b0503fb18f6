use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// On-disk shape of `queries/{platform}.yaml`.
///
/// Only the `active` list is read; authors keep retired queries under
/// other keys without affecting a run.
#[derive(Debug, Default, Deserialize)]
struct QueriesFile {
    #[serde(default)]
    active: Vec<String>,
}

/// Load the active query list for a platform from `{dir}/{platform}.yaml`.
///
/// A missing file means the platform has no queries configured and yields
/// an empty list, not an error. Blank entries are dropped.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if it is not valid YAML. Both are fatal for the
/// affected platform only; callers log and skip.
pub fn load_queries(dir: &Path, platform: &str) -> Result<Vec<String>, ConfigError> {
    let path = dir.join(format!("{platform}.yaml"));
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: QueriesFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(file
        .active
        .into_iter()
        .filter(|q| !q.trim().is_empty())
        .collect())
}
