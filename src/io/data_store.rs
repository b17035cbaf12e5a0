use std::fs;
use std::path::{Path, PathBuf};

/// Name of the directory searched for when no data location is given
pub const DATA_DIR_NAME: &str = ".task";

/// Error type for locating and opening task data
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("no task data found: pass --data, set TASKDATA, or create a .task/ directory")]
    NotFound,
    #[error("cannot initialize data store at {path}: {source}")]
    CannotInitialize {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// What opening a data location found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// The location existed; query it as usual
    Loaded,
    /// The location was missing and has been created empty
    InitializedEmpty,
}

/// Walk up from `start` looking for a `.task/` directory.
pub fn discover_data_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Pick the data location: an explicit path wins, then the environment,
/// then discovery from the working directory.
pub fn locate(explicit: Option<&Path>, env: Option<PathBuf>, cwd: &Path) -> Result<PathBuf, DataError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    discover_data_dir(cwd).ok_or(DataError::NotFound)
}

/// Open the data directory, creating it when missing.
pub fn open_store(path: &Path) -> Result<StoreState, DataError> {
    if path.is_dir() {
        return Ok(StoreState::Loaded);
    }
    if path.exists() {
        return Err(DataError::Unreadable {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    fs::create_dir_all(path).map_err(|e| DataError::CannotInitialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(StoreState::InitializedEmpty)
}
