use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias using `FreezeError`.
pub type Result<T> = std::result::Result<T, FreezeError>;

/// Failures raised while opening, freezing or thawing a target.
#[derive(Debug, Error)]
pub enum FreezeError {
    /// Target path does not exist.
    #[error("cannot open {}: no such file or directory", path.display())]
    NotFound { path: PathBuf },
    /// Caller may not open the target path.
    #[error("cannot open {}: permission denied", path.display())]
    PermissionDenied { path: PathBuf },
    /// Any other failure to open the target path.
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    /// The opened handle could not be inspected.
    #[error("stat failed {}: {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },
    /// Target is not a directory.
    #[error("{}: is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    /// Kernel rejected the freeze request.
    #[error("{}: freeze failed: {source}", path.display())]
    FreezeFailed { path: PathBuf, source: io::Error },
    /// Kernel rejected the thaw request.
    #[error("{}: unfreeze failed: {source}", path.display())]
    UnfreezeFailed { path: PathBuf, source: io::Error },
    /// Freeze control is not available on this platform.
    #[error("{}: filesystem freeze is only available on Linux", path.display())]
    Unsupported { path: PathBuf },
}

impl FreezeError {
    /// Classify an `open(2)` failure for `path`.
    pub(crate) fn open(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Open { path, source: err },
        }
    }
}
