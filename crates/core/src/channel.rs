//! Freeze channel: an open directory handle plus the `FIFREEZE`/`FITHAW`
//! control operations issued against it.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{FreezeError, Result};

#[cfg(target_os = "linux")]
mod sys {
    // <linux/fs.h>: _IOWR('X', 119, int) and _IOWR('X', 120, int)
    nix::ioctl_readwrite!(fifreeze, b'X', 119, nix::libc::c_int);
    nix::ioctl_readwrite!(fithaw, b'X', 120, nix::libc::c_int);
}

/// Something that can be frozen and thawed.
///
/// The controller only talks to targets through this trait, which keeps the
/// freeze/thaw/close sequencing testable without touching a real mount.
pub trait FreezeTarget {
    /// Path the target was opened from.
    fn path(&self) -> &Path;

    /// Suspend write activity on the filesystem backing this target.
    fn freeze(&self) -> Result<()>;

    /// Resume write activity on the filesystem backing this target.
    fn thaw(&self) -> Result<()>;

    /// Release the handle.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Read-only handle on a directory of the filesystem to control.
#[derive(Debug)]
pub struct Target {
    path: PathBuf,
    file: File,
}

impl Target {
    /// Open `path` read-only and check that it is a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FreezeError::open(path, e))?;
        let meta = file.metadata().map_err(|source| FreezeError::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(FreezeError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(path = %path.display(), "opened target");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    #[cfg(target_os = "linux")]
    fn control(
        &self,
        op: unsafe fn(nix::libc::c_int, *mut nix::libc::c_int) -> nix::Result<nix::libc::c_int>,
    ) -> std::io::Result<()> {
        use std::os::fd::AsRawFd;

        let mut arg: nix::libc::c_int = 0;
        // SAFETY: the fd is owned by `self.file` and stays open for the call;
        // the kernel ignores the argument for both requests.
        unsafe { op(self.file.as_raw_fd(), &mut arg) }?;
        Ok(())
    }
}

#[cfg(target_os = "linux")]
impl FreezeTarget for Target {
    fn path(&self) -> &Path {
        &self.path
    }

    fn freeze(&self) -> Result<()> {
        self.control(sys::fifreeze)
            .map_err(|source| FreezeError::FreezeFailed {
                path: self.path.clone(),
                source,
            })
    }

    fn thaw(&self) -> Result<()> {
        self.control(sys::fithaw)
            .map_err(|source| FreezeError::UnfreezeFailed {
                path: self.path.clone(),
                source,
            })
    }

    fn close(self) {
        tracing::debug!(path = %self.path.display(), "released target");
        drop(self.file);
    }
}

#[cfg(not(target_os = "linux"))]
impl FreezeTarget for Target {
    fn path(&self) -> &Path {
        &self.path
    }

    fn freeze(&self) -> Result<()> {
        Err(FreezeError::Unsupported {
            path: self.path.clone(),
        })
    }

    fn thaw(&self) -> Result<()> {
        Err(FreezeError::Unsupported {
            path: self.path.clone(),
        })
    }
}
