//! Output writer: replace whatever is at the destination with new bytes.
//!
//! An existing file is removed first, then the new one is created
//! owner-read-only. This is remove-then-write, not an atomic replace: a
//! failure halfway through can leave the destination missing or truncated.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Permission bits for written files: owner read, nothing else.
pub const OUTPUT_MODE: u32 = 0o400;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("error removing {}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error writing out resized image to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write `bytes` to `path`, replacing an existing file.
pub fn write(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    if fs::symlink_metadata(path).is_ok() {
        tracing::info!(path = %path.display(), "output file exists, removing");
        fs::remove_file(path).map_err(|source| WriteError::Remove {
            path: path.to_path_buf(),
            source,
        })?;
    }

    write_read_only(path, bytes).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn write_read_only(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(OUTPUT_MODE)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_read_only(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)?;
    let mut permissions = file.metadata()?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions)
}
