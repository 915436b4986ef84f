//! Atomic JSON file writes.
//!
//! Readers of the files written here must never observe a half-written
//! document: content goes to a sibling temp file first and is then renamed
//! over the destination.

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use {serde::Serialize, tracing::debug};

use crate::error::{Error, Result};

/// Render `value` as 2-space indented JSON followed by a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Serialize `value` and atomically replace `dest` with it.
///
/// Parent directories are created as needed. When `owner_only` is set the
/// file is restricted to `0600` before it becomes visible (Unix only).
pub fn write_json_atomic<T: Serialize + ?Sized>(
    dest: &Path,
    value: &T,
    owner_only: bool,
) -> Result<()> {
    let json = to_pretty_json(value)?;
    write_atomic(dest, json.as_bytes(), owner_only)
}

/// Atomically replace `dest` with `contents`.
pub fn write_atomic(dest: &Path, contents: &[u8], owner_only: bool) -> Result<()> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_sibling(dest)?;
    let written = (|| -> Result<()> {
        let mut file = create_temp(&tmp, owner_only)?;
        file.write_all(contents)?;
        file.sync_all()?;
        std::fs::rename(&tmp, dest)?;
        Ok(())
    })();

    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written?;

    debug!(path = %dest.display(), bytes = contents.len(), "wrote file atomically");
    Ok(())
}

/// Create `path`, failing if it already exists. With `owner_only` the file is
/// `0600` from the moment it exists (Unix only).
fn create_temp(path: &Path, owner_only: bool) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    if owner_only {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        // The umask can only clear bits; pin the exact mode.
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        return Ok(file);
    }
    #[cfg(not(unix))]
    let _ = owner_only;

    options.open(path)
}

/// `.<name>.tmp-<nanos>` next to `dest`, so the final rename never crosses
/// filesystems.
fn temp_sibling(dest: &Path) -> Result<PathBuf> {
    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::message(format!("{} has no file name", dest.display())))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    Ok(dest.with_file_name(format!(".{file_name}.tmp-{nanos}")))
}
