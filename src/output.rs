use crate::error::{Result, SplitError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write to a temp file next to `path`, sync it, then rename it into place.
/// With `overwrite == false` an existing `path` is reported as
/// [`SplitError::WriteConflict`] and left untouched.
pub fn write_atomically<F>(path: &Path, overwrite: bool, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    if !overwrite && path.exists() {
        return Err(SplitError::WriteConflict {
            path: path.to_path_buf(),
        });
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    write(&mut temp)?;
    temp.as_file().sync_all()?;

    let persisted = if overwrite {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };

    match persisted {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Err(SplitError::WriteConflict {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(SplitError::Io(e.error)),
    }
}
