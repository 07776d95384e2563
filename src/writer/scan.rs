use crate::error::{Result, WriterError};
use std::fs;
use std::path::Path;

/// Lists the regular files in `dir`, in directory read order (unsorted).
///
/// Directories, symlinks, devices, pipes, and sockets are skipped; symlinks
/// are not followed when classifying entries. Entries for which `filter`
/// returns false are excluded. With `names_only` each emitted string is the
/// bare file name, otherwise it is the absolute path of the entry.
///
/// The underlying platform call streams entries incrementally, so large
/// directories do not have to fit in memory at once.
pub fn list_regular(
    dir: &Path,
    filter: Option<&dyn Fn(&str) -> bool>,
    names_only: bool,
) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| WriterError::CannotOpen {
        path: dir.to_path_buf(),
        source,
    })?;

    let abs_dir = if names_only {
        None
    } else {
        Some(std::path::absolute(dir)?)
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        // Names that are not valid UTF-8 cannot carry a history tail.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };

        let emitted = match &abs_dir {
            None => name,
            Some(abs) => abs.join(&name).display().to_string(),
        };

        if let Some(filter) = filter {
            if !filter(&emitted) {
                continue;
            }
        }

        files.push(emitted);
    }

    Ok(files)
}
