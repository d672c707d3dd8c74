//! Directory listings used as the collector's extended data.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tree_collector::FetchError;

/// Name of a directory and the names of its immediate sub-directories.
///
/// Sub-directory names are kept as raw OS strings so child paths can be
/// rebuilt exactly, whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirInfo {
    pub name: String,
    pub sub_dirs: Vec<OsString>,
}

/// List the sub-directories of `path`.
///
/// Blocking; meant to run on a worker thread. Symbolic links to directories
/// are only listed when `follow_links` is set, since link cycles would make the
/// walk unbounded.
pub fn read_dir_info(path: &Path, follow_links: bool) -> Result<DirInfo, FetchError> {
    let mut sub_dirs = Vec::new();

    for entry in fs::read_dir(path).map_err(|e| path_error(path, e))? {
        let entry = entry.map_err(|e| path_error(path, e))?;
        let file_type = entry.file_type().map_err(|e| path_error(&entry.path(), e))?;

        let is_dir = if file_type.is_symlink() && follow_links {
            // Dangling links are skipped rather than failing the walk.
            fs::metadata(entry.path()).is_ok_and(|meta| meta.is_dir())
        } else {
            file_type.is_dir()
        };

        if is_dir {
            sub_dirs.push(entry.file_name());
        }
    }

    Ok(DirInfo {
        name: dir_name(path),
        sub_dirs,
    })
}

/// Child keys of a listed directory: `path/sub_dir`, in listing order.
#[allow(clippy::ptr_arg)]
pub fn for_each_sub_dir(path: &PathBuf, info: &DirInfo, child: &mut dyn FnMut(PathBuf)) {
    for sub_dir in &info.sub_dirs {
        child(path.join(sub_dir));
    }
}

/// Payload kept in the tree for a directory.
pub fn into_name(info: DirInfo) -> String {
    info.name
}

/// Last component of `path`, or the path itself when it has none (`.`, `/`).
fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert an I/O failure into a fetch error naming the offending path.
fn path_error(path: &Path, err: io::Error) -> FetchError {
    let msg = format!("{}: {}", path.display(), err);
    match err.kind() {
        io::ErrorKind::NotFound => FetchError::not_found(msg),
        _ => FetchError::io(msg),
    }
}
