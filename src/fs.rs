use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AntoraError, Result};

/// Whether a directory entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A single child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// The final path component as a string.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Read-only view of the project tree the resolver walks.
///
/// Implementations must present a consistent snapshot for the duration of
/// one resolution call.
pub trait ProjectFs: Send + Sync {
    /// Looks up a direct child of `dir` by name.
    fn find_child(&self, dir: &Path, name: &str) -> Option<Entry>;

    /// Lists the direct children of `dir`, sorted by name.
    fn list_children(&self, dir: &Path) -> Vec<Entry>;

    /// Reads a file's contents as UTF-8.
    fn read_to_string(&self, file: &Path) -> Result<String>;

    /// Parent directory, or `None` at the filesystem root.
    fn parent(&self, dir: &Path) -> Option<PathBuf> {
        dir.parent().map(Path::to_path_buf)
    }

    /// Looks up a child directory by name, ignoring files.
    fn find_dir(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        self.find_child(dir, name)
            .filter(Entry::is_dir)
            .map(|e| e.path)
    }

    /// Looks up a child file by name, ignoring directories.
    fn find_file(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        self.find_child(dir, name)
            .filter(Entry::is_file)
            .map(|e| e.path)
    }
}

/// `ProjectFs` backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl ProjectFs for DiskFs {
    fn find_child(&self, dir: &Path, name: &str) -> Option<Entry> {
        if !is_plain_name(name) {
            return None;
        }
        let path = dir.join(name);
        let metadata = fs::metadata(&path).ok()?;
        let kind = if metadata.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Some(Entry { path, kind })
    }

    fn list_children(&self, dir: &Path) -> Vec<Entry> {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(_) => return Vec::new(),
        };
        let mut children: Vec<Entry> = read_dir
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                let metadata = fs::metadata(&path).ok()?;
                let kind = if metadata.is_dir() {
                    EntryKind::Dir
                } else {
                    EntryKind::File
                };
                Some(Entry { path, kind })
            })
            .collect();
        children.sort_by(|a, b| a.path.cmp(&b.path));
        children
    }

    fn read_to_string(&self, file: &Path) -> Result<String> {
        fs::read_to_string(file).map_err(|e| AntoraError::File {
            message: format!("failed to read file: {}", e),
            path: file.display().to_string(),
        })
    }
}

/// A name that addresses exactly one child: non-empty, no separators, not `.`/`..`.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Renders a path with forward slashes regardless of host conventions.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
