use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{is_excluded, is_in_scope, ResolverConfig};
use crate::errors::{AntoraError, Result};
use crate::fs::to_slash;
use crate::types::ANTORA_YML;

/// Enumerates the component descriptors of a project.
pub trait DescriptorIndex: Send + Sync {
    /// All descriptor files in the project, in a stable order.
    fn descriptor_files(&self) -> Result<Vec<PathBuf>>;

    /// Whether a file belongs to the project's own sources (not a library,
    /// vendored, or excluded tree).
    fn is_in_scope(&self, file: &Path) -> bool;
}

/// `DescriptorIndex` that walks the project tree on disk.
pub struct WalkDescriptorIndex {
    project_root: PathBuf,
    config: ResolverConfig,
}

impl WalkDescriptorIndex {
    pub fn new(project_root: &Path, config: ResolverConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
        }
    }

    /// Whether a directory's whole subtree is excluded, so the walk can skip it.
    fn is_excluded_dir(&self, dir: &Path) -> bool {
        match dir.strip_prefix(&self.project_root) {
            Ok(relative) => is_excluded(&format!("{}/", to_slash(relative)), &self.config),
            Err(_) => false,
        }
    }
}

impl DescriptorIndex for WalkDescriptorIndex {
    fn descriptor_files(&self) -> Result<Vec<PathBuf>> {
        if !self.project_root.is_dir() {
            return Err(AntoraError::File {
                message: "project root is not a directory".to_string(),
                path: self.project_root.display().to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.project_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                // Hidden directories never hold components.
                if e.file_name().to_string_lossy().starts_with('.') {
                    return false;
                }
                !(e.file_type().is_dir() && self.is_excluded_dir(e.path()))
            })
        {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if entry.file_type().is_file() && entry.file_name() == OsStr::new(ANTORA_YML) {
                files.push(entry.into_path());
            }
        }
        tracing::debug!(count = files.len(), "descriptor files enumerated");
        Ok(files)
    }

    fn is_in_scope(&self, file: &Path) -> bool {
        match file.strip_prefix(&self.project_root) {
            Ok(relative) => is_in_scope(&to_slash(relative), &self.config),
            Err(_) => false,
        }
    }
}
