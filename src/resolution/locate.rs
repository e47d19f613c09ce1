use std::path::{Path, PathBuf};

use crate::fs::ProjectFs;
use crate::types::{ANTORA_YML, MODULES_DIR};

/// Walks from `start` up to `boundary` (inclusive), calling `probe` at each level.
///
/// `probe` receives the directory and the number of levels climbed so far and
/// returns `Some` to stop the walk. The walk never goes above `boundary`; a
/// `start` outside `boundary` yields `None` without probing.
pub fn search_upward<T>(
    fs: &dyn ProjectFs,
    start: &Path,
    boundary: &Path,
    mut probe: impl FnMut(&Path, usize) -> Option<T>,
) -> Option<T> {
    if !start.starts_with(boundary) {
        tracing::debug!(
            start = %start.display(),
            boundary = %boundary.display(),
            "start directory outside project root"
        );
        return None;
    }

    let mut dir = start.to_path_buf();
    let mut levels = 0;
    loop {
        if let Some(found) = probe(&dir, levels) {
            return Some(found);
        }
        if dir == boundary {
            return None;
        }
        dir = fs.parent(&dir)?;
        levels += 1;
    }
}

/// Whether `dir` is a module directory: its parent is named `modules` and the
/// grandparent holds a component descriptor.
pub fn is_module_dir(fs: &dyn ProjectFs, dir: &Path) -> bool {
    let Some(parent) = fs.parent(dir) else {
        return false;
    };
    if parent.file_name().and_then(|n| n.to_str()) != Some(MODULES_DIR) {
        return false;
    }
    fs.parent(&parent)
        .and_then(|component_root| fs.find_file(&component_root, ANTORA_YML))
        .is_some()
}

/// Returns the component descriptor file owning a module directory.
pub fn descriptor_for_module(fs: &dyn ProjectFs, module_dir: &Path) -> Option<PathBuf> {
    let modules = fs.parent(module_dir)?;
    let component_root = fs.parent(&modules)?;
    fs.find_file(&component_root, ANTORA_YML)
}

/// Finds the nearest module directory enclosing `start_dir`.
pub fn locate_module(fs: &dyn ProjectFs, project_root: &Path, start_dir: &Path) -> Option<PathBuf> {
    search_upward(fs, start_dir, project_root, |dir, _| {
        is_module_dir(fs, dir).then(|| dir.to_path_buf())
    })
}

/// Finds the Spring REST Docs `generated-snippets` directory of the nearest
/// Maven or Gradle build enclosing `start_dir`.
pub fn find_rest_docs_snippets(
    fs: &dyn ProjectFs,
    project_root: &Path,
    start_dir: &Path,
) -> Option<PathBuf> {
    const BUILDS: [(&str, &str); 3] = [
        ("pom.xml", "target"),
        ("build.gradle", "build"),
        ("build.gradle.kts", "build"),
    ];

    search_upward(fs, start_dir, project_root, |dir, _| {
        BUILDS.iter().find_map(|(build_file, output_dir)| {
            fs.find_file(dir, build_file)?;
            let output = fs.find_dir(dir, output_dir)?;
            fs.find_dir(&output, "generated-snippets")
        })
    })
}
