use std::path::{Path, PathBuf};

use crate::fs::ProjectFs;
use crate::resolution::locate::{is_module_dir, search_upward};
use crate::types::Family;

/// Probes the family's candidate layouts inside one module directory.
///
/// Returns the first existing directory together with the chain of names
/// that led to it.
fn probe_module(
    fs: &dyn ProjectFs,
    module_dir: &Path,
    family: Family,
) -> Option<(PathBuf, &'static [&'static str])> {
    family.candidates().iter().find_map(|chain| {
        let dir = chain
            .iter()
            .try_fold(module_dir.to_path_buf(), |dir, name| fs.find_dir(&dir, name))?;
        Some((dir, *chain))
    })
}

/// Finds the family directory of a module.
///
/// `attachment` and `image` prefer `assets/<family>s` over `<family>s`;
/// `partial` falls back to `pages/_partials`. `None` is a normal outcome.
pub fn resolve_family_dir(fs: &dyn ProjectFs, module_dir: &Path, family: Family) -> Option<PathBuf> {
    probe_module(fs, module_dir, family).map(|(dir, _)| dir)
}

/// Finds the family directory of the nearest module enclosing `start_dir`
/// that has one, walking no higher than `project_root`.
pub fn find_family_dir(
    fs: &dyn ProjectFs,
    project_root: &Path,
    start_dir: &Path,
    family: Family,
) -> Option<PathBuf> {
    search_upward(fs, start_dir, project_root, |dir, _| {
        if !is_module_dir(fs, dir) {
            return None;
        }
        resolve_family_dir(fs, dir, family)
    })
}

/// Like [`find_family_dir`], but returns the directory relative to
/// `start_dir`, using one `../` per level climbed.
pub fn find_family_dir_relative(
    fs: &dyn ProjectFs,
    project_root: &Path,
    start_dir: &Path,
    family: Family,
) -> Option<String> {
    search_upward(fs, start_dir, project_root, |dir, levels| {
        if !is_module_dir(fs, dir) {
            return None;
        }
        let (_, chain) = probe_module(fs, dir, family)?;
        Some(relative_path(levels, chain))
    })
}

fn relative_path(levels: usize, chain: &[&str]) -> String {
    format!("{}{}", "../".repeat(levels), chain.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_without_climbing() {
        assert_eq!(relative_path(0, &["assets", "images"]), "assets/images");
    }

    #[test]
    fn test_relative_path_climbs_per_level() {
        assert_eq!(relative_path(2, &["images"]), "../../images");
    }
}
