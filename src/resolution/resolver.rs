use std::path::{Path, PathBuf};

use crate::descriptor::DescriptorReader;
use crate::fs::ProjectFs;
use crate::index::DescriptorIndex;
use crate::resolution::collect::PrefixCollector;
use crate::resolution::disambiguate::{load_module_context, ComponentDisambiguator};
use crate::resolution::family::{find_family_dir, find_family_dir_relative, resolve_family_dir};
use crate::resolution::locate::{find_rest_docs_snippets, locate_module};
use crate::resolution::prefix;
use crate::types::*;

/// Resolves Antora resource references against a project tree.
///
/// Holds only shared borrows of its collaborators, so one resolver can serve
/// many threads as long as the filesystem view stays consistent per call.
pub struct AntoraResolver<'a> {
    fs: &'a dyn ProjectFs,
    reader: &'a dyn DescriptorReader,
    index: &'a dyn DescriptorIndex,
    project_root: &'a Path,
}

impl<'a> AntoraResolver<'a> {
    pub fn new(
        fs: &'a dyn ProjectFs,
        reader: &'a dyn DescriptorReader,
        index: &'a dyn DescriptorIndex,
        project_root: &'a Path,
    ) -> Self {
        Self {
            fs,
            reader,
            index,
            project_root,
        }
    }

    /// Finds the module directory enclosing `start_dir`.
    pub fn locate_module(&self, start_dir: &Path) -> Option<PathBuf> {
        locate_module(self.fs, self.project_root, start_dir)
    }

    /// Reads the identity of `module_dir` and its component.
    pub fn module_context(&self, module_dir: &Path) -> Option<ModuleContext> {
        load_module_context(self.fs, self.reader, module_dir)
    }

    /// Resolves `key` as seen from `module_dir` into a family directory plus
    /// remainder.
    ///
    /// Returns `None` when the key carries no family tag and no default is
    /// given, when the current component's descriptor is unreadable, when no
    /// target module is found, or when the target has no such family directory.
    pub fn resolve(
        &self,
        module_dir: &Path,
        key: &str,
        default_family: Option<Family>,
    ) -> Option<ResolvedTarget> {
        let reference = prefix::parse(key);
        let Some(family) = reference.family.or(default_family) else {
            tracing::debug!(key, "no family tag and no default family");
            return None;
        };

        let ctx = self.module_context(module_dir)?;
        let disambiguator = ComponentDisambiguator::new(self.fs, self.reader, self.index);
        let target_module = disambiguator.find_target_module(&ctx, &reference)?;

        let Some(family_dir) = find_family_dir(self.fs, self.project_root, &target_module, family)
        else {
            tracing::debug!(
                key,
                family = %family,
                module = %target_module.display(),
                "no family directory"
            );
            return None;
        };

        Some(ResolvedTarget {
            family,
            module_dir: target_module,
            family_dir,
            remainder: reference.remainder,
        })
    }

    /// Replaces the Antora prefix of `key` with the resolved directory path.
    ///
    /// Any failure returns `key` unchanged.
    pub fn replace_prefix(&self, module_dir: &Path, key: &str, default_family: Option<Family>) -> String {
        match self.resolve(module_dir, key, default_family) {
            Some(target) => target.to_path_string(),
            None => key.to_string(),
        }
    }

    /// Resolves only the `component:module:` / `module:` part of `key` to a
    /// module directory, falling back to `module_dir`.
    pub fn resolve_module_prefix(&self, module_dir: &Path, key: &str) -> PathBuf {
        let reference = prefix::parse(key);
        self.resolve_target_module(module_dir, &reference)
    }

    /// Resolves the module a parsed reference points at, falling back to
    /// `module_dir` on any unresolvable step.
    pub fn resolve_target_module(&self, module_dir: &Path, reference: &Reference) -> PathBuf {
        match self.module_context(module_dir) {
            Some(ctx) => ComponentDisambiguator::new(self.fs, self.reader, self.index)
                .resolve_target_module(&ctx, reference),
            None => module_dir.to_path_buf(),
        }
    }

    /// Lists the prefixes reachable from `module_dir`.
    pub fn collect_prefixes(&self, module_dir: &Path) -> Vec<AntoraModulePrefix> {
        match self.module_context(module_dir) {
            Some(ctx) => PrefixCollector::new(self.fs, self.reader, self.index).collect_prefixes(&ctx),
            None => Vec::new(),
        }
    }

    /// Family directory of a single module.
    pub fn resolve_family_dir(&self, module_dir: &Path, family: Family) -> Option<PathBuf> {
        resolve_family_dir(self.fs, module_dir, family)
    }

    /// Family directory of the nearest enclosing module that has one.
    pub fn find_family_dir(&self, start_dir: &Path, family: Family) -> Option<PathBuf> {
        find_family_dir(self.fs, self.project_root, start_dir, family)
    }

    /// Family directory relative to `start_dir`.
    pub fn find_family_dir_relative(&self, start_dir: &Path, family: Family) -> Option<String> {
        find_family_dir_relative(self.fs, self.project_root, start_dir, family)
    }

    /// Spring REST Docs snippets directory for `start_dir`.
    pub fn find_rest_docs_snippets(&self, start_dir: &Path) -> Option<PathBuf> {
        find_rest_docs_snippets(self.fs, self.project_root, start_dir)
    }
}
