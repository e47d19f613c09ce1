use std::path::{Path, PathBuf};

use crate::config::{get_config_path, load_config, save_config, ResolverConfig};
use crate::descriptor::{DescriptorCache, DescriptorReader, YamlDescriptorReader};
use crate::errors::{AntoraError, Result};
use crate::fs::DiskFs;
use crate::index::{DescriptorIndex, WalkDescriptorIndex};
use crate::resolution::AntoraResolver;
use crate::types::*;

/// A documentation project on disk together with its resolver configuration.
///
/// Owns the collaborators an [`AntoraResolver`] borrows; all entry points take
/// a document path or directory inside the project.
pub struct AntoraProject {
    config: ResolverConfig,
    project_root: PathBuf,
    fs: DiskFs,
    cache: DescriptorCache,
    fresh: YamlDescriptorReader,
    index: WalkDescriptorIndex,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl AntoraProject {
    /// Writes a default configuration for the project at `project_root` and
    /// opens it.
    pub fn init(project_root: &Path) -> Result<Self> {
        let config = ResolverConfig {
            root_dir: project_root.to_string_lossy().to_string(),
            ..ResolverConfig::default()
        };
        save_config(project_root, &config)?;
        Self::with_config(project_root, config)
    }

    /// Opens the project at `project_root`, using defaults when no
    /// configuration file exists.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        Self::with_config(project_root, config)
    }

    /// Opens the project with an explicit configuration.
    pub fn with_config(project_root: &Path, config: ResolverConfig) -> Result<Self> {
        if !project_root.is_dir() {
            return Err(AntoraError::File {
                message: "project root is not a directory".to_string(),
                path: project_root.display().to_string(),
            });
        }
        let index = WalkDescriptorIndex::new(project_root, config.clone());
        Ok(Self {
            config,
            project_root: project_root.to_path_buf(),
            fs: DiskFs,
            cache: DescriptorCache::new(),
            fresh: YamlDescriptorReader,
            index,
        })
    }

    /// Returns `true` if a configuration file exists under the given root.
    pub fn is_initialized(project_root: &Path) -> bool {
        get_config_path(project_root).exists()
    }

    /// Returns a resolver borrowing this project's collaborators.
    pub fn resolver(&self) -> AntoraResolver<'_> {
        let reader: &dyn DescriptorReader = if self.config.cache_descriptors {
            &self.cache
        } else {
            &self.fresh
        };
        AntoraResolver::new(&self.fs, reader, &self.index, &self.project_root)
    }

    /// Forgets the cached contents of one descriptor file.
    pub fn invalidate_descriptor(&self, file: &Path) {
        self.cache.invalidate(file);
    }

    /// Drops cached descriptors whose files are no longer in the project.
    /// Returns how many entries were dropped.
    pub fn prune_descriptor_cache(&self) -> Result<usize> {
        let live = self.index.descriptor_files()?;
        let dropped = self.cache.retain_files(&live);
        tracing::debug!(dropped, "descriptor cache pruned");
        Ok(dropped)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl AntoraProject {
    /// Module directory enclosing a document or directory.
    pub fn module_for(&self, path: &Path) -> Option<PathBuf> {
        self.resolver().locate_module(&start_dir(path))
    }

    /// Resolves `key` as written in the document at `path`.
    ///
    /// `default_family` overrides the configured default. Returns `key`
    /// unchanged when it cannot be resolved.
    pub fn replace_prefix(&self, path: &Path, key: &str, default_family: Option<Family>) -> String {
        let Some(module_dir) = self.module_for(path) else {
            tracing::debug!(path = %path.display(), "document is not inside an Antora module");
            return key.to_string();
        };
        let family = default_family.or(self.config.default_family);
        self.resolver().replace_prefix(&module_dir, key, family)
    }

    /// Resolves `key` to its family directory and remainder.
    pub fn resolve(&self, path: &Path, key: &str, default_family: Option<Family>) -> Option<ResolvedTarget> {
        let module_dir = self.module_for(path)?;
        let family = default_family.or(self.config.default_family);
        self.resolver().resolve(&module_dir, key, family)
    }

    /// Lists the prefixes available to the document at `path`.
    pub fn collect_prefixes(&self, path: &Path) -> Vec<AntoraModulePrefix> {
        match self.module_for(path) {
            Some(module_dir) => self.resolver().collect_prefixes(&module_dir),
            None => Vec::new(),
        }
    }

    /// Family directory for the document at `path`.
    pub fn family_dir(&self, path: &Path, family: Family) -> Option<PathBuf> {
        self.resolver().find_family_dir(&start_dir(path), family)
    }

    /// Family directory relative to the directory of the document at `path`.
    pub fn family_dir_relative(&self, path: &Path, family: Family) -> Option<String> {
        self.resolver().find_family_dir_relative(&start_dir(path), family)
    }

    /// REST Docs snippets directory for the document at `path`.
    pub fn rest_docs_snippets(&self, path: &Path) -> Option<PathBuf> {
        self.resolver().find_rest_docs_snippets(&start_dir(path))
    }
}

/// Directory to start upward searches from: the path itself, or its parent
/// for files.
fn start_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        path.to_path_buf()
    }
}
