use std::path::{Path, PathBuf};

use crate::descriptor::DescriptorReader;
use crate::fs::ProjectFs;
use crate::index::DescriptorIndex;
use crate::resolution::locate::descriptor_for_module;
use crate::resolution::proximity::rank_by_proximity;
use crate::types::{ModuleContext, Reference, MODULES_DIR};

/// Reads the identity of the module a resolution starts from.
///
/// Returns `None` when the enclosing component has no readable descriptor.
pub fn load_module_context(
    fs: &dyn ProjectFs,
    reader: &dyn DescriptorReader,
    module_dir: &Path,
) -> Option<ModuleContext> {
    let name = module_dir.file_name()?.to_string_lossy().to_string();
    let descriptor_file = descriptor_for_module(fs, module_dir)?;
    match reader.read_descriptor(fs, &descriptor_file) {
        Ok(component) => Some(ModuleContext {
            dir: module_dir.to_path_buf(),
            name,
            component,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "current component descriptor unreadable");
            None
        }
    }
}

/// Decides which module directory a parsed reference points at.
pub struct ComponentDisambiguator<'a> {
    fs: &'a dyn ProjectFs,
    reader: &'a dyn DescriptorReader,
    index: &'a dyn DescriptorIndex,
}

impl<'a> ComponentDisambiguator<'a> {
    pub fn new(
        fs: &'a dyn ProjectFs,
        reader: &'a dyn DescriptorReader,
        index: &'a dyn DescriptorIndex,
    ) -> Self {
        Self { fs, reader, index }
    }

    /// Resolves the target module, falling back to the current module when
    /// the reference cannot be resolved.
    pub fn resolve_target_module(&self, ctx: &ModuleContext, reference: &Reference) -> PathBuf {
        self.find_target_module(ctx, reference)
            .unwrap_or_else(|| ctx.dir.clone())
    }

    /// Resolves the target module, or `None` when a component search finds
    /// no matching module.
    ///
    /// Steps, in order:
    /// 1. A component equal to the current one is treated as unspecified.
    /// 2. Without a component, a module equal to the current one is unspecified.
    /// 3. A module without a component is looked up among sibling modules; if
    ///    there is none, the reference is taken to name a module of another
    ///    component with the same name, and the search widens to step 4.
    /// 4. With a component, descriptors are scanned nearest-first for the
    ///    same name and exactly the same version owning `modules/<module>`.
    pub fn find_target_module(&self, ctx: &ModuleContext, reference: &Reference) -> Option<PathBuf> {
        let mut component = reference.component.clone();
        let mut module = reference.module.clone();

        if component.as_deref() == Some(ctx.component.name.as_str()) {
            component = None;
        }
        if component.is_none() && module.as_deref() == Some(ctx.name.as_str()) {
            module = None;
        }

        if component.is_none() {
            if let Some(name) = module.as_deref() {
                let sibling = self
                    .fs
                    .parent(&ctx.dir)
                    .and_then(|modules| self.fs.find_dir(&modules, name));
                if let Some(dir) = sibling {
                    tracing::debug!(module = name, "resolved to sibling module");
                    return Some(dir);
                }
                // A same-named module may live in a different checkout of this component.
                tracing::debug!(module = name, "no sibling module, searching components");
                component = Some(ctx.component.name.clone());
            }
        }

        let Some(component) = component else {
            return Some(ctx.dir.clone());
        };
        let module = module
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| ctx.name.clone());
        self.search_component(ctx, &component, &module)
    }

    /// Scans all descriptors, nearest first, for `component` at the current
    /// version owning `modules/<module>`.
    fn search_component(&self, ctx: &ModuleContext, component: &str, module: &str) -> Option<PathBuf> {
        let files = match self.index.descriptor_files() {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "descriptor enumeration failed");
                return None;
            }
        };

        for file in rank_by_proximity(files, &ctx.dir) {
            if !self.index.is_in_scope(&file) {
                tracing::trace!(path = %file.display(), "descriptor out of scope");
                continue;
            }
            let descriptor = match self.reader.read_descriptor(self.fs, &file) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed descriptor");
                    continue;
                }
            };
            if descriptor.name != component || descriptor.version != ctx.component.version {
                continue;
            }
            let found = self
                .fs
                .parent(&file)
                .and_then(|root| self.fs.find_dir(&root, MODULES_DIR))
                .and_then(|modules| self.fs.find_dir(&modules, module));
            if let Some(dir) = found {
                tracing::debug!(
                    component,
                    module,
                    path = %dir.display(),
                    "resolved component module"
                );
                return Some(dir);
            }
        }

        tracing::debug!(component, module, version = %ctx.component.version, "no matching component module");
        None
    }
}
