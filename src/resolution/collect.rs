use std::collections::HashMap;

use crate::descriptor::DescriptorReader;
use crate::fs::ProjectFs;
use crate::index::DescriptorIndex;
use crate::resolution::prefix::is_valid_module_name;
use crate::resolution::proximity::rank_by_proximity;
use crate::types::{AntoraModulePrefix, ModuleContext, MODULES_DIR};

/// Enumerates the prefixes reachable from a module.
pub struct PrefixCollector<'a> {
    fs: &'a dyn ProjectFs,
    reader: &'a dyn DescriptorReader,
    index: &'a dyn DescriptorIndex,
}

impl<'a> PrefixCollector<'a> {
    pub fn new(
        fs: &'a dyn ProjectFs,
        reader: &'a dyn DescriptorReader,
        index: &'a dyn DescriptorIndex,
    ) -> Self {
        Self { fs, reader, index }
    }

    /// Lists every prefix for modules of components at the current version,
    /// nearest component first.
    ///
    /// Each module yields `module:` when it belongs to the current component,
    /// `component::` when it shares the current module's name in another
    /// component, and always `component:module:`. Entries without a title get
    /// the first title seen for their component.
    pub fn collect_prefixes(&self, ctx: &ModuleContext) -> Vec<AntoraModulePrefix> {
        let files = match self.index.descriptor_files() {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "descriptor enumeration failed");
                return Vec::new();
            }
        };

        let mut result = Vec::new();
        let mut component_titles: HashMap<String, String> = HashMap::new();

        for file in rank_by_proximity(files, &ctx.dir) {
            if !self.index.is_in_scope(&file) {
                continue;
            }
            let descriptor = match self.reader.read_descriptor(self.fs, &file) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed descriptor");
                    continue;
                }
            };
            if descriptor.version != ctx.component.version {
                continue;
            }
            if let Some(title) = &descriptor.title {
                component_titles
                    .entry(descriptor.name.clone())
                    .or_insert_with(|| title.clone());
            }

            let Some(modules_dir) = self
                .fs
                .parent(&file)
                .and_then(|root| self.fs.find_dir(&root, MODULES_DIR))
            else {
                continue;
            };

            let same_component = descriptor.name == ctx.component.name;
            for module in self.fs.list_children(&modules_dir) {
                if !module.is_dir() {
                    continue;
                }
                let module_name = module.name();
                if !is_valid_module_name(&module_name) {
                    continue;
                }
                let mut push = |prefix: String| {
                    result.push(AntoraModulePrefix::new(
                        prefix,
                        &descriptor.name,
                        &module_name,
                        descriptor.title.clone(),
                        &module.path,
                    ));
                };
                if same_component {
                    push(format!("{}:", module_name));
                } else if module_name == ctx.name {
                    push(format!("{}::", descriptor.name));
                }
                push(format!("{}:{}:", descriptor.name, module_name));
            }
        }

        for prefix in &mut result {
            if prefix.title.is_none() {
                prefix.title = component_titles.get(&prefix.component).cloned();
            }
        }

        tracing::debug!(count = result.len(), "prefixes collected");
        result
    }
}
