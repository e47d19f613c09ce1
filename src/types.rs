use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fs::to_slash;

/// File name of the component descriptor found at every component root.
pub const ANTORA_YML: &str = "antora.yml";

/// Name of the directory that holds a component's modules.
pub const MODULES_DIR: &str = "modules";

/// Resource families an Antora module can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Example,
    Attachment,
    Partial,
    Image,
    Page,
}

#[allow(clippy::should_implement_trait)]
impl Family {
    /// All families, in the order they are listed by Antora.
    pub const ALL: [Family; 5] = [
        Family::Example,
        Family::Attachment,
        Family::Partial,
        Family::Image,
        Family::Page,
    ];

    /// Returns the tag written before `$` in a reference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Example => "example",
            Family::Attachment => "attachment",
            Family::Partial => "partial",
            Family::Image => "image",
            Family::Page => "page",
        }
    }

    /// Parses a family tag, returning `None` for anything outside the closed set.
    pub fn from_str(s: &str) -> Option<Family> {
        match s {
            "example" => Some(Family::Example),
            "attachment" => Some(Family::Attachment),
            "partial" => Some(Family::Partial),
            "image" => Some(Family::Image),
            "page" => Some(Family::Page),
            _ => None,
        }
    }

    /// Conventional directory name for the family (`image` -> `images`).
    pub fn dir_name(&self) -> &'static str {
        match self {
            Family::Example => "examples",
            Family::Attachment => "attachments",
            Family::Partial => "partials",
            Family::Image => "images",
            Family::Page => "pages",
        }
    }

    /// Directory layouts probed inside a module dir, in priority order.
    ///
    /// Each candidate is a chain of child names starting at the module dir.
    pub fn candidates(&self) -> &'static [&'static [&'static str]] {
        match self {
            Family::Example => &[&["examples"]],
            Family::Attachment => &[&["assets", "attachments"], &["attachments"]],
            Family::Partial => &[&["partials"], &["pages", "_partials"]],
            Family::Image => &[&["assets", "images"], &["images"]],
            Family::Page => &[&["pages"]],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, not yet resolved reference.
///
/// When `component` is present, `module` was captured by the same match
/// (possibly as an empty string).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub component: Option<String>,
    pub module: Option<String>,
    pub family: Option<Family>,
    /// Text following the prefix, appended to the family directory.
    pub remainder: String,
}

/// Contents of a component descriptor (`antora.yml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    pub version: String,
    pub title: Option<String>,
    pub display_version: Option<String>,
    pub start_page: Option<String>,
}

/// Identity of the module a resolution starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    /// The module directory (`<component>/modules/<name>`).
    pub dir: PathBuf,
    /// The module directory name.
    pub name: String,
    /// Descriptor of the enclosing component.
    pub component: ComponentDescriptor,
}

/// A family directory plus the remainder to append to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub family: Family,
    pub module_dir: PathBuf,
    pub family_dir: PathBuf,
    pub remainder: String,
}

impl ResolvedTarget {
    /// Builds the final forward-slash path: family dir, then `/remainder` if any.
    pub fn to_path_string(&self) -> String {
        let dir = to_slash(&self.family_dir);
        if self.remainder.is_empty() {
            dir
        } else {
            format!("{}/{}", dir, self.remainder)
        }
    }
}

/// A prefix a user could type to address a module, with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntoraModulePrefix {
    /// One of `module:`, `component::`, or `component:module:`.
    pub prefix: String,
    pub component: String,
    pub module: String,
    pub title: Option<String>,
    pub module_dir: PathBuf,
}

impl AntoraModulePrefix {
    pub fn new(
        prefix: String,
        component: &str,
        module: &str,
        title: Option<String>,
        module_dir: &Path,
    ) -> Self {
        Self {
            prefix,
            component: component.to_string(),
            module: module.to_string(),
            title,
            module_dir: module_dir.to_path_buf(),
        }
    }
}
