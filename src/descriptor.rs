//! Reading component descriptors (`antora.yml`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use regex::Regex;
use serde_yaml::Value;
use sha2::{Digest, Sha256};

use crate::errors::{AntoraError, Result};
use crate::fs::ProjectFs;
use crate::types::ComponentDescriptor;

/// Marker Antora uses for a component without a version.
pub const UNVERSIONED: &str = "~";

/// Top-level `version:` scalar as written, up to whitespace or a comment.
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^version:[ \t]*([^\s#]+)").expect("static regex"));

/// Source of parsed component descriptors.
pub trait DescriptorReader: Send + Sync {
    /// Reads and parses the descriptor at `file`.
    fn read_descriptor(&self, fs: &dyn ProjectFs, file: &Path) -> Result<ComponentDescriptor>;
}

/// Reads descriptors from the filesystem on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDescriptorReader;

impl DescriptorReader for YamlDescriptorReader {
    fn read_descriptor(&self, fs: &dyn ProjectFs, file: &Path) -> Result<ComponentDescriptor> {
        let text = fs.read_to_string(file)?;
        parse_descriptor(&text, file)
    }
}

/// Parses descriptor text. `name` and `version` are required.
pub fn parse_descriptor(text: &str, path: &Path) -> Result<ComponentDescriptor> {
    let malformed = |message: &str| AntoraError::Descriptor {
        message: message.to_string(),
        path: path.display().to_string(),
    };

    let doc: Value = serde_yaml::from_str(text).map_err(|e| AntoraError::Descriptor {
        message: format!("invalid yaml: {}", e),
        path: path.display().to_string(),
    })?;
    let map = doc
        .as_mapping()
        .ok_or_else(|| malformed("descriptor is not a mapping"))?;

    let name = map
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| malformed("missing component name"))?
        .to_string();

    let version = match map.get("version") {
        None => return Err(malformed("missing component version")),
        Some(v) => version_text(v, text).ok_or_else(|| {
            malformed("version must be a string or a plain decimal integer")
        })?,
    };

    Ok(ComponentDescriptor {
        name,
        version,
        title: optional_string(map.get("title")),
        display_version: optional_string(map.get("display_version")),
        start_page: optional_string(map.get("start_page")),
    })
}

/// Text of the `version` value exactly as written; null becomes the
/// unversioned marker.
///
/// Numbers lose their spelling once parsed (`1.10` reads as `1.1`), so only
/// integers whose written token is their decimal rendering are accepted.
fn version_text(value: &Value, text: &str) -> Option<String> {
    match value {
        Value::Null => Some(UNVERSIONED.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            let rendered = n.to_string();
            let written = VERSION_TOKEN.captures(text)?.get(1)?.as_str();
            (written == rendered).then_some(rendered)
        }
        _ => None,
    }
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Compute SHA-256 content hash of descriptor text.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

struct CachedDescriptor {
    hash: String,
    descriptor: Arc<ComponentDescriptor>,
}

/// Descriptor reader that skips reparsing unchanged files.
///
/// Every lookup still reads the file; the parsed value is reused only when
/// the content hash matches, so a changed descriptor is never served stale.
/// Entries for deleted files linger until the next lookup of that path;
/// long-lived hosts drop them with [`invalidate`](Self::invalidate) or
/// [`retain_files`](Self::retain_files).
#[derive(Default)]
pub struct DescriptorCache {
    entries: DashMap<PathBuf, CachedDescriptor>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor for `file`, reparsing only if its contents changed.
    pub fn get(&self, fs: &dyn ProjectFs, file: &Path) -> Result<Arc<ComponentDescriptor>> {
        let text = match fs.read_to_string(file) {
            Ok(t) => t,
            Err(e) => {
                self.entries.remove(file);
                return Err(e);
            }
        };
        let hash = content_hash(&text);

        if let Some(cached) = self.entries.get(file) {
            if cached.hash == hash {
                return Ok(Arc::clone(&cached.descriptor));
            }
        }

        let descriptor = match parse_descriptor(&text, file) {
            Ok(d) => Arc::new(d),
            Err(e) => {
                self.entries.remove(file);
                return Err(e);
            }
        };
        tracing::trace!(path = %file.display(), "descriptor (re)parsed");
        self.entries.insert(
            file.to_path_buf(),
            CachedDescriptor {
                hash,
                descriptor: Arc::clone(&descriptor),
            },
        );
        Ok(descriptor)
    }

    /// Drops the cached entry for one descriptor file.
    pub fn invalidate(&self, file: &Path) {
        self.entries.remove(file);
    }

    /// Drops entries for files not in `live`, typically the latest
    /// descriptor enumeration. Returns how many entries were dropped.
    pub fn retain_files(&self, live: &[PathBuf]) -> usize {
        let live: HashSet<&Path> = live.iter().map(PathBuf::as_path).collect();
        let before = self.entries.len();
        self.entries.retain(|path, _| live.contains(path.as_path()));
        before - self.entries.len()
    }

    /// Drops all cached entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DescriptorReader for DescriptorCache {
    fn read_descriptor(&self, fs: &dyn ProjectFs, file: &Path) -> Result<ComponentDescriptor> {
        self.get(fs, file).map(|d| (*d).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_descriptor() {
        let d = parse_descriptor("name: compA\nversion: '1.0'\n", Path::new("antora.yml")).unwrap();
        assert_eq!(d.name, "compA");
        assert_eq!(d.version, "1.0");
        assert_eq!(d.title, None);
    }

    #[test]
    fn test_null_version_is_unversioned() {
        let d = parse_descriptor("name: c\nversion: ~\n", Path::new("antora.yml")).unwrap();
        assert_eq!(d.version, UNVERSIONED);
    }

    #[test]
    fn test_integer_version_is_rendered() {
        let d = parse_descriptor("name: c\nversion: 2\n", Path::new("antora.yml")).unwrap();
        assert_eq!(d.version, "2");
    }

    #[test]
    fn test_float_version_is_malformed() {
        for text in ["name: c\nversion: 1.10\n", "name: c\nversion: 1e3\n", "name: c\nversion: 0x10\n"] {
            let err = parse_descriptor(text, Path::new("antora.yml")).unwrap_err();
            assert!(matches!(err, AntoraError::Descriptor { .. }), "{}", text);
        }
    }

    #[test]
    fn test_quoted_float_version_keeps_text() {
        let d = parse_descriptor("name: c\nversion: '1.10'\n", Path::new("antora.yml")).unwrap();
        assert_eq!(d.version, "1.10");
    }

    #[test]
    fn test_integer_version_with_comment() {
        let d = parse_descriptor("name: c\nversion: 3 # current\n", Path::new("antora.yml")).unwrap();
        assert_eq!(d.version, "3");
    }

    #[test]
    fn test_missing_version_is_malformed() {
        let err = parse_descriptor("name: c\n", Path::new("antora.yml")).unwrap_err();
        assert!(matches!(err, AntoraError::Descriptor { .. }));
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let err = parse_descriptor("version: '1'\n", Path::new("antora.yml")).unwrap_err();
        assert!(matches!(err, AntoraError::Descriptor { .. }));
    }

    #[test]
    fn test_content_hash_deterministic() {
        assert_eq!(content_hash("name: a"), content_hash("name: a"));
        assert_ne!(content_hash("name: a"), content_hash("name: b"));
    }
}
