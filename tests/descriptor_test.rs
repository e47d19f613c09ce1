use std::fs;
use std::sync::Arc;

use antora_resolve::descriptor::*;
use antora_resolve::errors::AntoraError;
use antora_resolve::fs::DiskFs;
use tempfile::TempDir;

#[test]
fn test_read_full_descriptor() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(
        &file,
        "name: docs\nversion: '2.1'\ntitle: Product Docs\ndisplay_version: 2.1 LTS\nstart_page: ROOT:index.adoc\nnav:\n- modules/ROOT/nav.adoc\n",
    )
    .unwrap();

    let d = YamlDescriptorReader.read_descriptor(&DiskFs, &file).unwrap();
    assert_eq!(d.name, "docs");
    assert_eq!(d.version, "2.1");
    assert_eq!(d.title.as_deref(), Some("Product Docs"));
    assert_eq!(d.display_version.as_deref(), Some("2.1 LTS"));
    assert_eq!(d.start_page.as_deref(), Some("ROOT:index.adoc"));
}

#[test]
fn test_missing_file_is_file_error() {
    let dir = TempDir::new().unwrap();
    let err = YamlDescriptorReader
        .read_descriptor(&DiskFs, &dir.path().join("antora.yml"))
        .unwrap_err();
    assert!(matches!(err, AntoraError::File { .. }));
}

#[test]
fn test_non_mapping_is_malformed() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(&file, "- just\n- a list\n").unwrap();
    let err = YamlDescriptorReader.read_descriptor(&DiskFs, &file).unwrap_err();
    assert!(matches!(err, AntoraError::Descriptor { .. }));
}

#[test]
fn test_non_string_title_is_ignored() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(&file, "name: docs\nversion: '1'\ntitle: [a, b]\n").unwrap();
    let d = YamlDescriptorReader.read_descriptor(&DiskFs, &file).unwrap();
    assert_eq!(d.title, None);
}

#[test]
fn test_cache_reuses_unchanged_descriptor() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(&file, "name: docs\nversion: '1'\n").unwrap();

    let cache = DescriptorCache::new();
    let first = cache.get(&DiskFs, &file).unwrap();
    let second = cache.get(&DiskFs, &file).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_reparses_changed_descriptor() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(&file, "name: docs\nversion: '1'\n").unwrap();

    let cache = DescriptorCache::new();
    assert_eq!(cache.get(&DiskFs, &file).unwrap().version, "1");

    fs::write(&file, "name: docs\nversion: '2'\n").unwrap();
    assert_eq!(cache.get(&DiskFs, &file).unwrap().version, "2");
}

#[test]
fn test_cache_drops_entry_when_descriptor_breaks() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(&file, "name: docs\nversion: '1'\n").unwrap();

    let cache = DescriptorCache::new();
    cache.get(&DiskFs, &file).unwrap();
    fs::write(&file, "name: docs\n").unwrap();
    assert!(cache.get(&DiskFs, &file).is_err());
    assert!(cache.is_empty());

    fs::write(&file, "name: docs\nversion: '1'\n").unwrap();
    cache.get(&DiskFs, &file).unwrap();
    fs::remove_file(&file).unwrap();
    assert!(cache.get(&DiskFs, &file).is_err());
    assert!(cache.is_empty());
}

#[test]
fn test_cache_invalidate_and_clear() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.yml");
    let b = dir.path().join("b.yml");
    fs::write(&a, "name: a\nversion: '1'\n").unwrap();
    fs::write(&b, "name: b\nversion: '1'\n").unwrap();

    let cache = DescriptorCache::new();
    cache.read_descriptor(&DiskFs, &a).unwrap();
    cache.read_descriptor(&DiskFs, &b).unwrap();
    assert_eq!(cache.len(), 2);

    cache.invalidate(&a);
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_retain_files_drops_missing() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.yml");
    let b = dir.path().join("b.yml");
    fs::write(&a, "name: a\nversion: '1'\n").unwrap();
    fs::write(&b, "name: b\nversion: '1'\n").unwrap();

    let cache = DescriptorCache::new();
    cache.get(&DiskFs, &a).unwrap();
    cache.get(&DiskFs, &b).unwrap();

    assert_eq!(cache.retain_files(&[a.clone()]), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.retain_files(&[a]), 0);
}

#[test]
fn test_unquoted_float_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("antora.yml");
    fs::write(&file, "name: docs\nversion: 1.10\n").unwrap();
    let err = YamlDescriptorReader.read_descriptor(&DiskFs, &file).unwrap_err();
    assert!(matches!(err, AntoraError::Descriptor { .. }));
}
