use antora_resolve::config::ResolverConfig;
use antora_resolve::fs::to_slash;
use antora_resolve::project::AntoraProject;
use antora_resolve::types::Family;
use std::fs;
use tempfile::TempDir;

/// A two-component site: `compA` documents with images, `compB` holding
/// shared attachments and partials.
fn setup_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("compA/modules/mod1/pages")).unwrap();
    fs::create_dir_all(root.join("compA/modules/mod1/images")).unwrap();
    fs::write(
        root.join("compA/antora.yml"),
        "name: compA\nversion: '1'\ntitle: Component A\n",
    )
    .unwrap();
    fs::write(
        root.join("compA/modules/mod1/pages/doc.adoc"),
        "= Doc\n\nimage::foo.png[]\ninclude::compB:shared:partial$legal.adoc[]\n",
    )
    .unwrap();

    fs::create_dir_all(root.join("compB/modules/shared/partials")).unwrap();
    fs::create_dir_all(root.join("compB/modules/shared/assets/attachments")).unwrap();
    fs::write(root.join("compB/antora.yml"), "name: compB\nversion: '1'\n").unwrap();
    dir
}

#[test]
fn test_full_pipeline() {
    let dir = setup_site();
    let root = dir.path();
    let doc = root.join("compA/modules/mod1/pages/doc.adoc");

    // Init
    let project = AntoraProject::init(root).unwrap();
    assert!(AntoraProject::is_initialized(root));

    // Enclosing module
    assert_eq!(project.module_for(&doc), Some(root.join("compA/modules/mod1")));

    // Same-module image with default family
    assert_eq!(
        project.replace_prefix(&doc, "foo.png", Some(Family::Image)),
        format!("{}/foo.png", to_slash(&root.join("compA/modules/mod1/images")))
    );

    // Cross-component partial
    assert_eq!(
        project.replace_prefix(&doc, "compB:shared:partial$legal.adoc", None),
        format!(
            "{}/legal.adoc",
            to_slash(&root.join("compB/modules/shared/partials"))
        )
    );

    // Cross-component attachment through the assets layout
    let target = project
        .resolve(&doc, "compB:shared:attachment$kit.zip", None)
        .expect("attachment should resolve");
    assert_eq!(
        target.family_dir,
        root.join("compB/modules/shared/assets/attachments")
    );

    // Dropping a cached descriptor does not change the answer
    project.invalidate_descriptor(&root.join("compB/antora.yml"));
    assert!(project
        .resolve(&doc, "compB:shared:attachment$kit.zip", None)
        .is_some());

    // Prefix listing
    let prefixes = project.collect_prefixes(&doc);
    assert!(prefixes.iter().any(|p| p.prefix == "mod1:"));
    assert!(prefixes.iter().any(|p| p.prefix == "compB:shared:"));
}

#[test]
fn test_prune_drops_deleted_descriptors() {
    let dir = setup_site();
    let root = dir.path();
    let doc = root.join("compA/modules/mod1/pages/doc.adoc");
    let project = AntoraProject::open(root).unwrap();

    assert!(project
        .resolve(&doc, "compB:shared:partial$legal.adoc", None)
        .is_some());
    assert_eq!(project.prune_descriptor_cache().unwrap(), 0);

    fs::remove_dir_all(root.join("compB")).unwrap();
    assert_eq!(project.prune_descriptor_cache().unwrap(), 1);
    assert_eq!(project.prune_descriptor_cache().unwrap(), 0);
}

#[test]
fn test_configured_default_family() {
    let dir = setup_site();
    let root = dir.path();
    let doc = root.join("compA/modules/mod1/pages/doc.adoc");
    let config = ResolverConfig {
        root_dir: root.to_string_lossy().to_string(),
        default_family: Some(Family::Image),
        ..ResolverConfig::default()
    };
    let project = AntoraProject::with_config(root, config).unwrap();

    assert_eq!(
        project.replace_prefix(&doc, "foo.png", None),
        format!("{}/foo.png", to_slash(&root.join("compA/modules/mod1/images")))
    );
    // An explicit default still wins over the configured one.
    assert_eq!(project.replace_prefix(&doc, "foo.png", Some(Family::Example)), "foo.png");
}

#[test]
fn test_uncached_project_reads_fresh_descriptors() {
    let dir = setup_site();
    let root = dir.path();
    let doc = root.join("compA/modules/mod1/pages/doc.adoc");
    let config = ResolverConfig {
        cache_descriptors: false,
        ..ResolverConfig::default()
    };
    let project = AntoraProject::with_config(root, config).unwrap();
    let key = "compB:shared:partial$legal.adoc";

    assert_ne!(project.replace_prefix(&doc, key, None), key);
    fs::write(root.join("compB/antora.yml"), "name: compB\nversion: '9'\n").unwrap();
    assert_eq!(project.replace_prefix(&doc, key, None), key);
}

#[test]
fn test_family_dirs_for_document() {
    let dir = setup_site();
    let root = dir.path();
    let doc = root.join("compA/modules/mod1/pages/doc.adoc");
    let project = AntoraProject::open(root).unwrap();

    assert_eq!(
        project.family_dir(&doc, Family::Image),
        Some(root.join("compA/modules/mod1/images"))
    );
    assert_eq!(
        project.family_dir_relative(&doc, Family::Image).as_deref(),
        Some("../images")
    );
    assert_eq!(project.family_dir(&doc, Family::Partial), None);
    assert_eq!(project.rest_docs_snippets(&doc), None);
}

#[test]
fn test_document_outside_modules_is_left_alone() {
    let dir = setup_site();
    let root = dir.path();
    fs::write(root.join("README.adoc"), "= Readme\n").unwrap();
    let project = AntoraProject::open(root).unwrap();
    let readme = root.join("README.adoc");

    assert_eq!(project.module_for(&readme), None);
    assert_eq!(project.replace_prefix(&readme, "image$foo.png", None), "image$foo.png");
    assert!(project.collect_prefixes(&readme).is_empty());
}

#[test]
fn test_open_rejects_missing_root() {
    let dir = TempDir::new().unwrap();
    assert!(AntoraProject::open(&dir.path().join("missing")).is_err());
}
