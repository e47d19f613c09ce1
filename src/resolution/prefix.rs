use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Family, Reference};

// component:module:
static COMPONENT_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<component>[a-zA-Z0-9._-]*):(?P<module>[a-zA-Z0-9._-]*):")
        .expect("static regex")
});

// module:
static MODULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<module>[a-zA-Z0-9._-]*):").expect("static regex"));

// family$
static FAMILY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<family>example|attachment|partial|image|page)\$").expect("static regex")
});

static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("static regex"));

static PREFIX_AND_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9:._-]*[$:]").expect("static regex"));

static PREFIX_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9:._-]*:").expect("static regex"));

static FAMILY_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]*\$").expect("static regex"));

/// Splits a raw reference into its `component:module:family$` prefix and remainder.
///
/// Matching is greedy and never backtracks: once `component:module:` matches,
/// the `module:` form is not tried, even if the result looks inconsistent.
pub fn parse(key: &str) -> Reference {
    let mut rest = key;
    let mut reference = Reference::default();

    if let Some(caps) = COMPONENT_MODULE.captures(rest) {
        reference.component = Some(caps["component"].to_string());
        reference.module = Some(caps["module"].to_string());
        rest = &rest[caps[0].len()..];
    } else if let Some(caps) = MODULE.captures(rest) {
        reference.module = Some(caps["module"].to_string());
        rest = &rest[caps[0].len()..];
    }

    if let Some(caps) = FAMILY.captures(rest) {
        reference.family = Family::from_str(&caps["family"]);
        rest = &rest[caps[0].len()..];
    }

    reference.remainder = rest.to_string();
    reference
}

/// Whether a directory name can be addressed as a module in a prefix.
pub fn is_valid_module_name(name: &str) -> bool {
    MODULE_NAME.is_match(name)
}

/// Length of a leading `...:` or `...$` prefix in partially typed text.
pub fn leading_prefix_len(text: &str) -> Option<usize> {
    PREFIX_AND_FAMILY.find(text).map(|m| m.end())
}

/// Length of a leading `component:module:` or `module:` prefix in partially typed text.
pub fn leading_module_prefix_len(text: &str) -> Option<usize> {
    PREFIX_ONLY.find(text).map(|m| m.end())
}

/// Length of a leading `family$` tag in partially typed text.
pub fn leading_family_len(text: &str) -> Option<usize> {
    FAMILY_ONLY.find(text).map(|m| m.end())
}
