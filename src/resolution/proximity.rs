use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use crate::fs::to_slash;

/// Number of leading characters two strings share.
pub fn shared_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Orders candidate files so that those whose path shares the most leading
/// characters with `origin` come first. Ties keep their input order.
pub fn rank_by_proximity(mut files: Vec<PathBuf>, origin: &Path) -> Vec<PathBuf> {
    let origin = to_slash(origin);
    files.sort_by_cached_key(|file| Reverse(shared_prefix_len(&to_slash(file), &origin)));
    files
}
