//! Hiding directory entries by Meta patterns.
//!
//! A Meta hides an entry when it governs the entry's parent directory
//! (exactly, or as an ancestor when `h_sub` is set) and one of its Hide
//! patterns matches the entry's base name. Patterns use a backtracking
//! engine so operators can write lookaround.

use std::sync::Arc;

use fancy_regex::Regex;
use moka::sync::Cache;
use tracing::warn;

use dirguard_core::path::{base_name, is_apply, parent_dir};
use dirguard_entity::meta::Meta;
use dirguard_entity::permission::Permission;

const DEFAULT_PATTERN_CAPACITY: u64 = 4096;

/// Decides entry visibility, memoizing compiled Hide patterns.
///
/// A pattern that fails to compile or to evaluate is treated as not
/// matching; it never hides anything and never aborts the check.
#[derive(Clone)]
pub struct VisibilityFilter {
    /// Compiled patterns by source text; `None` for patterns that fail to compile.
    patterns: Cache<String, Option<Arc<Regex>>>,
}

impl std::fmt::Debug for VisibilityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityFilter")
            .field("cached_patterns", &self.patterns.entry_count())
            .finish()
    }
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_CAPACITY)
    }
}

impl VisibilityFilter {
    /// Creates a filter caching up to `capacity` compiled patterns.
    pub fn new(capacity: u64) -> Self {
        Self {
            patterns: Cache::new(capacity),
        }
    }

    /// Whether the entry at `path` is shown to a caller holding `perm`.
    pub fn is_visible(&self, meta: Option<&Meta>, path: &str, perm: Permission) -> bool {
        if perm.contains(Permission::SEE_HIDDEN) {
            return true;
        }
        let Some(meta) = meta else {
            return true;
        };
        if !is_apply(&meta.path, &parent_dir(path), meta.h_sub) {
            return true;
        }
        !self.hides_name(meta, &base_name(path))
    }

    /// Keeps the entries of directory `dir` that are visible, in order.
    pub fn filter_entries<T: AsRef<str>>(
        &self,
        meta: Option<&Meta>,
        dir: &str,
        entries: Vec<T>,
        perm: Permission,
    ) -> Vec<T> {
        let Some(meta) = meta else {
            return entries;
        };
        if perm.contains(Permission::SEE_HIDDEN) || !is_apply(&meta.path, dir, meta.h_sub) {
            return entries;
        }
        entries
            .into_iter()
            .filter(|entry| !self.hides_name(meta, entry.as_ref()))
            .collect()
    }

    fn hides_name(&self, meta: &Meta, name: &str) -> bool {
        meta.hide_patterns().any(|pattern| self.matches(pattern, name))
    }

    fn matches(&self, pattern: &str, name: &str) -> bool {
        let Some(regex) = self
            .patterns
            .get_with(pattern.to_string(), || compile(pattern))
        else {
            return false;
        };

        match regex.is_match(name) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(pattern = %pattern, name = %name, error = %e, "Hide pattern failed to evaluate");
                false
            }
        }
    }
}

fn compile(pattern: &str) -> Option<Arc<Regex>> {
    match Regex::new(pattern) {
        Ok(regex) => Some(Arc::new(regex)),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Ignoring invalid hide pattern");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dotfiles_meta(h_sub: bool) -> Meta {
        Meta {
            path: "/repo".to_string(),
            hide: "^\\.".to_string(),
            h_sub,
            ..Meta::default()
        }
    }

    #[test]
    fn test_hidden_in_descendant_when_subtree_applies() {
        let filter = VisibilityFilter::default();
        let meta = dotfiles_meta(true);

        assert!(!filter.is_visible(Some(&meta), "/repo/src/.git", Permission::empty()));
        assert!(filter.is_visible(Some(&meta), "/repo/src/.git", Permission::SEE_HIDDEN));
        assert!(filter.is_visible(Some(&meta), "/repo/src/main.rs", Permission::empty()));
    }

    #[test]
    fn test_exact_directory_only_without_subtree() {
        let filter = VisibilityFilter::default();
        let meta = dotfiles_meta(false);

        assert!(!filter.is_visible(Some(&meta), "/repo/.git", Permission::empty()));
        assert!(filter.is_visible(Some(&meta), "/repo/src/.git", Permission::empty()));
    }

    #[test]
    fn test_meta_of_sibling_directory_does_not_apply() {
        let filter = VisibilityFilter::default();
        let meta = dotfiles_meta(true);
        assert!(filter.is_visible(Some(&meta), "/repository/.git", Permission::empty()));
    }

    #[test]
    fn test_no_meta_means_visible() {
        let filter = VisibilityFilter::default();
        assert!(filter.is_visible(None, "/anything/.secret", Permission::empty()));
    }

    #[test]
    fn test_lookaround_patterns_are_supported() {
        let filter = VisibilityFilter::default();
        let meta = Meta {
            path: "/media".to_string(),
            hide: "^(?!.*\\.(mp4|mkv)$).*".to_string(),
            ..Meta::default()
        };

        assert!(filter.is_visible(Some(&meta), "/media/movie.mkv", Permission::empty()));
        assert!(!filter.is_visible(Some(&meta), "/media/notes.txt", Permission::empty()));
    }

    #[test]
    fn test_invalid_pattern_fails_open_for_that_pattern_only() {
        let filter = VisibilityFilter::default();
        let meta = Meta {
            path: "/".to_string(),
            hide: "([unclosed\nREADME".to_string(),
            ..Meta::default()
        };

        assert!(filter.is_visible(Some(&meta), "/notes.txt", Permission::empty()));
        assert!(!filter.is_visible(Some(&meta), "/README", Permission::empty()));
    }

    #[test]
    fn test_filter_entries_preserves_order() {
        let filter = VisibilityFilter::default();
        let meta = dotfiles_meta(true);
        let entries = vec![".env", "Cargo.toml", ".git", "src"];

        let shown = filter.filter_entries(Some(&meta), "/repo", entries.clone(), Permission::empty());
        assert_eq!(shown, vec!["Cargo.toml", "src"]);

        let all = filter.filter_entries(Some(&meta), "/repo", entries.clone(), Permission::SEE_HIDDEN);
        assert_eq!(all, entries);
    }
}
