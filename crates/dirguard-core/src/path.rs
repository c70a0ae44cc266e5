//! Slash-separated virtual path algebra.
//!
//! Request paths, role base paths, and Meta paths all live in one virtual
//! namespace rooted at `/`. Every comparison here works on cleaned paths and
//! on whole components, so `/shared2` is never considered to be inside
//! `/shared`.

/// Normalizes a virtual path.
///
/// Backslashes are treated as separators, the result is always absolute,
/// repeated separators and `.` segments are dropped, `..` pops a component
/// (never above the root), and there is no trailing separator except for
/// the root itself.
pub fn clean_path(path: &str) -> String {
    let mut components: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return "/".to_string();
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for component in components {
        cleaned.push('/');
        cleaned.push_str(component);
    }
    cleaned
}

/// Returns whether two paths name the same location.
pub fn path_equal(a: &str, b: &str) -> bool {
    clean_path(a) == clean_path(b)
}

/// Returns whether `path` equals `base` or lies underneath it.
pub fn is_sub_path(base: &str, path: &str) -> bool {
    let base = clean_path(base);
    let path = clean_path(path);

    if base == path || base == "/" {
        return true;
    }

    path.strip_prefix(base.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Returns the directory containing `path`. The root is its own parent.
pub fn parent_dir(path: &str) -> String {
    let cleaned = clean_path(path);
    match cleaned.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => cleaned[..idx].to_string(),
    }
}

/// Returns the final component of `path`, or an empty string for the root.
pub fn base_name(path: &str) -> String {
    let cleaned = clean_path(path);
    match cleaned.rfind('/') {
        Some(idx) => cleaned[idx + 1..].to_string(),
        None => cleaned,
    }
}

/// Returns whether a per-directory rule configured at `rule_path` governs
/// `dir`: always for the exact directory, and for descendants only when the
/// rule propagates to its subtree.
pub fn is_apply(rule_path: &str, dir: &str, apply_sub: bool) -> bool {
    if path_equal(rule_path, dir) {
        return true;
    }
    apply_sub && is_sub_path(rule_path, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("shared"), "/shared");
        assert_eq!(clean_path("/shared//docs/"), "/shared/docs");
        assert_eq!(clean_path("/shared/./docs/../img"), "/shared/img");
        assert_eq!(clean_path("/../../etc"), "/etc");
        assert_eq!(clean_path("\\shared\\docs"), "/shared/docs");
    }

    #[test]
    fn test_sub_path_is_component_wise() {
        assert!(is_sub_path("/shared", "/shared"));
        assert!(is_sub_path("/shared", "/shared/x"));
        assert!(is_sub_path("/shared/", "/shared/x/y"));
        assert!(!is_sub_path("/shared", "/shared2/x"));
        assert!(!is_sub_path("/shared", "/private/x"));
        assert!(!is_sub_path("/shared/x", "/shared"));
    }

    #[test]
    fn test_root_contains_everything() {
        assert!(is_sub_path("/", "/"));
        assert!(is_sub_path("/", "/anything/at/all"));
        assert!(is_sub_path("", "/x"));
    }

    #[test]
    fn test_parent_and_base_name() {
        assert_eq!(parent_dir("/a/b/.git"), "/a/b");
        assert_eq!(parent_dir("/a"), "/");
        assert_eq!(parent_dir("/"), "/");
        assert_eq!(base_name("/a/b/.git"), ".git");
        assert_eq!(base_name("/a/"), "a");
        assert_eq!(base_name("/"), "");
    }

    #[test]
    fn test_is_apply() {
        assert!(is_apply("/a", "/a", false));
        assert!(is_apply("/a/", "/a", false));
        assert!(!is_apply("/a", "/a/b", false));
        assert!(is_apply("/a", "/a/b", true));
        assert!(!is_apply("/a", "/ab", true));
    }
}
