//! Meta password gate.

use subtle::ConstantTimeEq;

use dirguard_core::path::path_equal;
use dirguard_entity::meta::Meta;
use dirguard_entity::permission::Permission;

/// Whether `meta` puts a password in front of `path`.
///
/// The password guards the Meta's own path, and every path below it only
/// when `p_sub` is set.
pub fn requires_password(meta: Option<&Meta>, path: &str) -> bool {
    match meta {
        Some(meta) if !meta.password.is_empty() => meta.p_sub || path_equal(&meta.path, path),
        _ => false,
    }
}

/// Whether a caller holding `perm` may open `path` after supplying `password`.
pub fn can_access(meta: Option<&Meta>, path: &str, password: &str, perm: Permission) -> bool {
    if perm.contains(Permission::ACCESS_WITHOUT_PASSWORD) {
        return true;
    }
    match meta {
        Some(meta) if requires_password(Some(meta), path) => {
            password.as_bytes().ct_eq(meta.password.as_bytes()).into()
        }
        _ => true,
    }
}
