//! Capability bitmask shared by users and roles.
//!
//! The bit layout is persisted in existing user and role rows and must not
//! be renumbered.
//!
//! | bit | flag |
//! |-----|------|
//! | 0 | [`SEE_HIDDEN`](Permission::SEE_HIDDEN) |
//! | 1 | [`ACCESS_WITHOUT_PASSWORD`](Permission::ACCESS_WITHOUT_PASSWORD) |
//! | 2 | [`ADD_OFFLINE_DOWNLOAD`](Permission::ADD_OFFLINE_DOWNLOAD) |
//! | 3 | [`WRITE`](Permission::WRITE) |
//! | 4 | [`RENAME`](Permission::RENAME) |
//! | 5 | [`MOVE`](Permission::MOVE) |
//! | 6 | [`COPY`](Permission::COPY) |
//! | 7 | [`REMOVE`](Permission::REMOVE) |
//! | 8 | [`WEBDAV_READ`](Permission::WEBDAV_READ) |
//! | 9 | [`WEBDAV_MANAGE`](Permission::WEBDAV_MANAGE) |
//! | 10 | [`FTP_ACCESS`](Permission::FTP_ACCESS) |
//! | 11 | [`FTP_MANAGE`](Permission::FTP_MANAGE) |
//! | 12 | [`READ_ARCHIVES`](Permission::READ_ARCHIVES) |
//! | 13 | [`DECOMPRESS`](Permission::DECOMPRESS) |
//! | 14 | [`PATH_LIMIT`](Permission::PATH_LIMIT) |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A 32-bit capability set.
///
/// Serializes as the raw integer so stored values round-trip unchanged,
/// including bits this crate does not name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(u32);

bitflags! {
    impl Permission: u32 {
        /// List entries that a Meta hides.
        const SEE_HIDDEN              = 1 << 0;
        /// Skip Meta password prompts.
        const ACCESS_WITHOUT_PASSWORD = 1 << 1;
        /// Queue offline-download tasks.
        const ADD_OFFLINE_DOWNLOAD    = 1 << 2;
        /// Create and upload.
        const WRITE                   = 1 << 3;
        const RENAME                  = 1 << 4;
        const MOVE                    = 1 << 5;
        const COPY                    = 1 << 6;
        const REMOVE                  = 1 << 7;
        const WEBDAV_READ             = 1 << 8;
        const WEBDAV_MANAGE           = 1 << 9;
        const FTP_ACCESS              = 1 << 10;
        const FTP_MANAGE              = 1 << 11;
        /// Browse inside archives.
        const READ_ARCHIVES           = 1 << 12;
        const DECOMPRESS              = 1 << 13;
        /// On a role: only contribute under the role's base paths.
        const PATH_LIMIT              = 1 << 14;
    }
}

impl Permission {
    /// Tests a single bit by index. Indexes past 31 are never set.
    pub fn has_bit(self, bit: u32) -> bool {
        bit < u32::BITS && (self.bits() >> bit) & 1 == 1
    }
}

impl From<i32> for Permission {
    fn from(raw: i32) -> Self {
        Self::from_bits_retain(raw as u32)
    }
}

impl From<Permission> for i32 {
    fn from(perm: Permission) -> i32 {
        perm.bits() as i32
    }
}

/// Tests bit `bit` of `perm`.
pub fn has_permission(perm: Permission, bit: u32) -> bool {
    perm.has_bit(bit)
}
