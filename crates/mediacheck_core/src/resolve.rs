//! Stored path resolution.

use std::path::{Component, Path, PathBuf};

/// Where a stored value is expected on disk: the media root joined with the
/// value, exactly as stored.
///
/// No normalization happens here. `nodir/../a.png` stays as written, so the
/// existence check sees the same path the OS would open.
pub fn expected_path(media_root: &Path, stored: &str) -> PathBuf {
    media_root.join(stored)
}

/// Whether a stored value names a location inside the media root.
///
/// False when the value contains a NUL byte, is absolute, normalizes to
/// nothing, or climbs out of the root with `..`. Only used to keep
/// placeholder writes inside the root; the audit itself reports such values
/// like any other.
pub fn stays_within_root(stored: &str) -> bool {
    if stored.contains('\0') {
        return false;
    }

    let mut depth = 0usize;
    let mut named = false;
    for component in Path::new(stored).components() {
        match component {
            Component::Normal(_) => {
                depth += 1;
                named = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }

    named && depth > 0
}
