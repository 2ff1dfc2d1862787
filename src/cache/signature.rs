//! Content signatures for cache validation.

use std::fs;
use std::path::Path;

/// Source path recorded when the host supplies no file for a
/// declaration.
pub const UNKNOWN_SOURCE_PATH: &str = "<unknown>";

/// Signature recorded for a file that no longer exists.
pub const MISSING_SIGNATURE: &str = "missing";

/// Signature recorded for declarations without a source path.
pub const UNKNOWN_SIGNATURE: &str = "unknown";

/// Lowercase-hex MD5 of the file bytes; `"missing"` when the file is
/// absent and `"unknown"` when the path is the unknown sentinel.
pub fn file_signature(path: &str) -> String {
    if path == UNKNOWN_SOURCE_PATH {
        return UNKNOWN_SIGNATURE.to_string();
    }
    match fs::read(Path::new(path)) {
        Ok(bytes) => format!("{:x}", md5::compute(&bytes)),
        Err(_) => MISSING_SIGNATURE.to_string(),
    }
}

/// Combined signature: MD5 over the lexicographically sorted per-file
/// signatures joined by `|`.
pub fn cache_signature<S: AsRef<str>>(file_signatures: &[S]) -> String {
    let mut sorted: Vec<&str> = file_signatures.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    let joined = sorted.join("|");
    format!("{:x}", md5::compute(joined.as_bytes()))
}
