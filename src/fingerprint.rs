// src/fingerprint.rs
// =============================================================================
// Content-addressed snapshot names.
//
// A fingerprint is derived from the URL string only (never from the page
// content), so the archiver and the renderer can compute it independently and
// still land on the same file: `<sha256 hex of url>.html`.
// =============================================================================

use sha2::{Digest, Sha256};
use std::fmt;

/// File extension appended to every snapshot name
pub const SNAPSHOT_EXTENSION: &str = "html";

/// Default public path the snapshots are served under
pub const DEFAULT_ARCHIVE_PREFIX: &str = "/archives";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Public link to the snapshot, e.g. "/archives/<hex>.html"
    pub fn archive_path(&self, prefix: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Derives the snapshot name for a URL.
//
// The URL is hashed byte for byte: no trimming, no case folding, no trailing
// slash handling. "https://a.com" and "https://a.com/" get different names.
pub fn fingerprint(url: &str) -> Fingerprint {
    let digest = Sha256::digest(url.as_bytes());
    Fingerprint(format!("{}.{}", hex::encode(digest), SNAPSHOT_EXTENSION))
}
