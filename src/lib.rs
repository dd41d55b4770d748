// src/lib.rs
// =============================================================================
// link-archiver keeps a durable snapshot of every external link referenced
// from a folder of Markdown documents, and decorates the rendered HTML with a
// small link to that snapshot.
//
// Two pipelines live here and only share the fingerprint function:
//
//   archival:  discover -> archive::Archiver -> archive::ArchiveStore
//   rendering: render::tokens_from_markdown -> render::ArchiveLinks -> HTML
//
// Both sides must agree on `fingerprint(url)`, because archival and rendering
// usually run at different times, often in different processes.
// =============================================================================

pub mod archive;
pub mod config;
pub mod discover;
pub mod error;
pub mod fingerprint;
pub mod render;

pub use config::Config;
pub use error::{Error, Result};
pub use fingerprint::{fingerprint, Fingerprint};
