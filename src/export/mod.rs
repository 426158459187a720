//! Export module for saving generated worlds.
//!
//! Equirectangular PNG previews (nearest-tile sampling over the sphere)
//! and a JSON dump of the full tile/plate data. Preview rendering is
//! host-facing tooling, not part of the generation contract.

mod json;
mod png;

pub use json::export_world_json;
pub use png::{export_world_png, MapLayer};

use thiserror::Error;

/// Errors surfaced by export backends.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot export an empty world")]
    EmptyWorld,
}
