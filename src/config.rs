//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the catalog, playback and
//! library import, plus helpers to locate and load them from disk.

mod load;
mod schema;

pub use schema::*;
