//! Catalog store: tracks, playlists and playlist membership in SQLite.
//!
//! `CatalogStore` owns a single connection. Every operation commits before
//! it returns; multi-statement operations (`delete_track`, `clear_library`)
//! run inside one transaction.

mod model;
mod schema;
mod store;

pub use model::*;
pub use store::{CatalogStore, MatchCase};

#[cfg(test)]
mod tests;
