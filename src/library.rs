//! Library helpers that sit between the user and the catalog: validating
//! track input, reading file lengths, and bulk-importing a directory.

mod display;
mod import;
mod input;
mod scan;

pub use display::display_from_fields;
pub use import::{ImportSummary, import_dir};
pub use input::{DurationReader, LoftyDurationReader, TrackInput, prepare_track};
pub use scan::scan;

#[cfg(test)]
mod tests;
