//! Audio output.
//!
//! The playback session talks to an [`AudioDevice`]; [`RodioDevice`] plays
//! through the default output with `rodio`, and [`SilentDevice`] stands in
//! when no output is available.

mod device;
mod sink;

pub use device::{AudioDevice, SilentDevice};
pub use sink::RodioDevice;
