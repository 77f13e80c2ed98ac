//! Playback session: which track is current, the transport state machine
//! (`Stopped`/`Playing`/`Paused`), repeat and shuffle modes, volume and the
//! sleep timer.
//!
//! The session indexes into a listing of catalog tracks handed to it by the
//! caller and drives an [`AudioDevice`](crate::audio::AudioDevice). It never
//! touches the database itself.

mod display;
mod model;
mod playback;
mod timer;

pub use display::{DisplayState, format_time};
pub use model::{PlaybackState, RepeatMode};
pub use playback::{PlaybackSession, TickEvent};
