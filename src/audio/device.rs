use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// A load/play/pause/stop/volume output, one file at a time.
///
/// `load` replaces whatever was loaded before and leaves the new file
/// paused at `start_at`; `play` starts it.
pub trait AudioDevice {
    fn load(&mut self, path: &Path, start_at: Duration) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, level: f32);
    /// True once a loaded file has played to its end.
    fn is_finished(&self) -> bool;
}

impl<D: AudioDevice + ?Sized> AudioDevice for Box<D> {
    fn load(&mut self, path: &Path, start_at: Duration) -> Result<()> {
        (**self).load(path, start_at)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn unpause(&mut self) {
        (**self).unpause()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn set_volume(&mut self, level: f32) {
        (**self).set_volume(level)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// Accepts every command and produces no sound. Tracks never finish.
#[derive(Debug, Default)]
pub struct SilentDevice;

impl AudioDevice for SilentDevice {
    fn load(&mut self, path: &Path, _start_at: Duration) -> Result<()> {
        tracing::debug!(path = %path.display(), "silent output: load");
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn unpause(&mut self) {}

    fn stop(&mut self) {}

    fn set_volume(&mut self, _level: f32) {}

    fn is_finished(&self) -> bool {
        false
    }
}
