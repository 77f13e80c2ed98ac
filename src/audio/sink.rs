//! `rodio`-backed output.
//!
//! Every `load` decodes the file into a fresh paused `Sink` on the shared
//! output stream and drops the previous one.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::{Error, Result};

use super::device::AudioDevice;

pub struct RodioDevice {
    stream: OutputStream,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioDevice {
    /// Open the system's default output.
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream().map_err(Error::device)?;
        // rodio logs to stderr when OutputStream is dropped; the shell writes there too.
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            sink: None,
            volume: 1.0,
        })
    }
}

/// Create a paused `Sink` for the file at `path` that starts playback at `start_at`.
fn create_sink_at(stream: &OutputStream, path: &Path, start_at: Duration) -> Result<Sink> {
    let file = File::open(path)
        .map_err(|e| Error::device(format!("failed to open {}: {e}", path.display())))?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| Error::device(format!("failed to decode {}: {e}", path.display())))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

impl AudioDevice for RodioDevice {
    fn load(&mut self, path: &Path, start_at: Duration) -> Result<()> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = create_sink_at(&self.stream, path, start_at)?;
        sink.set_volume(self.volume);
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        match self.sink.as_ref() {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(Error::device("nothing loaded")),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(level);
        }
    }

    fn is_finished(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && sink.empty())
    }
}
