use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::AudioDevice;
use crate::error::Result;

use super::shell::{Flow, Shell};

/// How long to wait for input before checking the session clock.
const TICK: Duration = Duration::from_millis(200);

/// Forward stdin lines over a channel. The channel closes at end of input.
pub fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Run commands until `quit` or end of input, ticking the session between
/// lines. Saves the resume point on the way out.
pub fn run<D: AudioDevice, W: Write>(shell: &mut Shell<D, W>, lines: &Receiver<String>) -> Result<()> {
    loop {
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                if shell.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("input closed");
                break;
            }
        }
        shell.tick(Instant::now())?;
    }
    shell.shutdown()
}
