use crate::audio::{AudioDevice, RodioDevice, SilentDevice};
use crate::catalog::CatalogStore;
use crate::config;
use crate::error::Result;
use crate::session::PlaybackSession;

/// The default output, or a silent stand-in when none can be opened.
pub fn open_device() -> Box<dyn AudioDevice> {
    match RodioDevice::open_default() {
        Ok(device) => Box::new(device),
        Err(err) => {
            tracing::warn!(error = %err, "no audio output, continuing without sound");
            Box::new(SilentDevice)
        }
    }
}

pub fn apply_playback_defaults<D: AudioDevice>(
    session: &mut PlaybackSession<D>,
    settings: &config::Settings,
) -> Result<()> {
    session.set_volume(settings.playback.volume)?;
    session.set_repeat(settings.playback.repeat.into());
    session.set_shuffle(settings.playback.shuffle);
    session.set_sleep_limit(settings.sleep.max_minutes);
    Ok(())
}

/// Select (or resume) the track that was playing when the shell last quit.
/// Returns whether a track was restored.
pub fn restore_last_played<D: AudioDevice>(
    store: &CatalogStore,
    session: &mut PlaybackSession<D>,
    settings: &config::Settings,
) -> Result<bool> {
    if !settings.playback.resume {
        return Ok(false);
    }
    let Some(point) = store.load_resume_point()? else {
        return Ok(false);
    };

    if let Err(err) = store.track(point.track_id) {
        if !err.is_not_found() {
            return Err(err);
        }
        tracing::debug!(track_id = point.track_id, "last played track is gone");
        store.clear_resume_point()?;
        return Ok(false);
    }

    let restored = session.restore(&point, settings.playback.resume_autoplay)?;
    if restored {
        tracing::info!(
            track_id = point.track_id,
            position_secs = point.position.as_secs(),
            "restored last played track"
        );
    }
    Ok(restored)
}
