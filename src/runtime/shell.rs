use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::audio::AudioDevice;
use crate::catalog::{CatalogStore, NewTrack, Playlist, PlaylistId, ResumePoint};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::library::{self, LoftyDurationReader, TrackInput};
use crate::session::{PlaybackSession, PlaybackState, TickEvent};

use super::command::{Command, HELP};
use super::render;
use super::ui_state::{ListingSource, UiState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the catalog, the playback session and the presentation state, and
/// turns commands into calls on them. Output goes to `out`.
pub struct Shell<D, W> {
    settings: Settings,
    store: CatalogStore,
    session: PlaybackSession<D>,
    ui: UiState,
    out: W,
}

impl<D: AudioDevice, W: Write> Shell<D, W> {
    pub fn new(settings: Settings, store: CatalogStore, session: PlaybackSession<D>, out: W) -> Self {
        Self {
            settings,
            store,
            session,
            ui: UiState::default(),
            out,
        }
    }

    /// Load the listing for the current source into the session.
    pub fn reload_listing(&mut self) -> Result<()> {
        let tracks = match self.ui.source {
            ListingSource::Library => self.store.list_tracks(self.ui.filter.as_deref())?,
            ListingSource::Playlist(id) => self.store.list_playlist_tracks(id)?,
        };
        self.session.set_tracks(tracks);
        Ok(())
    }

    /// Parse and run one input line. Command failures are printed as
    /// notices; only failures to write output are returned.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let outcome = Command::parse(line).and_then(|command| match command {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue),
        });
        match outcome {
            Ok(flow) => Ok(flow),
            Err(err) => {
                self.say(&render::notice(&err))?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::List(filter) => {
                self.ui.show_library(filter);
                self.reload_listing()?;
                self.print_listing()?;
            }
            Command::Library => {
                self.ui.show_library(None);
                self.reload_listing()?;
                self.print_listing()?;
            }
            Command::Add(args) => {
                let track = self.prepare(args.into())?;
                let id = self.store.add_track(&track)?;
                self.reload_listing()?;
                self.say(&format!("Added track #{id}: {} by {}", track.title, track.artist))?;
            }
            Command::Edit(id, args) => {
                let track = self.prepare(args.into())?;
                self.store.update_track(id, &track)?;
                self.reload_listing()?;
                self.say(&format!("Updated track #{id}"))?;
            }
            Command::Delete(id) => {
                let removed = self.store.delete_track(id)?;
                self.reload_listing()?;
                if removed {
                    self.say(&format!("Deleted track #{id}"))?;
                } else {
                    self.say(&format!("No track #{id}; nothing deleted"))?;
                }
            }
            Command::Clear => {
                self.store.clear_library()?;
                self.ui.show_library(None);
                self.reload_listing()?;
                self.say("Library cleared")?;
            }
            Command::Import(dir) => self.import(&dir)?,
            Command::Playlists => {
                let all = self.store.list_playlists()?;
                self.say(&render::playlists(&all, self.ui.theme))?;
            }
            Command::PlaylistNew(name) => {
                let id = self.store.create_playlist(&name)?;
                self.say(&format!("Created playlist #{id}: {}", name.trim()))?;
            }
            Command::PlaylistAdd(playlist_id, track_id) => {
                self.store.add_track_to_playlist(playlist_id, track_id)?;
                if self.ui.source == ListingSource::Playlist(playlist_id) {
                    self.reload_listing()?;
                }
                let track = self.store.track(track_id)?;
                self.say(&format!("Added {} to playlist #{playlist_id}", track.title))?;
            }
            Command::PlaylistShow(id) => {
                let playlist = self.playlist(id)?;
                let tracks = self.store.list_playlist_tracks(id)?;
                self.say(&render::listing(
                    &playlist.name,
                    &tracks,
                    None,
                    &self.settings.library,
                    self.ui.theme,
                ))?;
            }
            Command::PlaylistLoad(id) => {
                self.playlist(id)?;
                self.ui.show_playlist(id);
                self.reload_listing()?;
                self.print_listing()?;
            }
            Command::Select(index) => {
                self.session.select(index)?;
                self.print_status()?;
            }
            Command::Play(Some(index)) => {
                self.session.play(index)?;
                self.print_now_playing()?;
            }
            Command::Play(None) => {
                match self.session.state() {
                    PlaybackState::Paused => self.session.resume(),
                    PlaybackState::Stopped => self.session.toggle_play_pause()?,
                    PlaybackState::Playing => {}
                }
                self.print_now_playing()?;
            }
            Command::Pause => {
                self.session.pause();
                self.print_status()?;
            }
            Command::Toggle => {
                self.session.toggle_play_pause()?;
                self.print_status()?;
            }
            Command::Stop => {
                if let Some(point) = self.session.stop() {
                    self.store.save_resume_point(&point)?;
                }
                self.say("Stopped")?;
            }
            Command::Next => match self.session.next()? {
                Some(point) => {
                    self.store.save_resume_point(&point)?;
                    self.say("End of listing")?;
                }
                None => self.print_now_playing()?,
            },
            Command::Prev => {
                self.session.previous()?;
                self.print_now_playing()?;
            }
            Command::Volume(level) => {
                let level = self.session.set_volume(level)?;
                self.say(&format!("Volume: {:.0}%", level * 100.0))?;
            }
            Command::Repeat => {
                let mode = self.session.cycle_repeat();
                self.say(&format!("Repeat: {}", mode.label()))?;
            }
            Command::Shuffle => {
                let on = self.session.toggle_shuffle();
                self.say(if on { "Shuffle: On" } else { "Shuffle: Off" })?;
            }
            Command::Sleep(Some(minutes)) => {
                self.session.set_sleep_timer(minutes, Instant::now())?;
                self.say(&format!("Playback stops in {minutes} min"))?;
            }
            Command::Sleep(None) => {
                if self.session.cancel_sleep_timer() {
                    self.say("Sleep timer cancelled")?;
                } else {
                    self.say("No sleep timer set")?;
                }
            }
            Command::Status => self.print_status()?,
            Command::Theme => {
                let theme = self.ui.toggle_theme();
                let line = theme.paint(&format!("Theme: {}", theme.label()));
                self.say(&line)?;
            }
            Command::Config => {
                let rendered = self
                    .settings
                    .to_toml()
                    .map_err(|e| Error::validation(format!("cannot render settings: {e}")))?;
                self.say(rendered.trim_end())?;
            }
            Command::Help => self.say(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Advance the session clock and report anything that happened on its own.
    ///
    /// Like commands, failures here are printed rather than returned.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        match self.session.tick(now) {
            Ok(None) => Ok(()),
            Ok(Some(TickEvent::SleepTimerFired(point))) => {
                self.remember(point)?;
                self.say("Sleep timer: playback stopped")
            }
            Ok(Some(TickEvent::Advanced(_))) => self.print_now_playing(),
            Ok(Some(TickEvent::Finished(point))) => {
                self.remember(point)?;
                self.say("End of listing")
            }
            Err(err) => self.say(&render::notice(&err)),
        }
    }

    fn remember(&mut self, point: Option<ResumePoint>) -> Result<()> {
        let Some(point) = point else {
            return Ok(());
        };
        match self.store.save_resume_point(&point) {
            Ok(()) => Ok(()),
            Err(err) => self.say(&render::notice(&err)),
        }
    }

    /// Remember where playback is so the next start can pick it up.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(point) = self.session.resume_point() {
            self.store.save_resume_point(&point)?;
            tracing::debug!(track_id = point.track_id, "saved resume point");
        }
        self.session.stop();
        self.out.flush()?;
        Ok(())
    }

    fn prepare(&self, input: TrackInput) -> Result<NewTrack> {
        library::prepare_track(
            input,
            &LoftyDurationReader,
            Duration::from_secs(self.settings.library.fallback_duration_secs),
        )
    }

    fn import(&mut self, dir: &Path) -> Result<()> {
        let summary = library::import_dir(&self.store, dir, &self.settings.library)?;
        self.reload_listing()?;
        let mut line = format!(
            "Imported {} new track(s), {} already in the library",
            summary.added, summary.skipped
        );
        if summary.failed > 0 {
            line.push_str(&format!(", {} could not be added", summary.failed));
        }
        self.say(&line)
    }

    fn playlist(&self, id: PlaylistId) -> Result<Playlist> {
        self.store
            .list_playlists()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::playlist_not_found(id))
    }

    fn print_listing(&mut self) -> Result<()> {
        let heading = match self.ui.source {
            ListingSource::Library => match &self.ui.filter {
                Some(filter) => format!("Library matching \"{filter}\""),
                None => "Library".to_string(),
            },
            ListingSource::Playlist(id) => self.playlist(id)?.name,
        };
        let text = render::listing(
            &heading,
            self.session.tracks(),
            self.session.current_index(),
            &self.settings.library,
            self.ui.theme,
        );
        self.say(&text)
    }

    fn print_now_playing(&mut self) -> Result<()> {
        let display = self.session.display(Instant::now());
        let line = self.ui.theme.paint(&display.now_playing_label());
        self.say(&line)
    }

    fn print_status(&mut self) -> Result<()> {
        let text = render::status(&self.session.display(Instant::now()), self.ui.theme);
        self.say(&text)
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

#[cfg(test)]
impl<D, W> Shell<D, W> {
    pub fn session(&self) -> &PlaybackSession<D> {
        &self.session
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}
