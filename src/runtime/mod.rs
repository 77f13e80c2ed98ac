use std::io;

use crate::catalog::{CatalogStore, MatchCase};
use crate::error::Result;
use crate::logging;
use crate::session::PlaybackSession;

use shell::Shell;

mod command;
mod event_loop;
mod render;
mod settings;
mod shell;
mod startup;
mod ui_state;


pub fn run() -> Result<()> {
    let (settings, config_problem) = settings::load_settings();
    logging::init(&settings.log);
    if let Some(problem) = config_problem {
        tracing::warn!("{problem}");
    }

    let db_path = settings.db_path();
    let match_case = if settings.library.case_sensitive_filter {
        MatchCase::Sensitive
    } else {
        MatchCase::Insensitive
    };
    let store = CatalogStore::open(&db_path)?.with_match_case(match_case);
    tracing::info!(db = %db_path.display(), "catalog ready");

    let mut session = PlaybackSession::new(startup::open_device());
    startup::apply_playback_defaults(&mut session, &settings)?;
    session.set_tracks(store.list_tracks(None)?);

    if let Err(err) = startup::restore_last_played(&store, &mut session, &settings) {
        tracing::warn!(error = %err, "could not restore last played track");
    }

    println!(
        "cadenza: {} song(s) in the library. Type 'help' for commands.",
        session.tracks().len()
    );

    let mut shell = Shell::new(settings, store, session, io::stdout());
    let lines = event_loop::spawn_stdin_reader()?;
    event_loop::run(&mut shell, &lines)
}
