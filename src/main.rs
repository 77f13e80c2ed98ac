mod audio;
mod catalog;
mod config;
mod error;
mod library;
mod logging;
mod runtime;
mod session;

fn main() {
    if let Err(err) = runtime::run() {
        tracing::error!(error = %err, "cadenza stopped");
        eprintln!("cadenza: {err}");
        std::process::exit(1);
    }
}
