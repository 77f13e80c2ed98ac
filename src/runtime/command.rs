use std::path::PathBuf;

use crate::catalog::{PlaylistId, TrackId};
use crate::error::{Error, Result};
use crate::library::TrackInput;

/// One line of shell input.
///
/// Positions (`select`, `play`) are 1-based in the input and stored
/// 0-based; ids are catalog ids.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List(Option<String>),
    Add(TrackInputArgs),
    Edit(TrackId, TrackInputArgs),
    Delete(TrackId),
    Clear,
    Import(PathBuf),
    Playlists,
    PlaylistNew(String),
    PlaylistAdd(PlaylistId, TrackId),
    PlaylistShow(PlaylistId),
    PlaylistLoad(PlaylistId),
    Library,
    Select(usize),
    Play(Option<usize>),
    Pause,
    Toggle,
    Stop,
    Next,
    Prev,
    Volume(f32),
    Repeat,
    Shuffle,
    Sleep(Option<u64>),
    Status,
    Theme,
    Config,
    Help,
    Quit,
}

/// `<path> <title> <artist> [album] [genre]`
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInputArgs {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
}

impl From<TrackInputArgs> for TrackInput {
    fn from(args: TrackInputArgs) -> Self {
        TrackInput {
            path: args.path,
            title: args.title,
            artist: args.artist,
            album: args.album,
            genre: args.genre,
        }
    }
}

pub const HELP: &str = "\
Library
  list [filter]                              show the library, optionally filtered by title
  add <path> <title> <artist> [album] [genre]
  edit <id> <path> <title> <artist> [album] [genre]
  delete <id>
  clear                                      remove every track and playlist
  import <dir>                               add every audio file under <dir>
Playlists
  playlists
  playlist new <name>
  playlist add <playlist-id> <track-id>
  playlist show <playlist-id>
  playlist load <playlist-id>                play from a playlist
  library                                    play from the whole library again
Playback
  select <n>  play [n]  pause  toggle  stop  next  prev
  volume <0..1>  repeat  shuffle  sleep <minutes>|off
Other
  status  theme  config  help  quit

Words containing spaces can be wrapped in double quotes.";

/// Split a line on whitespace, keeping double-quoted runs together.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(Error::validation("unterminated quote"));
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

impl Command {
    /// Parse a line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List(optional_rest(args)),
            "add" => Command::Add(track_args(args)?),
            "edit" => {
                let (id, rest) = args
                    .split_first()
                    .ok_or_else(|| usage("edit <id> <path> <title> <artist> [album] [genre]"))?;
                Command::Edit(number(id, "track id")?, track_args(rest)?)
            }
            "delete" | "rm" => Command::Delete(single_number(args, "delete <id>", "track id")?),
            "clear" => Command::Clear,
            "import" => Command::Import(PathBuf::from(single(args, "import <dir>")?)),
            "playlists" => Command::Playlists,
            "playlist" => playlist(args)?,
            "library" => Command::Library,
            "select" => Command::Select(position(single(args, "select <n>")?)?),
            "play" => match args {
                [] => Command::Play(None),
                [n] => Command::Play(Some(position(n)?)),
                _ => return Err(usage("play [n]")),
            },
            "pause" => Command::Pause,
            "toggle" => Command::Toggle,
            "stop" => Command::Stop,
            "next" => Command::Next,
            "prev" | "previous" => Command::Prev,
            "volume" | "vol" => {
                let raw = single(args, "volume <0..1>")?;
                let level = raw
                    .parse::<f32>()
                    .map_err(|_| Error::validation(format!("'{raw}' is not a volume between 0 and 1")))?;
                Command::Volume(level)
            }
            "repeat" => Command::Repeat,
            "shuffle" => Command::Shuffle,
            "sleep" => {
                let raw = single(args, "sleep <minutes>|off")?;
                if raw.eq_ignore_ascii_case("off") {
                    Command::Sleep(None)
                } else {
                    Command::Sleep(Some(number(raw, "minutes")?))
                }
            }
            "status" => Command::Status,
            "theme" => Command::Theme,
            "config" => Command::Config,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(Error::validation(format!(
                    "unknown command '{other}' (try 'help')"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn playlist(args: &[String]) -> Result<Command> {
    let Some((sub, rest)) = args.split_first() else {
        return Err(usage("playlist new|add|show|load ..."));
    };
    match sub.to_ascii_lowercase().as_str() {
        "new" => {
            if rest.is_empty() {
                return Err(usage("playlist new <name>"));
            }
            Ok(Command::PlaylistNew(rest.join(" ")))
        }
        "add" => match rest {
            [playlist, track] => Ok(Command::PlaylistAdd(
                number(playlist, "playlist id")?,
                number(track, "track id")?,
            )),
            _ => Err(usage("playlist add <playlist-id> <track-id>")),
        },
        "show" => Ok(Command::PlaylistShow(single_number(
            rest,
            "playlist show <playlist-id>",
            "playlist id",
        )?)),
        "load" => Ok(Command::PlaylistLoad(single_number(
            rest,
            "playlist load <playlist-id>",
            "playlist id",
        )?)),
        other => Err(Error::validation(format!(
            "unknown playlist command '{other}'"
        ))),
    }
}

fn track_args(args: &[String]) -> Result<TrackInputArgs> {
    match args {
        [path, title, artist, extra @ ..] if extra.len() <= 2 => Ok(TrackInputArgs {
            path: PathBuf::from(path),
            title: title.clone(),
            artist: artist.clone(),
            album: extra.first().cloned(),
            genre: extra.get(1).cloned(),
        }),
        _ => Err(usage("<path> <title> <artist> [album] [genre]")),
    }
}

fn optional_rest(args: &[String]) -> Option<String> {
    (!args.is_empty()).then(|| args.join(" "))
}

fn single<'a>(args: &'a [String], shape: &str) -> Result<&'a str> {
    match args {
        [one] => Ok(one.as_str()),
        _ => Err(usage(shape)),
    }
}

fn single_number<T: std::str::FromStr>(args: &[String], shape: &str, what: &str) -> Result<T> {
    number(single(args, shape)?, what)
}

fn number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::validation(format!("'{raw}' is not a valid {what}")))
}

/// A 1-based listing position, returned 0-based.
fn position(raw: &str) -> Result<usize> {
    match number::<usize>(raw, "position")? {
        0 => Err(Error::validation("positions start at 1")),
        n => Ok(n - 1),
    }
}

fn usage(shape: &str) -> Error {
    Error::validation(format!("usage: {shape}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn tokenize_groups_quoted_words() {
        assert_eq!(
            tokenize(r#"add "/music/Born This Way/judas.mp3" Judas "Lady Gaga""#).unwrap(),
            vec!["add", "/music/Born This Way/judas.mp3", "Judas", "Lady Gaga"]
        );
        assert_eq!(tokenize(r#"list """#).unwrap(), vec!["list", ""]);
        assert!(tokenize("   ").unwrap().is_empty());
        assert!(tokenize(r#"add "oops"#).is_err());
    }

    #[test]
    fn blank_lines_parse_to_nothing() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("  \t ").unwrap(), None);
    }

    #[test]
    fn add_accepts_optional_album_and_genre() {
        let Command::Add(args) = parse(r#"add a.mp3 Judas "Lady Gaga" "Born This Way" Pop"#) else {
            panic!("expected add");
        };
        assert_eq!(args.path, PathBuf::from("a.mp3"));
        assert_eq!(args.artist, "Lady Gaga");
        assert_eq!(args.album.as_deref(), Some("Born This Way"));
        assert_eq!(args.genre.as_deref(), Some("Pop"));

        let Command::Add(args) = parse("add a.mp3 Judas Gaga") else {
            panic!("expected add");
        };
        assert_eq!(args.album, None);

        assert!(Command::parse("add a.mp3 Judas").is_err());
        assert!(Command::parse("add a b c d e f").is_err());
    }

    #[test]
    fn edit_takes_an_id_first() {
        let Command::Edit(id, args) = parse("edit 7 b.mp3 Alejandro Gaga") else {
            panic!("expected edit");
        };
        assert_eq!(id, 7);
        assert_eq!(args.title, "Alejandro");
        assert!(Command::parse("edit x b.mp3 A B").is_err());
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse("select 1"), Command::Select(0));
        assert_eq!(parse("play 3"), Command::Play(Some(2)));
        assert_eq!(parse("play"), Command::Play(None));
        assert!(Command::parse("select 0").is_err());
        assert!(Command::parse("select -1").is_err());
    }

    #[test]
    fn playlist_subcommands() {
        assert_eq!(
            parse("playlist new Road Trip"),
            Command::PlaylistNew("Road Trip".into())
        );
        assert_eq!(parse("playlist add 1 2"), Command::PlaylistAdd(1, 2));
        assert_eq!(parse("playlist show 4"), Command::PlaylistShow(4));
        assert_eq!(parse("playlist load 4"), Command::PlaylistLoad(4));
        assert!(Command::parse("playlist add 1").is_err());
        assert!(Command::parse("playlist rename 1").is_err());
    }

    #[test]
    fn volume_and_sleep_arguments() {
        assert_eq!(parse("volume 0.25"), Command::Volume(0.25));
        assert!(Command::parse("volume loud").is_err());
        assert_eq!(parse("sleep 30"), Command::Sleep(Some(30)));
        assert_eq!(parse("sleep OFF"), Command::Sleep(None));
        assert!(Command::parse("sleep soon").is_err());
    }

    #[test]
    fn list_joins_the_filter_words() {
        assert_eq!(parse("list"), Command::List(None));
        assert_eq!(
            parse("LIST bloody mary"),
            Command::List(Some("bloody mary".into()))
        );
    }

    #[test]
    fn unknown_commands_are_warnings() {
        let err = Command::parse("dance").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
