//! Line-oriented command shell over a [`PlaylistEngine`].
//!
//! The shell owns nothing but the engine and an output sink. It parses one
//! command per line, calls the engine and renders the result as prose or
//! as one JSON object per line.

use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use crate::config::{OutputFormat, ShellConfig};
use crate::error::{Error, NoOpReason, ResultExt};
use crate::playlist::{PlayEvent, PlaylistEngine, Verdict};

const HELP: &[(&str, &str)] = &[
    ("ADD_SONG <id> <artist> <title>", "Add a new song to the playlist"),
    ("PLAY", "Play the current song"),
    ("NEXT", "Play the next valid song (respecting K)"),
    ("PREV", "Go back to the previous played song"),
    ("ADD_NEXT <id>", "Force a specific song to play next"),
    ("SET_RESTRICTION_K <k>", "Set artist repetition gap"),
    ("EXIT", "Close the program"),
];

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSong {
        id: String,
        artist: String,
        title: String,
    },
    Play,
    Next,
    Prev,
    AddNext(String),
    /// Raw K as typed; may be negative
    SetRestrictionK(i64),
    Help,
    Exit,
}

/// A line that could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Error: Invalid numeric value provided.")]
    InvalidNumber,

    #[error("Unknown command: {0}. Type 'HELP' for assistance.")]
    Unknown(String),
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `None` for blank lines and `#` comments. A leading `"> "` is
    /// then dropped so examples can be pasted straight from documentation;
    /// the comment check happens first, so `> # x` is an unknown command.
    pub fn parse(line: &str) -> Option<Result<Self, ParseError>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let line = line.strip_prefix("> ").unwrap_or(line);

        let mut parts = line.split_whitespace();
        let word = parts.next()?.to_uppercase();
        let args: Vec<&str> = parts.collect();

        let command = match word.as_str() {
            "ADD_SONG" => match args.as_slice() {
                [id, artist, title @ ..] if !title.is_empty() => Ok(Self::AddSong {
                    id: id.to_string(),
                    artist: artist.to_string(),
                    title: title.join(" "),
                }),
                _ => Err(ParseError::Usage("ADD_SONG <id> <artist> <title>")),
            },
            "PLAY" => Ok(Self::Play),
            "NEXT" => Ok(Self::Next),
            "PREV" => Ok(Self::Prev),
            "ADD_NEXT" => match args.first() {
                Some(id) => Ok(Self::AddNext(id.to_string())),
                None => Err(ParseError::Usage("ADD_NEXT <id>")),
            },
            "SET_RESTRICTION_K" => match args.first() {
                Some(k) => k
                    .parse()
                    .map(Self::SetRestrictionK)
                    .map_err(|_| ParseError::InvalidNumber),
                None => Err(ParseError::Usage("SET_RESTRICTION_K <k>")),
            },
            "HELP" => Ok(Self::Help),
            "EXIT" | "QUIT" => Ok(Self::Exit),
            _ => Err(ParseError::Unknown(word.clone())),
        };

        Some(command)
    }
}

/// Whether the shell should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a command produced, ready to render.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
enum Response<'a> {
    Added {
        id: &'a str,
        artist: &'a str,
        title: &'a str,
    },
    Played(&'a PlayEvent),
    Restored {
        id: &'a str,
        artist: &'a str,
    },
    Queued {
        id: &'a str,
        artist: &'a str,
        title: &'a str,
    },
    WindowSet {
        window: usize,
    },
    Help {
        commands: Vec<&'static str>,
    },
    Goodbye,
    Error {
        kind: &'static str,
        message: String,
    },
}

/// Interactive front end for one engine instance.
pub struct Shell<W: Write> {
    engine: PlaylistEngine,
    settings: ShellConfig,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(engine: PlaylistEngine, settings: ShellConfig, out: W) -> Self {
        Self {
            engine,
            settings,
            out,
        }
    }

    pub fn engine(&self) -> &PlaylistEngine {
        &self.engine
    }

    /// Consume the shell and hand back its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until EXIT or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        info!("Shell started");
        if self.settings.format == OutputFormat::Text {
            writeln!(self.out, "=== Smart-Shuffle Streaming Engine CLI ===")?;
            writeln!(self.out, "Type 'HELP' to see available commands or 'EXIT' to quit.")?;
        }

        let mut lines = input.lines();
        loop {
            if !self.settings.prompt.is_empty() {
                write!(self.out, "{}", self.settings.prompt)?;
                self.out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            if self.execute(&line?)? == Flow::Exit {
                break;
            }
        }

        info!("Shell finished");
        Ok(())
    }

    /// Execute one line and write its output.
    pub fn execute(&mut self, line: &str) -> io::Result<Flow> {
        let command = match Command::parse(line) {
            None => return Ok(Flow::Continue),
            Some(Err(e)) => {
                debug!(line, error = %e, "Rejected command");
                self.emit(&Response::Error {
                    kind: parse_error_kind(&e),
                    message: e.to_string(),
                })?;
                return Ok(Flow::Continue);
            }
            Some(Ok(command)) => command,
        };

        debug!(?command, "Executing");
        match command {
            Command::AddSong { id, artist, title } => {
                self.engine.add_song(id.as_str(), artist.as_str(), title.as_str());
                self.emit(&Response::Added {
                    id: &id,
                    artist: &artist,
                    title: &title,
                })?;
            }
            Command::Play => match self.engine.play().with_context("PLAY") {
                Ok(event) => self.emit(&Response::Played(&event))?,
                Err(e) => self.emit_error(&e)?,
            },
            Command::Next => match self.engine.advance().with_context("NEXT") {
                Ok(event) => self.emit(&Response::Played(&event))?,
                Err(e) => self.emit_error(&e)?,
            },
            Command::Prev => match self.engine.rewind().with_context("PREV") {
                Ok(song) => {
                    let response = Response::Restored {
                        id: &song.id,
                        artist: &song.artist,
                    };
                    render(&mut self.out, &self.settings, &response)?;
                }
                Err(e) => self.emit_error(&e)?,
            },
            Command::AddNext(id) => match self.engine.force_next(&id).with_context("ADD_NEXT") {
                Ok(song) => {
                    let response = Response::Queued {
                        id: &song.id,
                        artist: &song.artist,
                        title: &song.title,
                    };
                    render(&mut self.out, &self.settings, &response)?;
                }
                Err(e) => match e.root() {
                    // Already current: nothing moves, but it still plays next
                    Error::NoOp(NoOpReason::AlreadyCurrent) => match self.engine.find(&id) {
                        Ok(song) => {
                            let response = Response::Queued {
                                id: &song.id,
                                artist: &song.artist,
                                title: &song.title,
                            };
                            render(&mut self.out, &self.settings, &response)?;
                        }
                        Err(e) => self.emit_error(&e)?,
                    },
                    Error::NoOp(NoOpReason::EmptyPlaylist) => {
                        self.emit_error(&Error::not_found(id.as_str()))?
                    }
                    _ => self.emit_error(&e)?,
                },
            },
            Command::SetRestrictionK(k) => match usize::try_from(k) {
                Ok(window) => {
                    self.engine.set_cooldown_window(window);
                    self.emit(&Response::WindowSet { window })?;
                }
                Err(_) => self.emit_error(&Error::invalid_config(format!(
                    "cooldown window must not be negative (got {k})"
                )))?,
            },
            Command::Help => {
                self.emit(&Response::Help {
                    commands: HELP.iter().map(|(usage, _)| *usage).collect(),
                })?;
            }
            Command::Exit => {
                self.emit(&Response::Goodbye)?;
                return Ok(Flow::Exit);
            }
        }

        Ok(Flow::Continue)
    }

    fn emit(&mut self, response: &Response<'_>) -> io::Result<()> {
        render(&mut self.out, &self.settings, response)
    }

    fn emit_error(&mut self, err: &Error) -> io::Result<()> {
        let (kind, message) = match err.root() {
            Error::NotFound(id) => ("not_found", format!("Error: Song {id} not found.")),
            Error::NoOp(_) => ("no_op", err.to_string()),
            Error::InvalidConfiguration(_) => ("invalid_configuration", format!("Error: {err}")),
            Error::WithContext { .. } => ("error", format!("Error: {err}")),
        };
        self.emit(&Response::Error { kind, message })
    }
}

fn parse_error_kind(err: &ParseError) -> &'static str {
    match err {
        ParseError::Usage(_) => "usage",
        ParseError::InvalidNumber => "invalid_number",
        ParseError::Unknown(_) => "unknown_command",
    }
}

/// Write one response in the configured format.
fn render<W: Write>(out: &mut W, settings: &ShellConfig, response: &Response<'_>) -> io::Result<()> {
    if settings.format == OutputFormat::Json {
        return writeln!(out, "{}", serde_json::to_string(response)?);
    }

    match response {
        Response::Added { id, artist, title } => {
            writeln!(out, "Added: {title} by {artist} ({id})")
        }
        Response::Played(event) => {
            if settings.show_trace {
                for check in &event.trace {
                    let verdict = match check.verdict {
                        Verdict::Accepted => "Yes".to_string(),
                        Verdict::AcceptedOverride => "Yes - Priority".to_string(),
                        Verdict::SkippedCooldown => {
                            format!("NO! Recent {}. Skipping {}...", check.artist, check.id)
                        }
                    };
                    writeln!(
                        out,
                        "(Natural next is {} {}... Valid? {verdict})",
                        check.id, check.artist
                    )?;
                }
            }
            let expired = event
                .evicted
                .as_ref()
                .map(|a| format!(" ({a} expired)"))
                .unwrap_or_default();
            writeln!(
                out,
                "Playing: {} ({}). Cooldown: [{}].{expired}",
                event.id,
                event.artist,
                event.window.join(", ")
            )
        }
        Response::Restored { id, artist } => {
            writeln!(out, "Playing: {id} ({artist}) - Restored from History.")
        }
        Response::Queued { artist, title, .. } => {
            writeln!(out, "Queued Next: {title} by {artist}")
        }
        Response::WindowSet { window } => writeln!(out, "Restriction K set to {window}"),
        Response::Help { .. } => {
            writeln!(out, "\nAvailable Commands:")?;
            for (usage, about) in HELP {
                writeln!(out, "  {usage:<31}- {about}")?;
            }
            writeln!(out)
        }
        Response::Goodbye => writeln!(out, "Goodbye!"),
        Response::Error { message, .. } => writeln!(out, "{message}"),
    }
}
