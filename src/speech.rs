// src/speech.rs - Speech collaborator shims
use std::io::{self, BufRead, Write};
use std::process::Command;

use tracing::warn;

/// Blocking transcript source.
///
/// Returns the lower-cased command text, or `None` when nothing usable
/// came back (not understood, service failure, closed input). Failure
/// kinds are announced by the implementation before it returns; the
/// caller treats every `None` the same way and ends the voice session.
pub trait SpeechToText {
    fn listen(&mut self) -> Option<String>;
}

/// Spoken (or printed) feedback channel. Sequencing matters, completion
/// timing does not.
pub trait Announcer {
    fn say(&mut self, text: &str);
}

/// Transcript source reading typed commands from standard input.
/// Stands in for a microphone pipeline during development, the same way
/// the landmark bridge stands in for the native detector.
pub struct ConsoleSpeech<R> {
    input: R,
}

impl ConsoleSpeech<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> ConsoleSpeech<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> SpeechToText for ConsoleSpeech<R> {
    fn listen(&mut self) -> Option<String> {
        print!("Listening... ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let command = line.trim().to_lowercase();
                if command.is_empty() {
                    None
                } else {
                    Some(command)
                }
            }
            Err(e) => {
                warn!("transcript read failed: {e}");
                None
            }
        }
    }
}

/// Candidate system speech binaries, most specific first.
const SPEECH_ENGINES: &[&str] = &["espeak", "spd-say", "say"];

/// Text-to-speech through whatever system speech binary is installed,
/// falling back to the console on headless machines. The call blocks
/// until the engine exits, which keeps announcements sequenced before
/// whatever logic follows them.
pub struct SpeechOutput {
    engine: Option<&'static str>,
}

impl SpeechOutput {
    pub fn new() -> Self {
        let engine = SPEECH_ENGINES
            .iter()
            .copied()
            .find(|cmd| Command::new(cmd).arg("--version").output().is_ok());

        if engine.is_none() {
            warn!("no speech engine found, announcements go to the console");
        }

        Self { engine }
    }
}

impl Default for SpeechOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Announcer for SpeechOutput {
    fn say(&mut self, text: &str) {
        println!("{text}");
        if let Some(engine) = self.engine {
            if let Err(e) = Command::new(engine).arg(text).status() {
                warn!("speech output via {engine} failed: {e}");
            }
        }
    }
}
