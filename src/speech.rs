use std::env;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use thiserror::Error;

use crate::catalog::VerbRecord;

/// Text-to-speech programs tried in order when none is configured.
const CANDIDATES: &[&str] = &["espeak-ng", "espeak", "say", "spd-say"];

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no text-to-speech program found")]
    Unavailable,
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fire-and-forget pronunciation through an external TTS program.
/// At most one utterance plays at a time; starting a new one cancels the old.
pub struct Speaker {
    program: Option<PathBuf>,
    rate_wpm: u32,
    child: Option<Child>,
}

impl Speaker {
    pub fn detect(configured: Option<&str>, rate_wpm: u32) -> Self {
        let program = match configured {
            Some(name) if !name.trim().is_empty() => find_program(name.trim()),
            _ => CANDIDATES.iter().find_map(|name| find_program(name)),
        };
        match &program {
            Some(path) => tracing::info!(program = %path.display(), "speech enabled"),
            None => tracing::info!("no speech program found; pronunciation disabled"),
        }
        Self {
            program,
            rate_wpm,
            child: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            program: None,
            rate_wpm: 0,
            child: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }

    pub fn is_speaking(&mut self) -> bool {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => true,
            Some(_) => {
                self.child = None;
                false
            }
            None => false,
        }
    }

    pub fn speak_verb(&mut self, verb: &VerbRecord) -> Result<(), SpeechError> {
        self.speak(&verb.spoken_forms())
    }

    pub fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.stop();
        let program = self.program.as_ref().ok_or(SpeechError::Unavailable)?;
        let child = Command::new(program)
            .args(speech_args(program, text, self.rate_wpm))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        self.child = Some(child);
        Ok(())
    }

    /// Start pronouncing `verb`, or stop if something is already playing.
    pub fn toggle(&mut self, verb: &VerbRecord) -> Result<(), SpeechError> {
        if self.is_speaking() {
            self.stop();
            Ok(())
        } else {
            self.speak_verb(verb)
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn find_program(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// Command-line arguments for the known TTS programs. Unknown programs get
/// the text as their only argument.
pub fn speech_args(program: &Path, text: &str, rate_wpm: u32) -> Vec<String> {
    let name = program
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let rate = rate_wpm.to_string();
    match name {
        "espeak-ng" | "espeak" => vec![
            "-v".to_string(),
            "en-us".to_string(),
            "-s".to_string(),
            rate,
            text.to_string(),
        ],
        "say" => vec!["-r".to_string(), rate, text.to_string()],
        "spd-say" => vec![
            "-l".to_string(),
            "en".to_string(),
            "-w".to_string(),
            text.to_string(),
        ],
        _ => vec![text.to_string()],
    }
}
