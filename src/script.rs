//! Scripted editing sessions
//!
//! A [`Script`] is a named list of [`Command`]s replayed against one
//! [`GapBuffer`]. Visible commands hand the buffer to a [`FrameSink`] after
//! every step so each edit becomes one frame of the animation; quiet commands
//! change the buffer without emitting frames.
//!
//! Scripts can be written in YAML:
//!
//! ```yaml
//! name: hello
//! capacity: 8
//! commands:
//!   - wait: 10
//!   - insert_run: "Hello, buffer."
//!   - backward: 7
//!   - backspace: 2
//!   - quiet_move: -3
//! ```

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gap_buffer::GapBuffer;

/// One step of a scripted session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Emit `n` frames without touching the buffer
    Wait(usize),
    /// Step the cursor right `n` times, one frame per step
    Forward(usize),
    /// Step the cursor left `n` times, one frame per step
    Backward(usize),
    /// Relocate the cursor by a signed offset without emitting a frame
    #[serde(alias = "move")]
    QuietMove(isize),
    /// Insert one unit and emit a frame
    Insert(char),
    /// Insert one unit silently
    QuietInsert(char),
    /// Type a run one unit at a time, one frame per unit
    InsertRun(String),
    /// Insert a whole run in one operation without emitting a frame
    QuietInsertRun(String),
    /// Delete forward `n` times, one frame per deletion
    Delete(usize),
    /// Delete backward `n` times, one frame per deletion
    Backspace(usize),
}

impl Command {
    /// Frames this command emits when replayed
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Wait(n) | Self::Forward(n) | Self::Backward(n) => *n,
            Self::Delete(n) | Self::Backspace(n) => *n,
            Self::Insert(_) => 1,
            Self::InsertRun(text) => text.len(),
            Self::QuietMove(_) | Self::QuietInsert(_) | Self::QuietInsertRun(_) => 0,
        }
    }
}

/// Errors that can occur when loading a script
#[derive(Debug, Clone)]
pub enum ScriptError {
    IoError(String),
    ParseError(String),
    Invalid(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::IoError(e) => write!(f, "IO error: {}", e),
            ScriptError::ParseError(e) => write!(f, "Parse error: {}", e),
            ScriptError::Invalid(e) => write!(f, "Invalid script: {}", e),
        }
    }
}

impl std::error::Error for ScriptError {}

fn default_capacity() -> usize {
    16
}

/// A named editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Used for output file names
    pub name: String,
    /// Initial buffer capacity
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub commands: Vec<Command>,
}

impl Script {
    pub fn new(name: &str, capacity: usize, commands: Vec<Command>) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            commands,
        }
    }

    /// Parse and validate a YAML script
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        let script: Script =
            serde_yaml::from_str(yaml).map_err(|e| ScriptError::ParseError(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Load a YAML script from disk
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Check the name is usable as a file name and every inserted unit is a byte
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.name.is_empty() {
            return Err(ScriptError::Invalid("name must not be empty".to_string()));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ScriptError::Invalid(format!(
                "name '{}' may only contain ASCII letters, digits, '-' and '_'",
                self.name
            )));
        }

        for (index, command) in self.commands.iter().enumerate() {
            let ascii = match command {
                Command::Insert(c) | Command::QuietInsert(c) => c.is_ascii(),
                Command::InsertRun(s) | Command::QuietInsertRun(s) => s.is_ascii(),
                _ => true,
            };
            if !ascii {
                return Err(ScriptError::Invalid(format!(
                    "command {} inserts non-ASCII text: {:?}",
                    index, command
                )));
            }
        }
        Ok(())
    }

    /// Total frames a replay will emit, saturating at `usize::MAX`
    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .map(Command::frame_count)
            .fold(0, usize::saturating_add)
    }
}

/// Receives the buffer after every visible step of a replay
pub trait FrameSink {
    fn frame(&mut self, buffer: &GapBuffer) -> Result<()>;

    /// Called once after the last command
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Summary of a finished replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStats {
    pub frames: usize,
    pub content: Vec<u8>,
    pub cursor: usize,
    pub capacity: usize,
}

struct Player<'a, S: FrameSink + ?Sized> {
    buffer: GapBuffer,
    sink: &'a mut S,
    frames: usize,
}

impl<S: FrameSink + ?Sized> Player<'_, S> {
    fn emit(&mut self) -> Result<()> {
        self.sink.frame(&self.buffer)?;
        self.frames += 1;
        Ok(())
    }

    /// Run `step` `n` times, emitting a frame after each
    fn repeat(&mut self, n: usize, step: fn(&mut GapBuffer) -> bool) -> Result<()> {
        for _ in 0..n {
            step(&mut self.buffer);
            self.emit()?;
        }
        Ok(())
    }

    fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Wait(n) => {
                for _ in 0..*n {
                    self.emit()?;
                }
            }
            Command::Forward(n) => self.repeat(*n, GapBuffer::step_forward)?,
            Command::Backward(n) => self.repeat(*n, GapBuffer::step_backward)?,
            Command::QuietMove(delta) => {
                self.buffer.move_cursor(*delta);
            }
            Command::Insert(c) => {
                self.buffer.insert(*c as u8)?;
                self.emit()?;
            }
            Command::QuietInsert(c) => self.buffer.insert(*c as u8)?,
            Command::InsertRun(text) => {
                for unit in text.bytes() {
                    self.buffer.insert(unit)?;
                    self.emit()?;
                }
            }
            Command::QuietInsertRun(text) => self.buffer.insert_slice(text.as_bytes())?,
            Command::Delete(n) => self.repeat(*n, GapBuffer::delete_forward)?,
            Command::Backspace(n) => self.repeat(*n, GapBuffer::delete_backward)?,
        }
        Ok(())
    }
}

/// Replay `script` against a fresh buffer, feeding frames to `sink`
pub fn play<S: FrameSink + ?Sized>(script: &Script, sink: &mut S) -> Result<PlaybackStats> {
    script.validate()?;

    let buffer = GapBuffer::with_capacity(script.capacity)
        .with_context(|| format!("creating buffer for script '{}'", script.name))?;
    let mut player = Player {
        buffer,
        sink,
        frames: 0,
    };

    for (index, command) in script.commands.iter().enumerate() {
        tracing::trace!(script = %script.name, index, ?command, "replaying command");
        player
            .apply(command)
            .with_context(|| format!("script '{}', command {}: {:?}", script.name, index, command))?;
    }
    player.sink.finish()?;

    let stats = PlaybackStats {
        frames: player.frames,
        content: player.buffer.to_vec(),
        cursor: player.buffer.cursor(),
        capacity: player.buffer.capacity(),
    };
    tracing::info!(
        script = %script.name,
        frames = stats.frames,
        capacity = stats.capacity,
        "replay finished"
    );
    Ok(stats)
}
