//! gapvis - gap buffer engine and animation renderer
//!
//! The core is [`gap_buffer::GapBuffer`], a single-cursor byte buffer with an
//! unused gap parked at the cursor. Around it sit a scripted-session player,
//! built-in demo scripts and a renderer that turns each buffer state into a
//! frame showing both the logical text and the physical storage layout.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod demos;
pub mod gap_buffer;
pub mod output;
pub mod script;
pub mod theme;
pub mod tracing;
pub mod view;

// Re-export commonly used types
pub use config::AnimConfig;
pub use gap_buffer::{GapBuffer, GapBufferError};
pub use script::{play, Command, FrameSink, Script};
