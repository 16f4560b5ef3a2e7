//! Typewriter playback of bot replies.
//!
//! Entry point: [`engine::PlaybackEngine`].

pub mod engine;

pub use engine::{PlaybackEngine, PlaybackState};
