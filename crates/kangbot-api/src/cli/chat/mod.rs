//! Interactive CLI chat for kangbot.
//!
//! This module implements the chat loop: typewriter playback of bot replies,
//! a typing spinner, the welcome banner and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
