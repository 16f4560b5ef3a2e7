//! Chat pipeline for kangbot.
//!
//! This crate defines the [`backend::ChatBackend`] port that the
//! infrastructure layer implements, and the services built on top of it.
//! It depends only on `kangbot-types`, never on `kangbot-infra` or any
//! HTTP crate.

pub mod auth;
pub mod backend;
pub mod chat;
pub mod delivery;
pub mod playback;
pub mod session;
