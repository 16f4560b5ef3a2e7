//! Infrastructure layer for kangbot.
//!
//! Contains the HTTP implementation of the `ChatBackend` port defined in
//! `kangbot-core`, and the config file loader.

pub mod config;
pub mod http;
