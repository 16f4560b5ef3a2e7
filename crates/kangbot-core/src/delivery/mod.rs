//! Message delivery: one request per user message, empty-reply retries, and
//! character-by-character emission of the final text.
//!
//! The backend never streams. The chunks yielded here are a client-side
//! effect layered over a single complete response, so the renderer never
//! sees retries, only chunks (real or fallback) or a single error.

pub mod service;

pub use service::{DeliveryEvent, DeliveryStream, MessageDelivery, Reply};
