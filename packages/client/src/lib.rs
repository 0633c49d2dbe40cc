//! CLI debug client for the joblink realtime presence server.
//!
//! Connects to the server's WebSocket endpoint, issues join/leave intents
//! and pretty-prints the realtime update stream.

pub mod error;
pub mod formatter;
pub mod session;
