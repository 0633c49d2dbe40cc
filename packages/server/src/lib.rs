//! Realtime presence and statistics broadcast server for the Joblink marketplace.
//!
//! Clients connect over WebSocket, join a room per project or freelancer
//! detail page, and receive live viewer counts and stat updates for the
//! entity they are looking at.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
