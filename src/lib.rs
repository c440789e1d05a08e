//! Terminal client for the chatcom demo room.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` runs the `/signin` handshake, `connection` owns the websocket,
//! `envelope` defines the wire shapes, `window` holds the chat log and
//! participant list, and `render` draws both to the terminal. `client` ties
//! them into a single run.

pub mod client;
pub mod config;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod render;
pub mod session;
pub mod window;

pub use client::run;
pub use config::ClientConfig;
pub use error::ChatError;
