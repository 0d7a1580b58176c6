// ABOUTME: SSH transport for remote commands and runtime socket tunnels.
// ABOUTME: Built on russh with known_hosts checking and key, agent or password login.

mod auth;
mod channel;
mod client;
mod config;
mod error;
mod forward;
mod host_keys;

pub use channel::CommandChannel;
pub use client::{CommandOutput, Session};
pub use config::{DEFAULT_COMMAND_TIMEOUT, SessionConfig};
pub use error::{Error, Result};
pub use forward::ForwardHandle;
