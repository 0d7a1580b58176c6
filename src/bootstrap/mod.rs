// ABOUTME: Remote Docker bootstrap over a command channel.
// ABOUTME: Idempotent: an up-to-date host is checked and left untouched.

mod bootstrapper;
mod error;
pub mod script;

pub use bootstrapper::{
    BootstrapOptions, BootstrapOutcome, BootstrapReport, BootstrapState, Bootstrapper,
};
pub use error::BootstrapError;
