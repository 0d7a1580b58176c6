// ABOUTME: Library root for redeploy - exposes the rollout engine and its building blocks.
// ABOUTME: The CLI binary is in main.rs.

pub mod bootstrap;
pub mod build;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod runtime;
pub mod ssh;
pub mod types;
pub mod version;
