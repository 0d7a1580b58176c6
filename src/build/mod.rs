// ABOUTME: Image building from local build contexts.

mod builder;
pub mod context;
mod error;

pub use builder::{BuiltImage, ImageBuilder};
pub use error::BuildError;
