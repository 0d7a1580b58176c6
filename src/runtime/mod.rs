// ABOUTME: Container runtime access: capability traits, the bollard client and connections.
// ABOUTME: The deployment core only ever sees the traits.

mod bollard;
mod connection;
mod error;
pub mod traits;

pub use self::bollard::BollardRuntime;
pub use connection::RuntimeConnection;
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::{
    BuildOutput, ContainerError, ContainerFilters, ContainerOps, ContainerRuntime, ContainerSpec,
    ContainerSummary, DaemonError, DaemonInfo, ImageDetails, ImageError, ImageOps, RuntimeInfo,
};
