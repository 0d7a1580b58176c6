// ABOUTME: Capability traits between the deployment core and a container runtime.
// ABOUTME: Each trait is small so tests can fake exactly what a component uses.

mod containers;
mod daemon;
mod images;

pub use containers::{ContainerError, ContainerFilters, ContainerOps, ContainerSpec, ContainerSummary};
pub use daemon::{DaemonError, DaemonInfo, RuntimeInfo};
pub use images::{BuildOutput, ImageDetails, ImageError, ImageOps};

/// All three capabilities together, as the CLI hands them to commands.
pub trait ContainerRuntime: ImageOps + ContainerOps + RuntimeInfo {}

impl<T> ContainerRuntime for T where T: ImageOps + ContainerOps + RuntimeInfo {}
