//! Service implementations for the host interfaces
//!
//! Default implementations over the module container format, so the resolver
//! runs end to end without a host supplying its own.

pub mod configured_roots;
pub mod container;
pub mod container_inspector;
pub mod container_loader;

pub use configured_roots::ConfiguredSearchRoots;
pub use container_inspector::ContainerInspector;
pub use container_loader::ContainerLoader;
