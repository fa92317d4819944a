//! Core interfaces for the host seams
//!
//! The resolver never touches the host directly. Everything it needs from the
//! outside world (where plug-ins live, what a module file declares, how a file
//! becomes a resident module) comes through these traits, so hosts and tests
//! can swap implementations freely.

pub mod module_inspector;
pub mod module_loader;
pub mod search_roots;

pub use module_inspector::ModuleInspector;
pub use module_loader::ModuleLoader;
pub use search_roots::SearchRootProvider;
