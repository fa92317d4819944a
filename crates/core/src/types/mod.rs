pub mod module;
pub mod request;
pub mod version;

// Re-export commonly used types
pub use module::{ContextKind, LoadedModule, ModuleHandle, ModuleHeader};
pub use request::{ResolutionRequest, SearchName};
pub use version::ModuleVersion;
