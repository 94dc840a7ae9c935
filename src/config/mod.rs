pub mod catalog;
pub mod loader;

// Re-export commonly used types
pub use catalog::{Arguments, Catalog, Constructor};
pub use loader::{load_manifest, Manifest, ManifestEntry};
