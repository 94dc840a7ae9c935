//! 按名称装配应用对象的注册表
//!
//! 值可以直接注册，也可以通过工厂惰性计算；`Resolver::prepare`
//! 会一次性计算并冻结所有惰性条目。
#[cfg(feature = "manifest")]
pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod logging;

// Re-export commonly used items for convenience
#[cfg(feature = "manifest")]
pub use config::{load_manifest, Arguments, Catalog, Manifest};
pub use errors::{ConfigError, RegistryError, Result};
pub use infrastructure::{Key, Object, Resolver};
