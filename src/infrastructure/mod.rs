//! 基础设施层
//!
//! 提供按名称注册与解析对象的容器实现

// 容器实现
pub mod container;

// 重新导出API
pub use container::{Entry, Key, Object, Registry, Resolver};
