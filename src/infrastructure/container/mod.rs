//! 按名称解析对象的容器
//!
//! - `Registry`：键到条目的只追加存储
//! - `Entry`：立即值或带记忆化单元的惰性工厂
//! - `Resolver`：注册、解析与准备模式

pub mod entry;
pub mod registry;
pub mod resolver;

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

pub use entry::Entry;
pub use registry::Registry;
pub use resolver::Resolver;

/// 类型擦除后的存储值
pub type Object = Arc<dyn Any + Send + Sync>;

/// 条目名称
///
/// 不做任何规范化，`"db"` 与 `"DB"` 是两个不同的键。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self(Arc::from(name.as_str()))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}
