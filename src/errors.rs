use std::path::PathBuf;

use thiserror::Error;

use crate::infrastructure::container::Key;

/// 工厂内部产生的外部错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 容器操作结果
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// 注册表错误
///
/// `AlreadyRegistered` 与 `UnknownEntity` 都是调用方的配置错误，
/// 容器在检测到时立即返回，不做重试。
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Entry '{key}' is already registered")]
    AlreadyRegistered { key: Key },
    #[error("Unknown entity '{key}'")]
    UnknownEntity { key: Key },
    #[error("Entry '{key}' does not hold a value of type '{expected}'")]
    TypeMismatch { key: Key, expected: &'static str },
    #[error("Factory for '{key}' failed: {source}")]
    Factory {
        key: Key,
        #[source]
        source: BoxError,
    },
}

impl RegistryError {
    /// 将工厂自身的错误包装为 `RegistryError`
    pub fn factory(key: impl Into<Key>, source: impl Into<BoxError>) -> Self {
        RegistryError::Factory {
            key: key.into(),
            source: source.into(),
        }
    }

    /// 出错的键
    pub fn key(&self) -> &Key {
        match self {
            RegistryError::AlreadyRegistered { key }
            | RegistryError::UnknownEntity { key }
            | RegistryError::TypeMismatch { key, .. }
            | RegistryError::Factory { key, .. } => key,
        }
    }
}

/// Manifest loading errors. The container itself never produces these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Manifest file '{}' not found", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read manifest '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Manifest is incorrect: {reason}")]
    Incorrect { reason: String },
    #[error("Registry error while wiring manifest: {0}")]
    Registry(#[from] RegistryError),
}

#[cfg(feature = "manifest")]
impl ConfigError {
    pub(crate) fn incorrect(reason: impl Into<String>) -> Self {
        ConfigError::Incorrect {
            reason: reason.into(),
        }
    }
}
