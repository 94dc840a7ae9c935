//! 解析器
//!
//! 解析默认不缓存：每次 `resolve` 都会重新调用惰性条目的工厂。
//! `prepare` 期间解析器处于准备模式，此时任何解析，
//! 包括工厂内部嵌套的解析，都会走条目的 `prepare` 路径并记忆化结果。

use std::any::{type_name, Any};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{Entry, Key, Object, Registry};
use crate::errors::{RegistryError, Result};
use crate::logging::OperationTimer;

/// 按名称注册与解析对象
///
/// 每个解析器拥有独立的注册表与准备模式状态，可以通过 `Arc` 在线程间共享。
/// 解析器不做循环依赖检测：工厂解析自身会一直递归直到栈溢出。
#[derive(Default)]
pub struct Resolver {
    registry: Registry,
    /// 正在进行的准备过程数量，大于零即处于准备模式
    preparing: AtomicUsize,
}

/// 离开作用域时结束一次准备过程，工厂出错或 panic 时同样生效
struct PreparationGuard<'a> {
    preparing: &'a AtomicUsize,
}

impl<'a> PreparationGuard<'a> {
    fn enter(preparing: &'a AtomicUsize) -> Self {
        preparing.fetch_add(1, Ordering::SeqCst);
        Self { preparing }
    }
}

impl Drop for PreparationGuard<'_> {
    fn drop(&mut self) {
        self.preparing.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Resolver {
    /// 创建空解析器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册已经计算好的值
    pub fn register_value<T>(&self, key: impl Into<Key>, value: T) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        self.register_shared(key, Arc::new(value))
    }

    /// 注册共享值，解析结果与传入的 `Arc` 指向同一对象
    pub fn register_shared<T>(&self, key: impl Into<Key>, value: Arc<T>) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        let object: Object = value;
        self.registry.add(key.clone(), Entry::value(object))?;
        tracing::debug!(key = %key, kind = "value", "Entry registered");
        Ok(())
    }

    /// 注册工厂，注册时不会调用
    ///
    /// 工厂可以解析尚未注册的键，只要解析真正发生时它们已经存在。
    pub fn register<T, F>(&self, key: impl Into<Key>, factory: F) -> Result<()>
    where
        T: Any + Send + Sync,
        F: Fn(&Resolver) -> Result<T> + Send + Sync + 'static,
    {
        self.register_erased(key, move |resolver: &Resolver| -> Result<Object> {
            let object: Object = Arc::new(factory(resolver)?);
            Ok(object)
        })
    }

    /// 注册直接产出类型擦除对象的工厂
    pub fn register_erased<F>(&self, key: impl Into<Key>, factory: F) -> Result<()>
    where
        F: Fn(&Resolver) -> Result<Object> + Send + Sync + 'static,
    {
        let key = key.into();
        self.registry.add(key.clone(), Entry::lazy(Box::new(factory)))?;
        tracing::debug!(key = %key, kind = "lazy", "Entry registered");
        Ok(())
    }

    /// 解析为类型擦除的对象
    pub fn resolve_object(&self, key: &str) -> Result<Object> {
        let entry = self.registry.find(key)?;

        if self.is_preparing() {
            tracing::trace!(key, mode = "prepare", "Resolving entry");
            entry.prepare(self)
        } else {
            tracing::trace!(key, mode = "get", "Resolving entry");
            entry.get(self)
        }
    }

    /// 解析并转换为具体类型
    pub fn resolve<T>(&self, key: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.resolve_object(key)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.into(),
                expected: type_name::<T>(),
            })
    }

    /// 准备并记忆化当前所有条目
    ///
    /// 只覆盖开始时的条目快照；过程中新注册的条目不在本次范围内。
    /// 无论成功与否，返回时都会退出准备模式，首个工厂错误原样返回。
    pub fn prepare(&self) -> Result<()> {
        let _guard = PreparationGuard::enter(&self.preparing);

        let snapshot = self.registry.snapshot();
        let timer = OperationTimer::new("registry.prepare")
            .with_metadata("entries", &snapshot.len().to_string());

        for (key, entry) in &snapshot {
            if let Err(err) = entry.prepare(self) {
                tracing::warn!(key = %key, error = %err, "Preparation aborted");
                return Err(err);
            }
        }

        timer.finish();
        Ok(())
    }

    /// 是否处于准备模式
    pub fn is_preparing(&self) -> bool {
        self.preparing.load(Ordering::SeqCst) > 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains(key)
    }

    /// 已注册的键，按注册顺序
    pub fn keys(&self) -> Vec<Key> {
        self.registry.keys()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("entries", &self.registry.len())
            .field("preparing", &self.is_preparing())
            .finish()
    }
}
