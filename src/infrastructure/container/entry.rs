//! 容器条目
//!
//! 条目只有两种：立即值与惰性工厂。`get` 用于普通解析，
//! `prepare` 只在准备模式下调用并记忆化结果。

use std::cell::RefCell;
use std::fmt;

use parking_lot::ReentrantMutex;

use super::{Object, Resolver};
use crate::errors::Result;

/// 类型擦除后的工厂函数
pub type Factory = Box<dyn Fn(&Resolver) -> Result<Object> + Send + Sync>;

/// 惰性条目的记忆化单元
///
/// 是否已有值由 `Option` 表示，从不根据值本身判断，
/// 因此 `0`、`false` 或 `()` 同样可以被记忆化。
/// 可重入锁让同一线程的递归解析不会死锁，
/// 其他线程则会等待首个 `prepare` 完成。
pub struct MemoCell {
    slot: ReentrantMutex<RefCell<Option<Object>>>,
}

impl MemoCell {
    fn empty() -> Self {
        Self {
            slot: ReentrantMutex::new(RefCell::new(None)),
        }
    }

    fn peek(&self) -> Option<Object> {
        self.slot.lock().borrow().clone()
    }
}

/// 容器条目
pub enum Entry {
    /// 已经计算好的值
    Value(Object),
    /// 工厂与记忆化单元
    Lazy { factory: Factory, memo: MemoCell },
}

impl Entry {
    pub fn value(value: Object) -> Self {
        Entry::Value(value)
    }

    pub fn lazy(factory: Factory) -> Self {
        Entry::Lazy {
            factory,
            memo: MemoCell::empty(),
        }
    }

    /// 普通解析：有记忆值则返回，否则调用工厂但不保存结果
    pub fn get(&self, resolver: &Resolver) -> Result<Object> {
        match self {
            Entry::Value(value) => Ok(value.clone()),
            Entry::Lazy { factory, memo } => match memo.peek() {
                Some(cached) => Ok(cached),
                None => factory(resolver),
            },
        }
    }

    /// 准备：有记忆值则返回，否则调用工厂并保存结果
    ///
    /// 工厂最多被调用一次；工厂失败时单元保持为空。
    /// 同一线程内的递归准备若已先写入记忆值，外层结果会被丢弃，保留先写入的值。
    pub fn prepare(&self, resolver: &Resolver) -> Result<Object> {
        match self {
            Entry::Value(value) => Ok(value.clone()),
            Entry::Lazy { factory, memo } => {
                let guard = memo.slot.lock();
                if let Some(cached) = guard.borrow().as_ref() {
                    return Ok(cached.clone());
                }

                // 调用工厂期间不能持有 borrow，工厂可能递归解析
                let value = factory(resolver)?;

                let mut slot = guard.borrow_mut();
                Ok(slot.get_or_insert(value).clone())
            }
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Entry::Lazy { .. })
    }

    /// 惰性条目是否已经记忆化；立即值总是视为已就绪
    pub fn is_memoized(&self) -> bool {
        match self {
            Entry::Value(_) => true,
            Entry::Lazy { memo, .. } => memo.peek().is_some(),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(_) => f.write_str("Entry::Value"),
            Entry::Lazy { .. } => f
                .debug_struct("Entry::Lazy")
                .field("memoized", &self.is_memoized())
                .finish(),
        }
    }
}
