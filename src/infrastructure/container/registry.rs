//! 条目存储
//!
//! 键一旦写入就不会被覆盖或删除。读写锁只在访问映射时持有，
//! 从不跨越工厂调用，因此工厂内部可以继续注册或解析。

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use parking_lot::RwLock;

use super::{Entry, Key};
use crate::errors::{RegistryError, Result};

/// 只追加的键到条目映射
#[derive(Default)]
pub struct Registry {
    entries: RwLock<IndexMap<Key, Arc<Entry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加条目，键已存在时返回 `AlreadyRegistered` 且不修改原条目
    pub fn add(&self, key: Key, entry: Entry) -> Result<()> {
        let mut entries = self.entries.write();
        match entries.entry(key) {
            MapEntry::Occupied(occupied) => Err(RegistryError::AlreadyRegistered {
                key: occupied.key().clone(),
            }),
            MapEntry::Vacant(vacant) => {
                vacant.insert(Arc::new(entry));
                Ok(())
            }
        }
    }

    /// 查找条目，返回共享引用以便记忆化状态对后续查找可见
    pub fn find(&self, key: &str) -> Result<Arc<Entry>> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownEntity { key: key.into() })
    }

    /// 当前所有条目的快照，按注册顺序
    pub fn snapshot(&self) -> Vec<(Key, Arc<Entry>)> {
        self.entries
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<Key> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::container::{Object, Resolver};

    fn value(v: i32) -> Entry {
        Entry::value(Arc::new(v) as Object)
    }

    #[test]
    fn test_add_and_find() {
        let registry = Registry::new();
        registry.add("a".into(), value(1)).unwrap();

        let resolver = Resolver::new();
        let found = registry.find("a").unwrap();
        let object = found.get(&resolver).unwrap();
        assert_eq!(object.downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_duplicate_key_keeps_first_entry() {
        let registry = Registry::new();
        registry.add("a".into(), value(1)).unwrap();

        let err = registry.add("a".into(), value(2)).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered { ref key } if key.as_str() == "a"));

        let resolver = Resolver::new();
        let object = registry.find("a").unwrap().get(&resolver).unwrap();
        assert_eq!(object.downcast_ref::<i32>(), Some(&1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_unknown() {
        let registry = Registry::new();
        let err = registry.find("nope").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownEntity { ref key } if key.as_str() == "nope"));
    }

    #[test]
    fn test_find_returns_shared_entry() {
        let registry = Registry::new();
        registry.add("a".into(), value(1)).unwrap();

        let first = registry.find("a").unwrap();
        let second = registry.find("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_snapshot_in_registration_order() {
        let registry = Registry::new();
        for name in ["z", "a", "m"] {
            registry.add(name.into(), value(0)).unwrap();
        }

        let keys: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert!(registry.contains("m"));
        assert!(!registry.is_empty());
    }
}
