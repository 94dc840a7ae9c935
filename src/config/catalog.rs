//! Named constructors used by the manifest loader in place of class lookup.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{RegistryError, Result};
use crate::infrastructure::container::{Key, Object};

/// Type-erased constructor stored in a [`Catalog`]
pub type Constructor = Arc<dyn Fn(&Arguments) -> Result<Object> + Send + Sync>;

/// Resolved dependencies handed to a constructor, in manifest order
pub struct Arguments {
    owner: Key,
    names: Vec<Key>,
    values: Vec<Object>,
}

impl Arguments {
    pub(crate) fn new(owner: Key, names: Vec<Key>, values: Vec<Object>) -> Self {
        Self {
            owner,
            names,
            values,
        }
    }

    /// Name of the entry being constructed
    pub fn owner(&self) -> &Key {
        &self.owner
    }

    /// Positional dependency downcast to `T`
    pub fn get<T>(&self, index: usize) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let value = self.values.get(index).cloned().ok_or_else(|| {
            RegistryError::factory(
                &self.owner,
                format!(
                    "constructor expected at least {} dependencies, manifest lists {}",
                    index.saturating_add(1),
                    self.values.len()
                ),
            )
        })?;

        value.downcast::<T>().map_err(|_| RegistryError::TypeMismatch {
            key: self.names[index].clone(),
            expected: type_name::<T>(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Registry of constructors keyed by class name
#[derive(Clone, Default)]
pub struct Catalog {
    constructors: HashMap<String, Constructor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Catalog::insert`]
    pub fn with<T, F>(mut self, class: &str, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        self.insert(class, constructor);
        self
    }

    /// Adds or replaces the constructor for `class`
    pub fn insert<T, F>(&mut self, class: &str, constructor: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        let erased: Constructor = Arc::new(move |args: &Arguments| -> Result<Object> {
            let object: Object = Arc::new(constructor(args)?);
            Ok(object)
        });
        self.constructors.insert(class.to_string(), erased);
    }

    pub fn get(&self, class: &str) -> Option<Constructor> {
        self.constructors.get(class).cloned()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&String> = self.constructors.keys().collect();
        classes.sort();
        f.debug_struct("Catalog").field("classes", &classes).finish()
    }
}
