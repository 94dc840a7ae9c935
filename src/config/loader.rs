use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use super::catalog::{Arguments, Catalog};
use crate::errors::{ConfigError, Result};
use crate::infrastructure::container::{Key, Object, Resolver};

/// Partial manifest as read from TOML; every field is checked by hand so the
/// error names what is missing.
#[derive(Deserialize, Debug, Default)]
struct PartialManifest {
    entries: Option<Vec<PartialManifestEntry>>,
}

#[derive(Deserialize, Debug, Default)]
struct PartialManifestEntry {
    name: Option<String>,
    class: Option<String>,
    dependencies: Option<Vec<String>>,
}

/// A single validated manifest record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub class: String,
    pub dependencies: Vec<String>,
}

/// Declarative wiring: which class builds each name and what it depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load a manifest from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let manifest = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            entries = manifest.entries.len(),
            "Manifest loaded"
        );
        Ok(manifest)
    }

    /// Parse and validate manifest content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let partial: PartialManifest = toml::from_str(content)
            .map_err(|e| ConfigError::incorrect(format!("failed to parse manifest: {}", e)))?;

        let raw_entries = partial
            .entries
            .ok_or_else(|| ConfigError::incorrect("manifest must contain an `entries` array"))?;

        let entries = raw_entries
            .into_iter()
            .enumerate()
            .map(|(index, raw)| -> Result<ManifestEntry, ConfigError> {
                let name = raw.name.ok_or_else(|| {
                    ConfigError::incorrect(format!("entry #{} is missing `name`", index))
                })?;
                let class = raw.class.ok_or_else(|| {
                    ConfigError::incorrect(format!("entry '{}' is missing `class`", name))
                })?;
                Ok(ManifestEntry {
                    name,
                    class,
                    dependencies: raw.dependencies.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { entries })
    }

    /// Register one factory per entry on a fresh resolver
    ///
    /// Every class must exist in `catalog` before anything is registered.
    /// Factories resolve their dependencies by name when invoked, so entry
    /// order in the manifest does not matter.
    pub fn into_resolver(self, catalog: &Catalog) -> Result<Resolver, ConfigError> {
        if let Some(unknown) = self.entries.iter().find(|e| !catalog.contains(&e.class)) {
            return Err(ConfigError::incorrect(format!(
                "entry '{}' refers to unknown class '{}'",
                unknown.name, unknown.class
            )));
        }

        let resolver = Resolver::new();
        for entry in self.entries {
            let constructor = catalog.get(&entry.class).ok_or_else(|| {
                ConfigError::incorrect(format!("unknown class '{}'", entry.class))
            })?;
            let owner = Key::from(entry.name);
            let dependencies: Vec<Key> = entry.dependencies.into_iter().map(Key::from).collect();

            let factory_owner = owner.clone();
            resolver.register_erased(owner, move |r: &Resolver| -> Result<Object> {
                let values = dependencies
                    .iter()
                    .map(|dependency| r.resolve_object(dependency.as_str()))
                    .collect::<Result<Vec<_>>>()?;
                let arguments = Arguments::new(factory_owner.clone(), dependencies.clone(), values);
                constructor(&arguments)
            })?;
        }

        Ok(resolver)
    }
}

/// Load a manifest file and wire it into a fresh resolver
pub fn load_manifest(path: impl AsRef<Path>, catalog: &Catalog) -> Result<Resolver, ConfigError> {
    Manifest::load(path)?.into_resolver(catalog)
}
