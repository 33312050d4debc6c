//! # YAML Preferences Store
//!
//! File-backed [`KeyValueStore`] keeping every key in a single YAML mapping
//! at the root of the data directory.
//!
//! ```text
//! ~/.local/share/budget-tracker/
//! └── preferences.yaml    ← This module manages this file
//! ```
//!
//! ## YAML Format
//!
//! ```yaml
//! colorMap: '{"salary":"rgba(52, 152, 219, 0.1)"}'
//! ```
//!
//! Writes go to a temp file that is then renamed over the original.

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use super::traits::KeyValueStore;

const PREFERENCES_FILE: &str = "preferences.yaml";

pub struct YamlFileStore {
    base_directory: PathBuf,
    /// Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl YamlFileStore {
    /// Open a store in `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory).with_context(|| {
                format!("Failed to create data directory {}", base_directory.display())
            })?;
            info!("Created data directory: {}", base_directory.display());
        }

        Ok(Self {
            base_directory,
            write_lock: Mutex::new(()),
        })
    }

    pub fn file_path(&self) -> PathBuf {
        self.base_directory.join(PREFERENCES_FILE)
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if yaml_content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let values = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!("Loaded preferences from {}", path.display());
        Ok(values)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let path = self.file_path();
        let yaml_content = serde_yaml::to_string(values)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}

impl KeyValueStore for YamlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(key, &mut |_| Ok(value.to_string()))
    }

    fn update(&self, key: &str, apply: &mut dyn FnMut(Option<String>) -> Result<String>) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("preferences lock poisoned"))?;

        let mut values = self.load()?;
        let updated = apply(values.remove(key))?;
        values.insert(key.to_string(), updated);
        self.save(&values)
    }
}
