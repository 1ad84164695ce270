//! Durable stores backing user preferences.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::Result;

// == Preference Store Trait ==
/// Key/value persistence that outlives the in-memory tiers.
///
/// Values are opaque serialized strings; callers choose the key namespace.
#[async_trait]
pub trait PreferenceStore: Send + Sync + fmt::Debug {
    async fn read_key(&self, name: &str) -> Result<Option<String>>;

    async fn write_key(&self, name: &str, value: &str) -> Result<()>;

    /// Returns whether the key existed.
    async fn remove_key(&self, name: &str) -> Result<bool>;
}

// == Memory Preference Store ==
/// Process-local store, mostly for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn read_key(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(name).cloned())
    }

    async fn write_key(&self, name: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_key(&self, name: &str) -> Result<bool> {
        Ok(self.values.write().await.remove(name).is_some())
    }
}

// == File Preference Store ==
/// All keys in one JSON object file, read on first use and rewritten on
/// every change.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<Option<BTreeMap<String, String>>>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Mutex::new(None),
        }
    }

    async fn load(path: &Path) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "preference file absent, starting empty");
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn read_key(&self, name: &str) -> Result<Option<String>> {
        let mut guard = self.values.lock().await;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path).await?);
        }
        Ok(guard.as_ref().and_then(|values| values.get(name).cloned()))
    }

    async fn write_key(&self, name: &str, value: &str) -> Result<()> {
        let mut guard = self.values.lock().await;
        let mut values = match guard.as_ref() {
            Some(values) => values.clone(),
            None => Self::load(&self.path).await?,
        };
        values.insert(name.to_string(), value.to_string());
        self.persist(&values).await?;
        *guard = Some(values);
        Ok(())
    }

    async fn remove_key(&self, name: &str) -> Result<bool> {
        let mut guard = self.values.lock().await;
        let mut values = match guard.as_ref() {
            Some(values) => values.clone(),
            None => Self::load(&self.path).await?,
        };
        let existed = values.remove(name).is_some();
        if existed {
            self.persist(&values).await?;
        }
        *guard = Some(values);
        Ok(existed)
    }
}
