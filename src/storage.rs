use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use crate::error::{ToolError, ToolResult};

/// Read a whole JSON data file.
///
/// A missing file yields the empty default. A file that fails to parse is
/// copied aside to `<name>.json.bak` and also yields the default.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        log::info!("Storage: {} does not exist yet, starting empty", path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(e) => {
            let backup = path.with_extension("json.bak");
            std::fs::copy(path, &backup)
                .with_context(|| format!("Failed to back up {}", path.display()))?;
            log::warn!(
                "Storage: invalid JSON in {} ({}), kept a copy at {}, starting empty",
                path.display(),
                e,
                backup.display()
            );
            Ok(T::default())
        }
    }
}

/// Rewrite a whole JSON data file: write a temp file in the same directory,
/// then persist it over the target. The temp file is removed on any failure.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize data")?;
        writer.flush().context("Failed to flush data file")?;
    }

    temp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    log::debug!("Storage: saved {}", path.display());
    Ok(())
}

/// A JSON file held fully in memory and rewritten on every mutation.
pub struct JsonStore<T> {
    path: PathBuf,
    /// What a failed save reports it could not save, e.g. "document".
    label: &'static str,
    data: RwLock<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync,
{
    pub fn open(path: impl Into<PathBuf>, label: &'static str) -> Result<Self> {
        let path = path.into();
        let data = load_json(&path)?;
        Ok(Self {
            path,
            label,
            data: RwLock::new(data),
        })
    }

    /// Wrap already loaded data without touching the file.
    pub fn with_data(path: impl Into<PathBuf>, label: &'static str, data: T) -> Self {
        Self {
            path: path.into(),
            label,
            data: RwLock::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let data = self.data.read().await;
        f(&data)
    }

    /// Apply a change under the write lock and persist it.
    ///
    /// The change runs against a copy; memory is only replaced once the file
    /// has been written, so a failed save leaves the store untouched.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> ToolResult<R>) -> ToolResult<R> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let result = f(&mut next)?;

        if let Err(e) = save_json(&self.path, &next) {
            log::error!("Storage: failed to save {}: {:#}", self.path.display(), e);
            return Err(ToolError::Storage(format!("Failed to save {}: {:#}", self.label, e)));
        }

        *data = next;
        Ok(result)
    }
}
