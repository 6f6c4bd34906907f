//! Local-disk asset store for uploaded project images.
//!
//! Files are written flat under a root directory as
//! `{unix_millis}_{sanitized_name}` and served by the HTTP layer under a
//! public base URL (`/assets` by default).

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use tokio::io::AsyncWriteExt;

use crate::store::{AssetStore, StoreError};

/// Runs of characters that are not safe in a file name.
static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// Make an uploaded file name safe to use as a path component.
///
/// Unsafe runs become `_`; leading dots are dropped so the result is never
/// hidden or a relative path. Returns `None` if nothing usable is left.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    // Browsers may send a full client-side path.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_CHARS_RE.replace_all(base.trim(), "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return None;
    }
    Some(cleaned.to_string())
}

#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    base_url: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The stored key behind a public URL, if the URL belongs to this store.
    fn key_of<'a>(&self, public_url: &'a str) -> Result<&'a str, StoreError> {
        let key = public_url
            .strip_prefix(self.base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StoreError::ForeignAsset(public_url.to_string()))?;
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::InvalidAssetName(key.to_string()));
        }
        Ok(key)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String, StoreError> {
        let name = sanitize_file_name(suggested_name)
            .ok_or_else(|| StoreError::InvalidAssetName(suggested_name.to_string()))?;
        tokio::fs::create_dir_all(&self.root).await?;

        // Two uploads of the same name within one millisecond would collide;
        // move to the next free millisecond key.
        let mut millis = Utc::now().timestamp_millis();
        let (key, mut file) = loop {
            let key = format!("{millis}_{name}");
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&key))
                .await
            {
                Ok(file) => break (key, file),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e.into()),
            }
        };

        file.write_all(&bytes).await?;
        file.flush().await?;

        tracing::info!(key = %key, size = bytes.len(), "Asset stored");
        Ok(format!("{}/{key}", self.base_url))
    }

    async fn delete(&self, public_url: &str) -> Result<bool, StoreError> {
        let key = self.key_of(public_url)?;
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                tracing::info!(key, "Asset deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
