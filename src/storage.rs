use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 8;

/// Content-addressed image directory. Keys are derived from the bytes, so the
/// client-supplied file name never becomes part of a path.
///
/// In-progress writes live in a sibling staging directory, which is never
/// served but shares the filesystem so the final rename stays atomic.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    staging: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let staging = staging_dir_for(&dir);
        Self { dir, staging }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::create_dir_all(&self.staging).await
    }

    /// Persist `data` and return its storage key.
    ///
    /// Bytes land in a unique temp file first and are renamed onto the key,
    /// so a reader never sees a partially written image.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> io::Result<String> {
        let key = storage_key(original_name, data);
        let dest = self.dir.join(&key);

        let tmp = self.staging.join(format!(".tmp-{}", Uuid::now_v7()));
        if let Err(e) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&tmp, &dest).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }

        Ok(key)
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

/// `uploads` stages into `.uploads.staging` next to it.
fn staging_dir_for(dir: &Path) -> PathBuf {
    match dir.file_name() {
        Some(name) => dir.with_file_name(format!(".{}.staging", name.to_string_lossy())),
        None => dir.join("..").join(".withcare.staging"),
    }
}

/// `<sha256 hex>[.<ext>]`, keeping the extension only when it is short and alphanumeric.
pub fn storage_key(original_name: Option<&str>, data: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(data));

    match original_name.and_then(extension) {
        Some(ext) => format!("{digest}.{ext}"),
        None => digest,
    }
}

fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
