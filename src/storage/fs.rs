use super::ObjectStore;
use anyhow::{bail, Context, Result};
use std::path::{Component, Path, PathBuf};

/// Filesystem-backed object store.
///
/// Keys map to paths under the configured root; `/` in a key becomes a
/// subdirectory. Key components are validated so a key can never escape
/// the root.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create storage root {}", root.display()))?;

        Ok(Self { root })
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            bail!("object key must not be empty");
        }

        let relative = Path::new(key);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => bail!("object key {key:?} must be a plain relative path"),
            }
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write object {key}"))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;

        tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read object {key}"))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to delete object {key}")),
        }
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn resolve_accepts_nested_keys() {
        let (_dir, store) = store();
        let path = store.resolve("clips/abc/take.wav").unwrap();
        assert!(path.ends_with("clips/abc/take.wav"));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let (_dir, store) = store();
        assert!(store.resolve("../escape.wav").is_err());
        assert!(store.resolve("clips/../../escape.wav").is_err());
    }

    #[test]
    fn resolve_rejects_absolute_and_empty() {
        let (_dir, store) = store();
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("").is_err());
    }
}
