use crate::domain::ports::FileStore;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// `FileStore` over the local filesystem, for both host and mounted player.
#[derive(Debug, Clone, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFs {
    async fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            // file_type() does not follow symlinks
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!("Skipping non UTF-8 file name {:?} in {}", raw, dir.display());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                // host and player usually sit on different devices
                tracing::debug!(
                    "rename {} -> {} failed ({}), falling back to copy",
                    from.display(),
                    to.display(),
                    rename_err
                );
                fs::copy(from, to).await?;
                fs::remove_file(from).await?;
                Ok(())
            }
        }
    }

    /// Copies through a hidden `.<name>.partial` sibling and renames it into
    /// place, so `to` only ever appears complete.
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64> {
        let partial = partial_path(to);
        let copied = match fs::copy(from, &partial).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e.into());
            }
        };
        if let Err(e) = fs::rename(&partial, to).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        Ok(copied)
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await?;
        Ok(())
    }
}

fn partial_path(to: &Path) -> PathBuf {
    let name = to
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    to.with_file_name(format!(".{}.partial", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_files_skips_dirs_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"bb").unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let names = LocalFs::new().list_files(dir.path()).await.unwrap();
        assert_eq!(names, vec!["a.mp3".to_string(), "b.mp3".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_files_skips_symlinks() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("real.mp3"), b"data").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.mp3"), dir.path().join("link.mp3"))
            .unwrap();

        let names = LocalFs::new().list_files(dir.path()).await.unwrap();
        assert_eq!(names, vec!["real.mp3".to_string()]);
    }

    #[tokio::test]
    async fn test_move_and_copy() {
        let dir = TempDir::new().unwrap();
        let store = LocalFs::new();
        let src = dir.path().join("ep.mp3");
        std::fs::write(&src, b"episode").unwrap();

        let copied = dir.path().join("copy.mp3");
        assert_eq!(store.copy_file(&src, &copied).await.unwrap(), 7);
        assert_eq!(store.file_size(&copied).await.unwrap(), 7);

        let moved = dir.path().join("moved.mp3");
        store.move_file(&src, &moved).await.unwrap();
        assert!(!store.exists(&src).await);
        assert!(store.exists(&moved).await);

        store.remove_file(&moved).await.unwrap();
        assert!(!store.exists(&moved).await);
    }

    #[tokio::test]
    async fn test_copy_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let store = LocalFs::new();
        let src = dir.path().join("ep.mp3");
        std::fs::write(&src, b"episode").unwrap();

        let dest = dir.path().join("out.mp3");
        store.copy_file(&src, &dest).await.unwrap();
        assert!(dest.exists());
        assert!(!dir.path().join(".out.mp3.partial").exists());

        let missing = dir.path().join("missing.mp3");
        let failed = dir.path().join("failed.mp3");
        assert!(store.copy_file(&missing, &failed).await.is_err());
        assert!(!failed.exists());
        assert!(!dir.path().join(".failed.mp3.partial").exists());
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let result = LocalFs::new().list_files(&dir.path().join("nope")).await;
        assert!(result.is_err());
    }
}
