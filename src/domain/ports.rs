use crate::domain::model::{SyncLayout, SyncReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Filesystem operations the sync phases need. Paths are absolute.
pub trait FileStore: Send + Sync {
    /// Names of regular files directly inside `dir`, sorted. Symlinks and
    /// subdirectories are skipped.
    fn list_files(&self, dir: &Path) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
    fn file_size(&self, path: &Path) -> impl std::future::Future<Output = Result<u64>> + Send;
    fn move_file(
        &self,
        from: &Path,
        to: &Path,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn copy_file(
        &self,
        from: &Path,
        to: &Path,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
    fn remove_file(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
    fn create_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Free-space and mount queries against the player's filesystem.
pub trait SpaceProbe: Send + Sync {
    /// Bytes available to an unprivileged user on the filesystem holding `path`.
    fn available_space(&self, path: &Path) -> Result<u64>;
    fn is_mount_point(&self, path: &Path) -> bool;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &Path;
    fn host_archive(&self) -> &Path;
    fn player_mount(&self) -> Option<&Path>;
    fn player_path(&self) -> &Path;
    fn player_archive(&self) -> &Path;
    fn player_delete(&self) -> &Path;
    fn dry_run(&self) -> bool;
    fn require_mount(&self) -> bool;
    fn create_missing(&self) -> bool;
    fn min_free_bytes(&self) -> u64;
    fn extensions(&self) -> &[String];

    /// True when `file_name` passes the extension filter. An empty filter
    /// accepts everything.
    fn accepts(&self, file_name: &str) -> bool {
        let extensions = self.extensions();
        if extensions.is_empty() {
            return true;
        }
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// The three phases of a run, in the order the engine drives them.
#[async_trait]
pub trait SyncPipeline: Send + Sync {
    async fn validate_paths(&self) -> Result<SyncLayout>;
    async fn archive_listened(&self, layout: &SyncLayout, report: &mut SyncReport) -> Result<()>;
    async fn purge_deleted(&self, layout: &SyncLayout, report: &mut SyncReport) -> Result<()>;
    async fn replenish_player(&self, layout: &SyncLayout, report: &mut SyncReport) -> Result<()>;
    fn is_dry_run(&self) -> bool;
    fn space_probe(&self) -> &dyn SpaceProbe;
}
