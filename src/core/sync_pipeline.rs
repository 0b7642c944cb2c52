use crate::adapters::has_room;
use crate::core::{ConfigProvider, FileStore, SpaceProbe, SyncPipeline};
use crate::domain::model::{ActionKind, SyncAction, SyncLayout, SyncReport};
use crate::utils::error::{PathRole, Result, SyncError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Moves listened audcasts off the player, purges discarded ones and refills
/// the player from the host.
pub struct AudcastPipeline<S: FileStore, P: SpaceProbe, C: ConfigProvider> {
    pub(crate) store: S,
    pub(crate) probe: P,
    pub(crate) config: C,
}

impl<S: FileStore, P: SpaceProbe, C: ConfigProvider> AudcastPipeline<S, P, C> {
    pub fn new(store: S, probe: P, config: C) -> Self {
        Self {
            store,
            probe,
            config,
        }
    }

    async fn require_exists(&self, role: PathRole, path: &Path) -> Result<()> {
        if self.store.exists(path).await {
            return Ok(());
        }
        tracing::warn!("{} ({}) does not exist", role, path.display());
        Err(SyncError::PathMissingError {
            role,
            path: path.to_path_buf(),
        })
    }

    /// Like `require_exists`, but creates the directory when allowed.
    /// Returns true if a dry run skipped the creation.
    async fn ensure_dir(&self, role: PathRole, path: &Path) -> Result<bool> {
        if self.store.exists(path).await || !self.config.create_missing() {
            self.require_exists(role, path).await?;
            return Ok(false);
        }

        if self.config.dry_run() {
            tracing::info!("Would create {} ({})", role, path.display());
            return Ok(true);
        }

        tracing::info!("Creating {} ({})", role, path.display());
        self.store.create_dir_all(path).await?;
        Ok(false)
    }

    /// Audcast file names in `dir` that pass the extension filter.
    async fn audcasts_in(&self, layout: &SyncLayout, dir: &Path) -> Result<Vec<String>> {
        if layout.is_pending(dir) {
            return Ok(Vec::new());
        }
        let names = self.store.list_files(dir).await?;
        Ok(names
            .into_iter()
            .filter(|name| {
                let keep = self.config.accepts(name);
                if !keep {
                    tracing::debug!("Ignoring {} (extension filter)", name);
                }
                keep
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl<S: FileStore, P: SpaceProbe, C: ConfigProvider> SyncPipeline for AudcastPipeline<S, P, C> {
    async fn validate_paths(&self) -> Result<SyncLayout> {
        tracing::debug!("checking that all paths exist");
        let mut pending_dirs = Vec::new();

        self.require_exists(PathRole::Host, self.config.host()).await?;

        let host_archive = self.config.host_archive();
        if self.ensure_dir(PathRole::HostArchive, host_archive).await? {
            pending_dirs.push(host_archive.to_path_buf());
        }

        if let Some(mount) = self.config.player_mount() {
            self.require_exists(PathRole::PlayerMount, mount).await?;
            if self.config.require_mount() && !self.probe.is_mount_point(mount) {
                tracing::warn!("Player mount path ({}) is not mounted", mount.display());
                return Err(SyncError::NotMountedError {
                    path: mount.to_path_buf(),
                });
            }
        }

        self.require_exists(PathRole::PlayerPath, self.config.player_path())
            .await?;

        for (role, dir) in [
            (PathRole::PlayerArchive, self.config.player_archive()),
            (PathRole::PlayerDelete, self.config.player_delete()),
        ] {
            if self.ensure_dir(role, dir).await? {
                pending_dirs.push(dir.to_path_buf());
            }
        }

        Ok(SyncLayout {
            host: self.config.host().to_path_buf(),
            host_archive: host_archive.to_path_buf(),
            player_mount: self.config.player_mount().map(Path::to_path_buf),
            player_path: self.config.player_path().to_path_buf(),
            player_archive: self.config.player_archive().to_path_buf(),
            player_delete: self.config.player_delete().to_path_buf(),
            pending_dirs,
        })
    }

    async fn archive_listened(&self, layout: &SyncLayout, report: &mut SyncReport) -> Result<()> {
        let dry_run = self.config.dry_run();

        for name in self.audcasts_in(layout, &layout.player_archive).await? {
            let on_player = layout.player_archive.join(&name);
            let on_host = layout.host.join(&name);
            let archived = layout.host_archive.join(&name);
            let bytes = self.store.file_size(&on_player).await?;

            tracing::debug!("Will archive {}", archived.display());

            let source = if self.store.exists(&on_host).await {
                // host copy is the original; the player copy just goes away
                if !dry_run {
                    self.store.move_file(&on_host, &archived).await?;
                    self.store.remove_file(&on_player).await?;
                }
                on_host
            } else {
                tracing::debug!("{} is only on the player; archiving its copy", name);
                if !dry_run {
                    self.store.move_file(&on_player, &archived).await?;
                }
                on_player
            };

            report.record(SyncAction {
                kind: ActionKind::Archive,
                file_name: name,
                source,
                destination: Some(archived),
                bytes,
            });
        }

        Ok(())
    }

    async fn purge_deleted(&self, layout: &SyncLayout, report: &mut SyncReport) -> Result<()> {
        let dry_run = self.config.dry_run();

        for name in self.audcasts_in(layout, &layout.player_delete).await? {
            let on_player = layout.player_delete.join(&name);
            let on_host = layout.host.join(&name);
            let bytes = self.store.file_size(&on_player).await?;

            if self.store.exists(&on_host).await {
                tracing::debug!("Will remove {}", on_host.display());
                if !dry_run {
                    self.store.remove_file(&on_host).await?;
                }
            }

            if !dry_run {
                self.store.remove_file(&on_player).await?;
            }

            report.record(SyncAction {
                kind: ActionKind::Remove,
                file_name: name,
                source: on_player,
                destination: None,
                bytes,
            });
        }

        Ok(())
    }

    async fn replenish_player(&self, layout: &SyncLayout, report: &mut SyncReport) -> Result<()> {
        let dry_run = self.config.dry_run();
        let reserve = self.config.min_free_bytes();
        let space_root: PathBuf = layout.space_root().clone();

        // a dry run leaves these on the host, but a live run would not
        let retired: HashSet<String> = report
            .actions
            .iter()
            .filter(|a| matches!(a.kind, ActionKind::Archive | ActionKind::Remove))
            .map(|a| a.file_name.clone())
            .collect();

        // player files archive and purge would have freed on the space root
        let freed: u64 = report
            .actions
            .iter()
            .filter(|a| match a.kind {
                ActionKind::Archive => layout.player_archive.starts_with(&space_root),
                ActionKind::Remove => layout.player_delete.starts_with(&space_root),
                _ => false,
            })
            .map(|a| a.bytes)
            .sum();

        let mut dry_run_budget: Option<u64> = None;

        for name in self.audcasts_in(layout, &layout.host).await? {
            if dry_run && retired.contains(&name) {
                continue;
            }

            let on_host = layout.host.join(&name);
            let on_player = layout.player_path.join(&name);
            if self.store.exists(&on_player).await {
                continue;
            }

            let size = self.store.file_size(&on_host).await?;
            let available = if dry_run {
                match dry_run_budget {
                    Some(budget) => budget,
                    None => self.probe.available_space(&space_root)?.saturating_add(freed),
                }
            } else {
                self.probe.available_space(&space_root)?
            };

            if !has_room(available, size, reserve) {
                tracing::warn!("Not enough space for {}; aborting", on_host.display());
                report.record(SyncAction {
                    kind: ActionKind::SkipNoSpace,
                    file_name: name,
                    source: on_host,
                    destination: Some(on_player),
                    bytes: size,
                });
                break;
            }

            tracing::debug!("Will copy {}", name);
            if dry_run {
                dry_run_budget = Some(available - size);
            } else if let Err(e) = self.store.copy_file(&on_host, &on_player).await {
                // a truncated file would look synced on every later run
                if self.store.exists(&on_player).await {
                    if let Err(cleanup) = self.store.remove_file(&on_player).await {
                        tracing::warn!(
                            "Could not remove partial copy {}: {}",
                            on_player.display(),
                            cleanup
                        );
                    }
                }
                return Err(e);
            }

            report.record(SyncAction {
                kind: ActionKind::Copy,
                file_name: name,
                source: on_host,
                destination: Some(on_player),
                bytes: size,
            });
        }

        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        self.config.dry_run()
    }

    fn space_probe(&self) -> &dyn SpaceProbe {
        &self.probe
    }
}
