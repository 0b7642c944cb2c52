use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fully resolved settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub host: PathBuf,
    pub host_archive: PathBuf,
    pub player_mount: Option<PathBuf>,
    pub player_path: PathBuf,
    pub player_archive: PathBuf,
    pub player_delete: PathBuf,
    pub dry_run: bool,
    pub require_mount: bool,
    pub create_missing: bool,
    pub min_free_bytes: u64,
    pub extensions: Vec<String>,
}

impl SyncSettings {
    /// Settings using the `<main>/archive` and `<main>/delete` layout on the
    /// player and `<host>/archive` on the host.
    pub fn with_default_layout(host: impl Into<PathBuf>, player_path: impl Into<PathBuf>) -> Self {
        let host = host.into();
        let player_path = player_path.into();
        Self {
            host_archive: host.join(ARCHIVE_DIR),
            player_archive: player_path.join(ARCHIVE_DIR),
            player_delete: player_path.join(DELETE_DIR),
            host,
            player_mount: None,
            player_path,
            dry_run: false,
            require_mount: true,
            create_missing: false,
            min_free_bytes: 0,
            extensions: Vec::new(),
        }
    }
}

pub const ARCHIVE_DIR: &str = "archive";
pub const DELETE_DIR: &str = "delete";

/// Paths that passed validation and are safe to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLayout {
    pub host: PathBuf,
    pub host_archive: PathBuf,
    pub player_mount: Option<PathBuf>,
    pub player_path: PathBuf,
    pub player_archive: PathBuf,
    pub player_delete: PathBuf,
    /// Directories a dry run would have created; treated as empty.
    pub pending_dirs: Vec<PathBuf>,
}

impl SyncLayout {
    /// Directory whose filesystem receives copies; free space is measured here.
    pub fn space_root(&self) -> &PathBuf {
        self.player_mount.as_ref().unwrap_or(&self.player_path)
    }

    pub fn is_pending(&self, dir: &std::path::Path) -> bool {
        self.pending_dirs.iter().any(|pending| pending == dir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Archive,
    Remove,
    Copy,
    SkipNoSpace,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Archive => "ARCHIVE",
            ActionKind::Remove => "REMOVE",
            ActionKind::Copy => "COPY",
            ActionKind::SkipNoSpace => "NOSPACE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAction {
    pub kind: ActionKind,
    pub file_name: String,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub archived: usize,
    pub removed: usize,
    pub copied: usize,
    pub bytes_copied: u64,
    pub stopped_for_space: bool,
    pub actions: Vec<SyncAction>,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            archived: 0,
            removed: 0,
            copied: 0,
            bytes_copied: 0,
            stopped_for_space: false,
            actions: Vec::new(),
        }
    }

    pub fn record(&mut self, action: SyncAction) {
        match action.kind {
            ActionKind::Archive => self.archived += 1,
            ActionKind::Remove => self.removed += 1,
            ActionKind::Copy => {
                self.copied += 1;
                self.bytes_copied += action.bytes;
            }
            ActionKind::SkipNoSpace => self.stopped_for_space = true,
        }
        self.actions.push(action);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn summary(&self) -> String {
        format!(
            "Archived {} files, removed {} files, copied {} files",
            self.archived, self.removed, self.copied
        )
    }
}
