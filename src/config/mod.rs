#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::SyncSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "audcast-sync")]
#[command(about = "Synchronize an audcast directory with a portable audio player")]
pub struct CliConfig {
    /// TOML file with [host], [player] and [sync] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host path
    #[arg(long)]
    pub host: Option<PathBuf>,

    /// Full path to host's archive (default: <host>/archive)
    #[arg(long)]
    pub host_archive: Option<PathBuf>,

    /// Full path to player's mount point
    #[arg(long)]
    pub player_mount: Option<PathBuf>,

    /// Full path to player's storage directory
    #[arg(long)]
    pub player_path: Option<PathBuf>,

    /// Full path to player's archive directory (default: <player-path>/archive)
    #[arg(long)]
    pub player_archive: Option<PathBuf>,

    /// Full path to player's delete directory (default: <player-path>/delete)
    #[arg(long)]
    pub player_delete: Option<PathBuf>,

    /// Debug mode (NO filesystem changes)
    #[arg(short, long, visible_alias = "dry-run")]
    pub debug: bool,

    /// Do not require the player mount to be a mount point
    #[arg(long)]
    pub skip_mount_check: bool,

    /// Create missing archive and delete directories
    #[arg(long)]
    pub create_dirs: bool,

    /// Bytes to keep free on the player when copying
    #[arg(long)]
    pub min_free: Option<u64>,

    /// Only sync files with these extensions
    #[arg(long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log player disk usage around each phase
    #[arg(long)]
    pub monitor: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for SyncSettings {
    fn host(&self) -> &Path {
        &self.host
    }

    fn host_archive(&self) -> &Path {
        &self.host_archive
    }

    fn player_mount(&self) -> Option<&Path> {
        self.player_mount.as_deref()
    }

    fn player_path(&self) -> &Path {
        &self.player_path
    }

    fn player_archive(&self) -> &Path {
        &self.player_archive
    }

    fn player_delete(&self) -> &Path {
        &self.player_delete
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn require_mount(&self) -> bool {
        self.require_mount
    }

    fn create_missing(&self) -> bool {
        self.create_missing
    }

    fn min_free_bytes(&self) -> u64 {
        self.min_free_bytes
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Validate for SyncSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("host", &self.host)?;
        validation::validate_path("host_archive", &self.host_archive)?;
        if let Some(mount) = &self.player_mount {
            validation::validate_path("player_mount", mount)?;
        }
        validation::validate_path("player_path", &self.player_path)?;
        validation::validate_path("player_archive", &self.player_archive)?;
        validation::validate_path("player_delete", &self.player_delete)?;

        // the mount may legitimately be the player path itself
        validation::validate_distinct_paths(&[
            ("host", &self.host),
            ("host_archive", &self.host_archive),
            ("player_path", &self.player_path),
            ("player_archive", &self.player_archive),
            ("player_delete", &self.player_delete),
        ])?;

        validation::validate_extensions("extensions", &self.extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_accepts_by_extension() {
        let mut settings = SyncSettings::with_default_layout("/host", "/player");
        assert!(settings.accepts("anything.wav"));

        settings.extensions = vec!["mp3".to_string(), "OGG".to_string()];
        assert!(settings.accepts("episode.MP3"));
        assert!(settings.accepts("episode.ogg"));
        assert!(!settings.accepts("notes.txt"));
        assert!(!settings.accepts("README"));
    }

    #[test]
    fn test_settings_reject_shared_directories() {
        let mut settings = SyncSettings::with_default_layout("/host", "/player");
        assert!(settings.validate().is_ok());

        settings.player_delete = settings.player_archive.clone();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_mount_may_equal_player_path() {
        let mut settings = SyncSettings::with_default_layout("/host", "/media/player");
        settings.player_mount = Some(PathBuf::from("/media/player"));
        assert!(settings.validate().is_ok());
    }
}
