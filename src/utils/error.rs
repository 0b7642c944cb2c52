use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{role} ({}) does not exist", .path.display())]
    PathMissingError { role: PathRole, path: PathBuf },

    #[error("Player mount path ({}) is not mounted", .path.display())]
    NotMountedError { path: PathBuf },

    #[error("Cannot determine free space for {}", .path.display())]
    SpaceUnavailableError { path: PathBuf },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Which configured directory a path plays in the sync layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Host,
    HostArchive,
    PlayerMount,
    PlayerPath,
    PlayerArchive,
    PlayerDelete,
}

impl std::fmt::Display for PathRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PathRole::Host => "Host path",
            PathRole::HostArchive => "Host archive path",
            PathRole::PlayerMount => "Player mount path",
            PathRole::PlayerPath => "Player path",
            PathRole::PlayerArchive => "Player archive path",
            PathRole::PlayerDelete => "Player delete path",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Layout,
    Device,
    FileSystem,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a run that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::ConfigParseError { .. } => ErrorCategory::Configuration,
            SyncError::PathMissingError { .. } => ErrorCategory::Layout,
            SyncError::NotMountedError { .. } | SyncError::SpaceUnavailableError { .. } => {
                ErrorCategory::Device
            }
            SyncError::IoError(_) => ErrorCategory::FileSystem,
            SyncError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a player that is not plugged in yet is worth retrying
            SyncError::NotMountedError { .. } => ErrorSeverity::Medium,
            SyncError::IoError(_) | SyncError::SpaceUnavailableError { .. } => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SyncError::PathMissingError { role, path } => match role {
                PathRole::HostArchive | PathRole::PlayerArchive | PathRole::PlayerDelete => {
                    format!(
                        "Create {} or rerun with --create-dirs",
                        path.display()
                    )
                }
                _ => format!("Check that {} is spelled correctly", path.display()),
            },
            SyncError::NotMountedError { .. } => {
                "Connect and mount the player, or pass --skip-mount-check".to_string()
            }
            SyncError::SpaceUnavailableError { .. } => {
                "Make sure the player path lives on a mounted filesystem".to_string()
            }
            SyncError::MissingConfigError { field } => {
                format!("Pass --{} or set it in the config file", field.replace('_', "-"))
            }
            SyncError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {}", field)
            }
            SyncError::ConfigParseError { .. } => {
                "Make sure the config file is valid TOML".to_string()
            }
            SyncError::IoError(_) => {
                "Check permissions on the host and player directories".to_string()
            }
            SyncError::SerializationError(_) => "Rerun without --json".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Layout => format!("Sync layout is incomplete: {}", self),
            ErrorCategory::Device => format!("Player is not ready: {}", self),
            ErrorCategory::FileSystem => format!("File operation failed: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_missing_message_names_role() {
        let err = SyncError::PathMissingError {
            role: PathRole::PlayerDelete,
            path: PathBuf::from("/media/player/delete"),
        };
        assert_eq!(
            err.to_string(),
            "Player delete path (/media/player/delete) does not exist"
        );
        assert_eq!(err.category(), ErrorCategory::Layout);
        assert!(err.recovery_suggestion().contains("--create-dirs"));
    }

    #[test]
    fn test_not_mounted_is_retryable() {
        let err = SyncError::NotMountedError {
            path: PathBuf::from("/media/player"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.category(), ErrorCategory::Device);
    }

    #[test]
    fn test_missing_config_suggests_flag() {
        let err = SyncError::MissingConfigError {
            field: "player_path".to_string(),
        };
        assert!(err.recovery_suggestion().contains("--player-path"));
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_exit_codes_are_never_success() {
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);

        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = SyncError::from(json_err);
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_ne!(err.severity().exit_code(), 0);
    }
}
