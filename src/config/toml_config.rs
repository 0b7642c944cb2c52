use crate::domain::model::SyncSettings;
use crate::utils::error::{Result, SyncError};
use crate::utils::paths::{expand_path, substitute_env_vars};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    pub path: Option<PathBuf>,
    pub archive: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub mount: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub archive: Option<PathBuf>,
    pub delete: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    pub dry_run: Option<bool>,
    pub require_mount: Option<bool>,
    pub create_missing: Option<bool>,
    pub min_free_bytes: Option<u64>,
    pub extensions: Option<Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after substituting `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Copies every optional value present in the file onto `settings`.
    pub(crate) fn apply_overrides(&self, settings: &mut SyncSettings) {
        if let Some(archive) = &self.host.archive {
            settings.host_archive = expand_path(archive);
        }
        if let Some(mount) = &self.player.mount {
            settings.player_mount = Some(expand_path(mount));
        }
        if let Some(archive) = &self.player.archive {
            settings.player_archive = expand_path(archive);
        }
        if let Some(delete) = &self.player.delete {
            settings.player_delete = expand_path(delete);
        }
        if let Some(dry_run) = self.sync.dry_run {
            settings.dry_run = dry_run;
        }
        if let Some(require_mount) = self.sync.require_mount {
            settings.require_mount = require_mount;
        }
        if let Some(create_missing) = self.sync.create_missing {
            settings.create_missing = create_missing;
        }
        if let Some(min_free) = self.sync.min_free_bytes {
            settings.min_free_bytes = min_free;
        }
        if let Some(extensions) = &self.sync.extensions {
            settings.extensions = extensions.clone();
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let paths = [
            ("host.path", &self.host.path),
            ("host.archive", &self.host.archive),
            ("player.mount", &self.player.mount),
            ("player.path", &self.player.path),
            ("player.archive", &self.player.archive),
            ("player.delete", &self.player.delete),
        ];
        for (field, path) in paths {
            if let Some(path) = path {
                validation::validate_path(field, path)?;
            }
        }

        if let Some(extensions) = &self.sync.extensions {
            validation::validate_extensions("sync.extensions", extensions)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[host]
path = "/home/me/audcasts"
archive = "/home/me/listened"

[player]
mount = "/media/player"
path = "/media/player/PODCASTS"

[sync]
require_mount = false
min_free_bytes = 1048576
extensions = ["mp3", "ogg"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        let mut settings = SyncSettings::with_default_layout(
            "/home/me/audcasts",
            "/media/player/PODCASTS",
        );
        config.apply_overrides(&mut settings);
        assert_eq!(settings.host, PathBuf::from("/home/me/audcasts"));
        assert_eq!(settings.host_archive, PathBuf::from("/home/me/listened"));
        assert_eq!(settings.player_mount, Some(PathBuf::from("/media/player")));
        assert_eq!(
            settings.player_delete,
            PathBuf::from("/media/player/PODCASTS/delete")
        );
        assert!(!settings.require_mount);
        assert_eq!(settings.min_free_bytes, 1048576);
        assert_eq!(settings.extensions, vec!["mp3", "ogg"]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AUDCAST_TEST_MOUNT", "/media/walkman");

        let toml_content = r#"
[host]
path = "/srv/audcasts"

[player]
path = "${AUDCAST_TEST_MOUNT}/pods"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.player.path,
            Some(PathBuf::from("/media/walkman/pods"))
        );

        std::env::remove_var("AUDCAST_TEST_MOUNT");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = TomlConfig::from_toml_str("[host\npath = 1");
        assert!(matches!(result, Err(SyncError::ConfigParseError { .. })));
    }

    #[test]
    fn test_bad_extension_fails_validation() {
        let config = TomlConfig::from_toml_str("[sync]\nextensions = [\".mp3\"]\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[host]
path = "/srv/audcasts"

[player]
path = "/media/player"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.host.path, Some(PathBuf::from("/srv/audcasts")));
        assert!(config.sync.dry_run.is_none());
    }
}
