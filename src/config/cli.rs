use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::domain::model::SyncSettings;
use crate::utils::error::Result;
use crate::utils::paths::expand_path;
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;

impl CliConfig {
    /// Loads the `--config` file, if one was given.
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(expand_path(path))?;
                file.validate()?;
                Ok(Some(file))
            }
            None => Ok(None),
        }
    }

    /// Merges the command line over the config file. Flags always win.
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<SyncSettings> {
        let host = pick(&self.host, file.and_then(|f| f.host.path.as_ref()));
        let host = validation::validate_required_field("host", &host)?;
        let player_path = pick(&self.player_path, file.and_then(|f| f.player.path.as_ref()));
        let player_path = validation::validate_required_field("player_path", &player_path)?;

        let mut settings =
            SyncSettings::with_default_layout(expand_path(host), expand_path(player_path));

        if let Some(file) = file {
            file.apply_overrides(&mut settings);
        }

        if let Some(archive) = &self.host_archive {
            settings.host_archive = expand_path(archive);
        }
        if let Some(mount) = &self.player_mount {
            settings.player_mount = Some(expand_path(mount));
        }
        if let Some(archive) = &self.player_archive {
            settings.player_archive = expand_path(archive);
        }
        if let Some(delete) = &self.player_delete {
            settings.player_delete = expand_path(delete);
        }

        settings.dry_run |= self.debug;
        settings.create_missing |= self.create_dirs;
        if self.skip_mount_check {
            settings.require_mount = false;
        }
        if let Some(min_free) = self.min_free {
            settings.min_free_bytes = min_free;
        }
        if !self.extensions.is_empty() {
            settings.extensions = self.extensions.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn pick(flag: &Option<PathBuf>, file_value: Option<&PathBuf>) -> Option<PathBuf> {
    flag.clone().or_else(|| file_value.cloned())
}
