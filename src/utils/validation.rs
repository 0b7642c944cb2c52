use crate::utils::error::{Result, SyncError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();

    if raw.is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.contains('\0') {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Every role must point at its own directory.
pub fn validate_distinct_paths(paths: &[(&str, &PathBuf)]) -> Result<()> {
    let mut seen: HashSet<&PathBuf> = HashSet::new();

    for (field, path) in paths {
        if !seen.insert(*path) {
            let first = paths
                .iter()
                .find(|(_, other)| other == path)
                .map(|(name, _)| *name)
                .unwrap_or("another field");
            return Err(SyncError::InvalidConfigValueError {
                field: field.to_string(),
                value: path.display().to_string(),
                reason: format!("Path is already used by {}", first),
            });
        }
    }

    Ok(())
}

pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    for ext in extensions {
        if ext.trim().is_empty() {
            return Err(SyncError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Extension cannot be empty or whitespace-only".to_string(),
            });
        }

        if ext.contains('.') || ext.contains('/') {
            return Err(SyncError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Give bare extensions such as mp3, without dots or slashes".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SyncError::MissingConfigError {
        field: field_name.to_string(),
    })
}
