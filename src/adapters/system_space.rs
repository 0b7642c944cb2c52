use crate::domain::ports::SpaceProbe;
use crate::utils::error::{Result, SyncError};
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;
use sysinfo::Disks;

/// `SpaceProbe` that asks the filesystem holding a path directly (statvfs on
/// Unix) and uses sysinfo's disk list for mount detection.
#[derive(Debug, Default)]
pub struct SystemSpaceProbe;

impl SystemSpaceProbe {
    pub fn new() -> Self {
        Self
    }

    /// Mount point and available bytes of the listed disk that holds `path`.
    #[cfg(not(unix))]
    fn owning_disk(path: &Path) -> Option<(PathBuf, u64)> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().components().count())
            .map(|disk| (disk.mount_point().to_path_buf(), disk.available_space()))
    }
}

/// `f_bavail * f_frsize` of the filesystem holding `path`, as `df` reports it.
#[cfg(unix)]
pub fn statvfs_available(path: &Path) -> Result<u64> {
    let stats = nix::sys::statvfs::statvfs(path).map_err(std::io::Error::from)?;
    Ok((stats.blocks_available() as u64).saturating_mul(stats.fragment_size() as u64))
}

impl SpaceProbe for SystemSpaceProbe {
    #[cfg(unix)]
    fn available_space(&self, path: &Path) -> Result<u64> {
        let canonical = std::fs::canonicalize(path)?;
        match statvfs_available(&canonical) {
            Ok(available) => {
                tracing::debug!("{} has {} bytes available", canonical.display(), available);
                Ok(available)
            }
            Err(e) => {
                tracing::warn!("statvfs failed for {}: {}", canonical.display(), e);
                Err(SyncError::SpaceUnavailableError { path: canonical })
            }
        }
    }

    #[cfg(not(unix))]
    fn available_space(&self, path: &Path) -> Result<u64> {
        let canonical = std::fs::canonicalize(path)?;
        match Self::owning_disk(&canonical) {
            Some((mount, available)) => {
                tracing::debug!(
                    "{} is on {} with {} bytes available",
                    canonical.display(),
                    mount.display(),
                    available
                );
                Ok(available)
            }
            None => Err(SyncError::SpaceUnavailableError { path: canonical }),
        }
    }

    fn is_mount_point(&self, path: &Path) -> bool {
        let Ok(canonical) = std::fs::canonicalize(path) else {
            return false;
        };

        let listed = Disks::new_with_refreshed_list()
            .list()
            .iter()
            .any(|disk| disk.mount_point() == canonical);

        listed || differs_from_parent(&canonical)
    }
}

/// A directory is a mount point when it sits on a different device than its
/// parent, or when it is its own parent.
#[cfg(unix)]
fn differs_from_parent(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Some(parent) = path.parent() else {
        return true;
    };
    match (std::fs::metadata(path), std::fs::metadata(parent)) {
        (Ok(own), Ok(up)) => own.dev() != up.dev() || own.ino() == up.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn differs_from_parent(path: &Path) -> bool {
    path.parent().is_none()
}

/// Whether a file of `size` bytes fits while keeping `reserve` bytes free.
pub fn has_room(available: u64, size: u64, reserve: u64) -> bool {
    size.checked_add(reserve)
        .map(|needed| available >= needed)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_room_boundary() {
        assert!(has_room(100, 100, 0));
        assert!(!has_room(99, 100, 0));
        assert!(has_room(150, 100, 50));
        assert!(!has_room(149, 100, 50));
        assert!(!has_room(u64::MAX, u64::MAX, 1));
    }

    #[cfg(unix)]
    #[test]
    fn test_root_is_mount_point() {
        assert!(SystemSpaceProbe::new().is_mount_point(Path::new("/")));
    }

    #[test]
    fn test_plain_temp_subdir_is_not_mount_point() {
        let dir = tempfile::TempDir::new().unwrap();
        let sub = dir.path().join("player");
        std::fs::create_dir(&sub).unwrap();
        assert!(!SystemSpaceProbe::new().is_mount_point(&sub));
    }

    /// Free space must come from the path's own filesystem, even when sysinfo
    /// does not list it (tmpfs, network and `/run/user` mounts).
    #[cfg(target_os = "linux")]
    #[test]
    fn test_available_space_matches_df_on_tmpfs() {
        let shm = Path::new("/dev/shm");
        if !shm.is_dir() {
            return;
        }
        let Ok(output) = std::process::Command::new("df")
            .args(["-B1", "--output=avail"])
            .arg(shm)
            .output()
        else {
            return;
        };
        if !output.status.success() {
            return;
        }
        let df_avail: u64 = String::from_utf8_lossy(&output.stdout)
            .lines()
            .nth(1)
            .and_then(|line| line.trim().parse().ok())
            .expect("df prints an avail column");

        let available = SystemSpaceProbe::new().available_space(shm).unwrap();
        let slack = 64 * 1024 * 1024;
        assert!(
            available.abs_diff(df_avail) <= slack,
            "statvfs said {available}, df said {df_avail}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_available_space_of_missing_path_is_error() {
        let result = SystemSpaceProbe::new().available_space(Path::new("/definitely/not/here"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_path_is_not_mount_point() {
        assert!(!SystemSpaceProbe::new().is_mount_point(Path::new("/definitely/not/here")));
    }
}
