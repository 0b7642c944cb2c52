use crate::domain::ports::SpaceProbe;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DiskStats {
    pub available_bytes: u64,
    pub lowest_available_bytes: u64,
    pub elapsed_time: Duration,
}

/// Logs free space on the player between phases.
pub struct DiskMonitor {
    start_time: Instant,
    lowest_available: Mutex<Option<u64>>,
    enabled: bool,
}

impl DiskMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
            lowest_available: Mutex::new(None),
            enabled,
        }
    }

    pub fn get_stats(&self, probe: &dyn SpaceProbe, path: &Path) -> Option<DiskStats> {
        if !self.enabled {
            return None;
        }

        let available = match probe.available_space(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Disk stats unavailable: {}", e);
                return None;
            }
        };

        let mut lowest = self.lowest_available.lock().ok()?;
        let lowest_value = lowest.map_or(available, |seen| seen.min(available));
        *lowest = Some(lowest_value);

        Some(DiskStats {
            available_bytes: available,
            lowest_available_bytes: lowest_value,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str, probe: &dyn SpaceProbe, path: &Path) {
        if let Some(stats) = self.get_stats(probe, path) {
            tracing::info!(
                "📊 {} - Player free: {}MB, Lowest: {}MB, Time: {:?}",
                phase,
                stats.available_bytes / 1024 / 1024,
                stats.lowest_available_bytes / 1024 / 1024,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let lowest = self.lowest_available.lock().ok().and_then(|guard| *guard);
        match lowest {
            Some(bytes) => tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Lowest player free space: {}MB",
                self.start_time.elapsed(),
                bytes / 1024 / 1024
            ),
            None => tracing::info!(
                "📊 Final Stats - Total Time: {:?}",
                self.start_time.elapsed()
            ),
        }
    }
}

impl Default for DiskMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Result;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Shrinking(AtomicU64);

    impl SpaceProbe for Shrinking {
        fn available_space(&self, _path: &Path) -> Result<u64> {
            Ok(self.0.fetch_sub(100, Ordering::SeqCst))
        }

        fn is_mount_point(&self, _path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = DiskMonitor::default();
        let probe = Shrinking(AtomicU64::new(1000));
        assert!(monitor.get_stats(&probe, Path::new("/")).is_none());
        monitor.log_stats("archive", &probe, Path::new("/"));
        assert_eq!(probe.0.load(Ordering::SeqCst), 1000);
    }

    #[test]
    fn test_tracks_lowest_free_space() {
        let monitor = DiskMonitor::new(true);
        let probe = Shrinking(AtomicU64::new(1000));

        let first = monitor.get_stats(&probe, Path::new("/")).unwrap();
        assert_eq!(first.available_bytes, 1000);

        let second = monitor.get_stats(&probe, Path::new("/")).unwrap();
        assert_eq!(second.available_bytes, 900);
        assert_eq!(second.lowest_available_bytes, 900);
    }
}
