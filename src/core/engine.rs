use crate::core::SyncPipeline;
use crate::domain::model::SyncReport;
use crate::utils::error::Result;
use crate::utils::monitor::DiskMonitor;

pub struct SyncEngine<P: SyncPipeline> {
    pipeline: P,
    monitor: DiskMonitor,
}

impl<P: SyncPipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: DiskMonitor::new(monitor_enabled),
        }
    }

    /// Validates the layout, then archives, purges and replenishes in that order.
    pub async fn run(&self) -> Result<SyncReport> {
        tracing::info!("Starting audcast sync");
        if self.pipeline.is_dry_run() {
            tracing::info!("🔍 DRY RUN MODE - no filesystem changes will be made");
        }

        let layout = match self.pipeline.validate_paths().await {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("Path validation failed; aborting");
                return Err(e);
            }
        };

        let probe = self.pipeline.space_probe();
        let space_root = layout.space_root();
        let mut report = SyncReport::new(self.pipeline.is_dry_run());
        self.monitor.log_stats("Before sync", probe, space_root);

        tracing::info!("Archiving listened files...");
        self.pipeline.archive_listened(&layout, &mut report).await?;
        self.monitor.log_stats("Archive", probe, space_root);

        tracing::info!("Removing discarded files...");
        self.pipeline.purge_deleted(&layout, &mut report).await?;
        self.monitor.log_stats("Purge", probe, space_root);

        tracing::info!("Copying new files to the player...");
        self.pipeline.replenish_player(&layout, &mut report).await?;
        self.monitor.log_stats("Replenish", probe, space_root);

        report.finish();
        tracing::info!("{}", report.summary());
        if report.stopped_for_space {
            tracing::warn!("Player ran out of space; some files were not copied");
        }
        self.monitor.log_final_stats();

        Ok(report)
    }
}
