pub mod engine;
pub mod sync_pipeline;

pub use crate::domain::model::{SyncAction, SyncLayout, SyncReport, SyncSettings};
pub use crate::domain::ports::{ConfigProvider, FileStore, SpaceProbe, SyncPipeline};
pub use crate::utils::error::Result;
