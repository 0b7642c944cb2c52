pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LogFormat};

pub use adapters::{LocalFs, SystemSpaceProbe};
pub use config::toml_config::TomlConfig;
pub use crate::core::{engine::SyncEngine, sync_pipeline::AudcastPipeline};
pub use domain::model::{ActionKind, SyncAction, SyncReport, SyncSettings};
pub use utils::error::{Result, SyncError};
