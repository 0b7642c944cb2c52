// Adapters layer: concrete implementations of the domain ports.

pub mod local_fs;
pub mod system_space;

pub use local_fs::LocalFs;
pub use system_space::{has_room, SystemSpaceProbe};
