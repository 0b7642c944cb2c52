pub mod error;
pub mod logger;
pub mod monitor;
pub mod output;
pub mod paths;
pub mod validation;
