pub mod config;
pub mod design;
pub mod fid;

pub use config::{AppConfig, AvatarConfig, HttpConfig, ProfileConfig, RetryConfig, ServerConfig};
pub use design::{DesignConfig, ExtractionMethod, FailurePolicy, MAX_GRID_SIZE, MAX_OUTPUT_SIZE};
pub use fid::{Fid, FidError};
