pub mod config;
pub mod size;
pub mod types;

pub use config::{BinPlanConfig, CeilingPolicy, ConfigError, DispatchConfig, EmptyPolicy, PackingConfig};
pub use size::ByteSize;
pub use types::*;
