//! binplan.toml configuration parser.
//!
//! Tunables are plain values handed to the filter, allocator and
//! dispatcher constructors; nothing here is process-global.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::size::ByteSize;

pub const DEFAULT_DESIRED_CAPACITY: ByteSize = ByteSize::mib(128);
pub const DEFAULT_MAX_OBJECT_SIZE: ByteSize = ByteSize::mib(256);
pub const DEFAULT_MAX_CONCURRENT_WORKERS: usize = 40;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BinPlanConfig {
    pub packing: PackingConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    /// Soft target used when deciding whether an object may join a bin.
    pub desired_capacity: ByteSize,
    /// Objects above this size are excluded from packing.
    pub max_object_size: ByteSize,
    /// Multiplier applied to `max_object_size`. Absent means strict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling_tolerance: Option<f64>,
    /// What to do when the filter leaves nothing to pack.
    pub empty_result: EmptyPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on workers running at once. Extra bins wait their turn.
    pub max_concurrent_workers: usize,
}

/// Outcome when no object survives the size filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Fail the job with a no-eligible-items error.
    #[default]
    Fail,
    /// Succeed with an empty plan.
    Allow,
}

/// Effective absolute ceiling for the size filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CeilingPolicy {
    /// `size <= max_size`.
    Strict { max_size: u64 },
    /// `size <= floor(max_size * tolerance)`.
    Tolerant { max_size: u64, tolerance: f64 },
}

impl CeilingPolicy {
    pub fn strict(max_size: u64) -> Self {
        CeilingPolicy::Strict { max_size }
    }

    /// The threshold an object size is compared against.
    pub fn threshold(&self) -> u64 {
        match *self {
            CeilingPolicy::Strict { max_size } => max_size,
            // Float-to-int casts saturate; the f64 round trip may lose the
            // low bits of large sizes, so never drop below `max_size`.
            CeilingPolicy::Tolerant { max_size, tolerance } => {
                ((max_size as f64 * tolerance).floor() as u64).max(max_size)
            }
        }
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            desired_capacity: DEFAULT_DESIRED_CAPACITY,
            max_object_size: DEFAULT_MAX_OBJECT_SIZE,
            ceiling_tolerance: None,
            empty_result: EmptyPolicy::Fail,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_workers: DEFAULT_MAX_CONCURRENT_WORKERS,
        }
    }
}

impl PackingConfig {
    pub fn ceiling_policy(&self) -> CeilingPolicy {
        match self.ceiling_tolerance {
            Some(tolerance) => CeilingPolicy::Tolerant {
                max_size: self.max_object_size.bytes(),
                tolerance,
            },
            None => CeilingPolicy::strict(self.max_object_size.bytes()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.desired_capacity.bytes() == 0 {
            return Err(ConfigError::Invalid(
                "packing.desired_capacity must be greater than zero".into(),
            ));
        }
        if self.max_object_size < self.desired_capacity {
            return Err(ConfigError::Invalid(format!(
                "packing.max_object_size ({}) is below packing.desired_capacity ({})",
                self.max_object_size, self.desired_capacity
            )));
        }
        if let Some(tolerance) = self.ceiling_tolerance {
            if !tolerance.is_finite() || tolerance < 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "packing.ceiling_tolerance must be a finite value >= 1.0, got {tolerance}"
                )));
            }
        }
        Ok(())
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_workers == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.max_concurrent_workers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl BinPlanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        content.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.packing.validate()?;
        self.dispatch.validate()
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl std::str::FromStr for BinPlanConfig {
    type Err = ConfigError;

    /// Parse and validate a config document.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: BinPlanConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
