//! Application configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use doorlock_core::{ControllerConfig, RelockPolicy};
use doorlock_core::constants::DEFAULT_RELOCK_GRACE_MS;
use serde::{Deserialize, Serialize};

/// Scheduler period used when the file does not set one.
pub const DEFAULT_TICK_MS: u64 = 50;

/// Baud rate of the lock's UART.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Milliseconds between controller ticks.
    pub tick_ms: u64,

    /// Host serial link. Without it host replies are typed on stdin.
    pub serial: Option<SerialConfig>,

    pub controller: ControllerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            serial: None,
            controller: ControllerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SerialConfig {
    /// The serial port.
    pub port: PathBuf,

    /// The baud rate.
    #[serde(default = "default_baud_rate")]
    pub baudrate: u32,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl AppConfig {
    /// Parse and validate the config file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {path:?}"))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file at {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_ms == 0 {
            anyhow::bail!("tick_ms must be greater than zero");
        }
        self.controller
            .validate()
            .context("Invalid controller configuration")
    }

    pub fn example() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            serial: Some(SerialConfig {
                port: PathBuf::from("/dev/ttyACM0"),
                baudrate: DEFAULT_BAUD_RATE,
            }),
            controller: ControllerConfig {
                relock: RelockPolicy::AfterGrace {
                    grace_ms: DEFAULT_RELOCK_GRACE_MS,
                },
                ..ControllerConfig::default()
            },
        }
    }
}
