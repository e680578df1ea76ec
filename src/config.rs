//! Tool configuration file
//!
//! ```toml
//! [device]
//! base_address = "0x40000000"
//!
//! [emulator]
//! size = "2 MiB"
//! four_byte = false
//! caps = "0x3F003E"
//! busy = false
//! ```
//!
//! Command line options take precedence over the file.

use std::fs;
use std::path::Path;

use mxflash_core::chip::CmdCaps;
use mxflash_core::config::{parse_number, parse_size, ConfigError, DeviceConfig};
use mxflash_core::spi::AddressMode;
use mxflash_dummy::DummyConfig;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Emulated chip description
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmulatorSection {
    /// Chip size, e.g. "2 MiB" or "0x200000"
    pub size: Option<String>,
    /// Start in 4-byte address mode
    pub four_byte: bool,
    /// Raw capability flags, replacing the defaults
    pub caps: Option<String>,
    /// Start with a program/erase in progress
    pub busy: bool,
}

/// Whole configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Controller settings for bring-up
    pub device: DeviceConfig,
    /// Emulated chip
    pub emulator: EmulatorSection,
}

impl ToolConfig {
    /// Load the configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse the configuration from a TOML string
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command line overrides
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(base) = cli.base_address {
            self.device.base_address = base;
        }
        if let Some(size) = &cli.size {
            self.emulator.size = Some(size.clone());
        }
        if cli.four_byte {
            self.emulator.four_byte = true;
        }
    }

    /// Build the emulator configuration
    pub fn dummy_config(&self) -> Result<DummyConfig> {
        let emu = &self.emulator;
        let size = match &emu.size {
            Some(s) => parse_size(s).map_err(CliError::InvalidParameter)? as usize,
            None if emu.four_byte => 32 * 1024 * 1024,
            None => DummyConfig::default().size,
        };

        let mut config = if emu.four_byte {
            DummyConfig::four_byte(size)
        } else {
            DummyConfig {
                size,
                ..DummyConfig::default()
            }
        };

        if let Some(caps) = &emu.caps {
            let bits = parse_number(caps).map_err(CliError::InvalidParameter)?;
            config.caps = CmdCaps::from_bits(bits).ok_or_else(|| {
                CliError::InvalidParameter(format!("unknown capability bits in {}", caps))
            })?;
        }
        config.busy = emu.busy;

        if config.address_mode == AddressMode::ThreeByte
            && size as u64 > AddressMode::ThreeByte.max_size()
        {
            log::warn!(
                "{} bytes exceed the 3-byte address range; only the first 16 MiB are reachable",
                size
            );
        }

        Ok(config)
    }
}
