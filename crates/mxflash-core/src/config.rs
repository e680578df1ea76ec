//! Device configuration
//!
//! With the `std` feature the configuration can be loaded from the
//! `[device]` table of a TOML file:
//!
//! ```toml
//! [device]
//! base_address = "0x40000000"
//! ```
//!
//! Numbers may be given as integers or as decimal/`0x` hex strings.

/// Configuration consumed by bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default, deny_unknown_fields))]
pub struct DeviceConfig {
    /// Controller base address handed to software init
    #[cfg_attr(feature = "std", serde(deserialize_with = "deserialize_hex_u32"))]
    pub base_address: u32,
}

impl DeviceConfig {
    /// Create a configuration for the controller at `base_address`
    pub const fn new(base_address: u32) -> Self {
        Self { base_address }
    }
}

#[cfg(feature = "std")]
pub use self::file::*;

#[cfg(feature = "std")]
mod file {
    use std::format;
    use std::fs;
    use std::path::Path;
    use std::string::String;

    use super::DeviceConfig;

    /// Errors that can occur when loading a configuration file
    #[derive(Debug, thiserror::Error)]
    pub enum ConfigError {
        /// Failed to read the file
        #[error("failed to read config file: {0}")]
        Io(#[from] std::io::Error),

        /// Failed to parse the file
        #[error("invalid config file: {0}")]
        Parse(#[from] toml::de::Error),
    }

    /// Top-level file structure; other tables belong to other consumers
    #[derive(Debug, serde::Deserialize)]
    struct ConfigFile {
        #[serde(default)]
        device: DeviceConfig,
    }

    impl DeviceConfig {
        /// Load the `[device]` table from a TOML file
        pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        }

        /// Parse the `[device]` table from a TOML string
        ///
        /// A missing table yields the default configuration.
        pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile = toml::from_str(content)?;
            Ok(file.device)
        }
    }

    /// Deserialize a u32 that can be hex (0x...) or decimal
    pub fn deserialize_hex_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;

        // Try to deserialize as a number first, then as a string
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum HexOrInt {
            Int(u32),
            Str(String),
        }

        match HexOrInt::deserialize(deserializer)? {
            HexOrInt::Int(n) => Ok(n),
            HexOrInt::Str(s) => parse_number(&s).map_err(serde::de::Error::custom),
        }
    }

    /// Parse a number that can be hex (0x...) or decimal
    pub fn parse_number(s: &str) -> Result<u32, String> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
        } else {
            s.parse().map_err(|e| format!("invalid number: {}", e))
        }
    }

    /// Parse a size string like "2 MiB", "0x200000" or "4096"
    pub fn parse_size(s: &str) -> Result<u32, String> {
        let s = s.trim();

        if let Ok(n) = parse_number(s) {
            return Ok(n);
        }

        let s_lower = s.to_lowercase();
        let (num_str, multiplier) = if let Some(n) = s_lower.strip_suffix("mib") {
            (n.trim(), 1024 * 1024)
        } else if let Some(n) = s_lower.strip_suffix("kib") {
            (n.trim(), 1024)
        } else {
            return Err(format!("invalid size: {}", s));
        };

        let num: u32 = num_str.parse().map_err(|_| format!("invalid size: {}", s))?;
        num.checked_mul(multiplier)
            .ok_or_else(|| format!("size too large: {}", s))
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x100").unwrap(), 0x100);
        assert_eq!(parse_number("0X1F").unwrap(), 0x1F);
        assert_eq!(parse_number(" 256 ").unwrap(), 256);
        assert!(parse_number("0xZZ").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("0x200000").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_size("64 KiB").unwrap(), 64 * 1024);
        assert_eq!(parse_size("2MiB").unwrap(), 2 * 1024 * 1024);
        assert!(parse_size("2 GB").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[device]
base_address = "0x40000000"

[emulator]
size = "2 MiB"
"#;
        let config = DeviceConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.base_address, 0x4000_0000);
    }

    #[test]
    fn test_integer_base_address() {
        let config = DeviceConfig::from_toml_str("[device]\nbase_address = 4096\n").unwrap();
        assert_eq!(config, DeviceConfig::new(0x1000));
    }

    #[test]
    fn test_missing_table_is_default() {
        let config = DeviceConfig::from_toml_str("").unwrap();
        assert_eq!(config, DeviceConfig::default());
        assert_eq!(config.base_address, 0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(DeviceConfig::from_toml_str("[device]\nbase = 1\n").is_err());
    }
}
