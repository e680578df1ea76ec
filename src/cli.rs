//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use mxflash_core::spi::IoMode;
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "mxflash")]
#[command(author, version, about = "MX25R serial NOR flash tool (emulated device)", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file with [device] and [emulator] tables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Flash image backing the emulated array; saved after write and erase
    #[arg(short, long, global = true)]
    pub image: Option<PathBuf>,

    /// Controller base address (overrides the config file)
    #[arg(long, value_parser = parse_hex_u32, global = true)]
    pub base_address: Option<u32>,

    /// Emulated chip size, e.g. "2 MiB" (overrides the config file)
    #[arg(long, global = true)]
    pub size: Option<String>,

    /// Emulate a part running in 4-byte address mode
    #[arg(long, global = true)]
    pub four_byte: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Address range shared by the protection commands
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Start address (hex or decimal)
    #[arg(short, long, value_parser = parse_hex_u32)]
    pub addr: u32,

    /// Length in bytes (hex or decimal)
    #[arg(short, long, value_parser = parse_hex_u32)]
    pub len: u32,

    /// Use the dynamic protection bits instead of the block lock bits
    #[arg(long)]
    pub dynamic: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bring up the device and show the resolved command set
    Info,

    /// Read flash contents
    Read {
        /// Start address (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0")]
        addr: u32,

        /// Number of bytes to read (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32)]
        len: u32,

        /// Output file path (hexdump to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write file to flash
    Write {
        /// Start address (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0")]
        addr: u32,

        /// Input file path
        #[arg(long)]
        input: PathBuf,
    },

    /// Erase 64 KiB blocks
    Erase {
        /// Address inside the first block (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0")]
        addr: u32,

        /// Number of blocks to erase
        #[arg(short, long, default_value = "1")]
        blocks: u32,
    },

    /// Show the write protection of a range
    LockStatus(RangeArgs),

    /// Write-protect a range
    Lock(RangeArgs),

    /// Remove write protection from a range
    Unlock(RangeArgs),

    /// Switch the I/O and addressing mode, then bring the device up again
    Mode {
        /// Bus I/O mode (1-1-1, 1-1-2, 1-2-2, 1-1-4, 1-4-4, 4-4-4)
        #[arg(long, default_value = "1-1-1")]
        io: IoMode,

        /// Switch to 4-byte addressing
        #[arg(long)]
        addr4: bool,
    },

    /// Read the secured OTP area
    OtpRead {
        /// Offset into the OTP area (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0")]
        addr: u32,

        /// Number of bytes to read (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0x200")]
        len: u32,
    },
}

impl Commands {
    /// Whether the command can change the flash array
    pub fn modifies_array(&self) -> bool {
        matches!(self, Commands::Write { .. } | Commands::Erase { .. })
    }
}
