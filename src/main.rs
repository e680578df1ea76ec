//! mxflash - Command line front end for the MX25R flash driver shim
//!
//! Drives an emulated MX25R chip through the same bring-up sequence and
//! dispatch facade a real controller would use.
//!
//! # Architecture
//!
//! - **mxflash-core** sequences bring-up and binds read/write/erase to the
//!   3-byte or 4-byte command set
//! - **mxflash-dummy** emulates the chip and controller in memory
//!
//! The emulated array can be backed by an image file (`--image`) so that
//! writes and erases persist between runs.

mod cli;
mod commands;
mod config;
mod error;

use std::fs;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Device;
use config::ToolConfig;
use error::{CliError, Result};
use mxflash_core::flash::FlashDevice;
use mxflash_core::spi::AddressMode;
use mxflash_dummy::{DummyConfig, DummyFlash};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG still wins over -v
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose)),
    )
    .init();

    run(&cli)?;
    Ok(())
}

/// Default log filter for a `-v` count
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = ToolConfig::load(path)?;
            log::info!("Loaded configuration from {:?}", path);
            config
        }
        None => ToolConfig::default(),
    };
    config.merge_cli(cli);

    let flash = open_emulator(config.dummy_config()?, cli.image.as_deref())?;
    let mut dev = FlashDevice::new(flash, config.device);
    dev.initialize()?;

    run_command(&mut dev, &cli.command)?;

    if let Some(image) = &cli.image {
        if cli.command.modifies_array() {
            save_image(&dev, image)?;
        }
    }
    Ok(())
}

fn run_command(dev: &mut Device, command: &Commands) -> Result<()> {
    match command {
        Commands::Info => {
            commands::info::run_info(dev);
            Ok(())
        }
        Commands::Read { addr, len, output } => {
            commands::read::run_read(dev, *addr, *len, output.as_deref())
        }
        Commands::Write { addr, input } => commands::write::run_write(dev, *addr, input),
        Commands::Erase { addr, blocks } => commands::erase::run_erase(dev, *addr, *blocks),
        Commands::LockStatus(range) => commands::protect::cmd_status(dev, range).map(|_| ()),
        Commands::Lock(range) => commands::protect::cmd_lock(dev, range),
        Commands::Unlock(range) => commands::protect::cmd_unlock(dev, range),
        Commands::Mode { io, addr4 } => {
            let addr_mode = if *addr4 {
                AddressMode::FourByte
            } else {
                AddressMode::ThreeByte
            };
            dev.set_mode(*io, addr_mode)?;
            dev.initialize()?;
            commands::info::run_info(dev);
            Ok(())
        }
        Commands::OtpRead { addr, len } => commands::read::run_otp_read(dev, *addr, *len),
    }
}

/// Create the emulated chip, pre-filled from `image` if it exists
fn open_emulator(config: DummyConfig, image: Option<&Path>) -> Result<DummyFlash> {
    match image {
        Some(path) if path.exists() => {
            let data = fs::read(path).map_err(|e| CliError::io(path, e))?;
            if data.len() > config.size {
                log::warn!(
                    "Image {:?} is larger than the chip ({} > {} bytes), truncating",
                    path,
                    data.len(),
                    config.size
                );
            }
            log::info!("Loaded {} bytes from {:?}", data.len(), path);
            Ok(DummyFlash::with_data(config, &data))
        }
        _ => Ok(DummyFlash::new(config)),
    }
}

fn save_image(dev: &Device, path: &Path) -> Result<()> {
    fs::write(path, dev.driver().data()).map_err(|e| CliError::io(path, e))?;
    log::info!("Saved image to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0), "info");
        assert_eq!(log_filter(1), "debug");
        assert_eq!(log_filter(2), "trace");
        assert_eq!(log_filter(5), "trace");
    }

    #[test]
    fn test_verbose_flag_selects_filter() {
        let cli = Cli::parse_from(["mxflash", "-vv", "info"]);
        assert_eq!(log_filter(cli.verbose), "trace");

        let cli = Cli::parse_from(["mxflash", "info", "-v"]);
        assert_eq!(log_filter(cli.verbose), "debug");
    }
}
