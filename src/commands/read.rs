//! Read command implementation

use std::fs;
use std::path::Path;

use super::{check_range, offset_address, progress_bar, Device};
use crate::error::{CliError, Result};

/// Default chunk size for reading (4 KiB)
const READ_CHUNK_SIZE: usize = 4096;

/// Run the read command
pub fn run_read(dev: &mut Device, addr: u32, len: u32, output: Option<&Path>) -> Result<()> {
    let data = read_with_progress(dev, addr, len as usize)?;

    match output {
        Some(path) => {
            fs::write(path, &data).map_err(|e| CliError::io(path, e))?;
            println!("Wrote {} bytes to {:?}", data.len(), path);
        }
        None => print_hexdump(addr, &data),
    }
    Ok(())
}

/// Run the OTP read command
///
/// The OTP area is left again even if the read fails; a read error takes
/// precedence over one from leaving the area.
pub fn run_otp_read(dev: &mut Device, addr: u32, len: u32) -> Result<()> {
    let mut data = vec![0u8; len as usize];

    dev.enter_otp()?;
    let read = dev.read(addr, &mut data);
    let exit = dev.exit_otp();
    read?;
    exit?;

    print_hexdump(addr, &data);
    Ok(())
}

/// Read `len` bytes with progress bar
pub fn read_with_progress(dev: &mut Device, addr: u32, len: usize) -> Result<Vec<u8>> {
    check_range(addr, len as u64)?;

    let mut data = vec![0u8; len];
    let pb = progress_bar(len as u64, "Reading");

    let mut offset = 0usize;
    while offset < len {
        let chunk_size = std::cmp::min(READ_CHUNK_SIZE, len - offset);
        let chunk = &mut data[offset..offset + chunk_size];

        dev.read(offset_address(addr, offset as u64)?, chunk)?;

        offset += chunk_size;
        pb.set_position(offset as u64);
    }

    pb.finish_with_message("Read complete");
    Ok(data)
}

/// Print 16 bytes per line with address and ASCII columns
fn print_hexdump(base: u32, data: &[u8]) {
    for line in hexdump_lines(base, data) {
        println!("{}", line);
    }
}

fn hexdump_lines(base: u32, data: &[u8]) -> Vec<String> {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!(
                "{:08x}  {:<47}  |{}|",
                base as usize + i * 16,
                hex.join(" "),
                ascii
            )
        })
        .collect()
}
