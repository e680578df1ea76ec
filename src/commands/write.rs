//! Write command implementation

use std::fs;
use std::path::Path;

use super::{check_range, offset_address, progress_bar, read::read_with_progress, Device};
use crate::error::{CliError, Result};

/// Page program boundary
const PAGE_SIZE: usize = 256;

/// Run the write command
///
/// The image is programmed page by page inside a write-buffering window,
/// then read back and compared.
pub fn run_write(dev: &mut Device, addr: u32, input: &Path) -> Result<()> {
    let data = fs::read(input).map_err(|e| CliError::io(input, e))?;
    println!("Read {} bytes from {:?}", data.len(), input);
    check_range(addr, data.len() as u64)?;

    dev.begin_write_buffering();
    let written = write_with_progress(dev, addr, &data);
    dev.end_write_buffering();
    written?;

    let readback = read_with_progress(dev, addr, data.len())?;
    if let Some(pos) = readback.iter().zip(&data).position(|(a, b)| a != b) {
        return Err(CliError::VerifyFailed {
            addr: offset_address(addr, pos as u64)?,
        });
    }

    println!("Wrote {} bytes at 0x{:08X}", data.len(), addr);
    Ok(())
}

fn write_with_progress(dev: &mut Device, addr: u32, data: &[u8]) -> Result<()> {
    let pb = progress_bar(data.len() as u64, "Writing");

    let mut offset = 0usize;
    for len in page_chunks(addr, data.len()) {
        dev.write(offset_address(addr, offset as u64)?, &data[offset..offset + len])?;
        offset += len;
        pb.set_position(offset as u64);
    }

    pb.finish_with_message("Write complete");
    Ok(())
}

/// Chunk lengths that never cross a page boundary
fn page_chunks(addr: u32, len: usize) -> Vec<usize> {
    let mut chunks = Vec::new();
    let mut pos = addr as usize;
    let end = pos + len;
    while pos < end {
        let chunk = std::cmp::min(PAGE_SIZE - pos % PAGE_SIZE, end - pos);
        chunks.push(chunk);
        pos += chunk;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_util::{device, temp_path};
    use mxflash_core::spi::opcodes;
    use mxflash_dummy::DummyConfig;

    fn write_input(name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = temp_path(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_write_and_verify() {
        let mut dev = device(DummyConfig::default());
        let image: Vec<u8> = (0..600).map(|i| (i * 7) as u8).collect();
        let input = write_input("write.bin", &image);
        dev.driver_mut().clear_command_log();

        let result = run_write(&mut dev, 0xF0, &input);
        fs::remove_file(&input).unwrap();
        result.unwrap();

        assert_eq!(&dev.driver().data()[0xF0..0xF0 + 600], &image[..]);
        assert!(!dev.is_write_buffering());

        // Pages 0xF0, 0x100, 0x200, 0x300 are programmed without a status poll
        let log = dev.driver().command_log();
        let first_read = log.iter().position(|&op| op == opcodes::RDSR).unwrap();
        assert_eq!(
            log[..first_read].iter().filter(|&&op| op == opcodes::PP).count(),
            4
        );
        assert!(log[first_read..].contains(&opcodes::READ));
    }

    #[test]
    fn test_write_verify_failure() {
        let mut dev = device(DummyConfig::default());
        dev.write(0x12, &[0x00]).unwrap();
        let input = write_input("verify.bin", &[0xA5; 4]);

        let result = run_write(&mut dev, 0x10, &input);
        fs::remove_file(&input).unwrap();

        assert!(matches!(result, Err(CliError::VerifyFailed { addr: 0x12 })));
        assert!(!dev.is_write_buffering());
    }

    #[test]
    fn test_write_past_address_space() {
        let mut dev = device(DummyConfig::default());
        let input = write_input("overflow.bin", &[0x00; 2]);
        dev.driver_mut().clear_command_log();

        let result = run_write(&mut dev, 0xFFFF_FFFF, &input);
        fs::remove_file(&input).unwrap();

        assert!(matches!(result, Err(CliError::InvalidParameter(_))));
        assert!(dev.driver().command_log().is_empty());
        assert_eq!(dev.driver().data()[0x1F_FFFF], 0xFF);
    }

    #[test]
    fn test_page_chunks() {
        assert_eq!(page_chunks(0, 512), [256, 256]);
        assert_eq!(page_chunks(0xF0, 0x20), [0x10, 0x10]);
        assert_eq!(page_chunks(0x100, 10), [10]);
        assert!(page_chunks(0, 0).is_empty());
    }
}
