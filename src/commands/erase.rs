//! Erase command implementation

use mxflash_dummy::BLOCK_SIZE;

use super::{check_range, offset_address, progress_bar, Device};
use crate::error::Result;

/// Erase `blocks` 64 KiB blocks, starting with the block containing `addr`
pub fn run_erase(dev: &mut Device, addr: u32, blocks: u32) -> Result<()> {
    let start = addr & !(BLOCK_SIZE as u32 - 1);
    let total = u64::from(blocks) * BLOCK_SIZE as u64;
    check_range(start, total)?;

    let pb = progress_bar(total, "Erasing");
    for i in 0..u64::from(blocks) {
        dev.erase(offset_address(start, i * BLOCK_SIZE as u64)?, 1)?;
        pb.inc(BLOCK_SIZE as u64);
    }

    pb.finish_with_message("Erase complete");
    println!("Erased {} block(s) starting at 0x{:08X}", blocks, start);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_util::device;
    use crate::error::CliError;
    use mxflash_dummy::DummyConfig;

    #[test]
    fn test_erase_blocks() {
        let mut dev = device(DummyConfig::default());
        for block in 0..4u32 {
            dev.write(block * BLOCK_SIZE as u32 + 0x20, &[0x00]).unwrap();
        }

        // Starts with the block containing the address
        run_erase(&mut dev, BLOCK_SIZE as u32 + 0x10, 2).unwrap();

        let data = dev.driver().data();
        assert_eq!(data[0x20], 0x00);
        assert_eq!(data[BLOCK_SIZE + 0x20], 0xFF);
        assert_eq!(data[2 * BLOCK_SIZE + 0x20], 0xFF);
        assert_eq!(data[3 * BLOCK_SIZE + 0x20], 0x00);
    }

    #[test]
    fn test_erase_past_address_space() {
        let mut dev = device(DummyConfig {
            size: 16 * 1024 * 1024,
            ..DummyConfig::default()
        });
        // 0xFFFF_0000 masks to 0xFF_0000 with 3-byte addresses
        dev.write(0x00FF_0000, &[0x00]).unwrap();
        dev.write(0, &[0x00]).unwrap();

        let result = run_erase(&mut dev, 0xFFFF_0000, 2);
        assert!(matches!(result, Err(CliError::InvalidParameter(_))));

        // Nothing erased, not even the first block
        assert_eq!(dev.driver().data()[0x00FF_0000], 0x00);
        assert_eq!(dev.driver().data()[0], 0x00);
    }

    #[test]
    fn test_erase_last_block_of_address_space() {
        let mut dev = device(DummyConfig {
            size: 16 * 1024 * 1024,
            ..DummyConfig::default()
        });
        dev.write(0x00FF_0000, &[0x00]).unwrap();

        run_erase(&mut dev, 0xFFFF_0000, 1).unwrap();
        assert_eq!(dev.driver().data()[0x00FF_0000], 0xFF);
    }
}
