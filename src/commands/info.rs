//! Info command implementation

use mxflash_core::flash::OpKind;

use super::Device;

/// Print what bring-up found and how operations are dispatched
pub fn run_info(dev: &mut Device) {
    println!("Flash Device Information");
    println!("========================");
    println!();
    println!("Base address:    0x{:08X}", dev.config().base_address);
    println!(
        "Size:            {} bytes ({} KiB)",
        dev.driver().data().len(),
        dev.driver().data().len() / 1024
    );
    println!("Address mode:    {}", dev.address_mode());
    println!("State:           {}", dev.state());
    println!("Capabilities:    {:?}", dev.caps());

    if let Some(table) = dev.op_table() {
        println!();
        println!("Command set:");
        for kind in [OpKind::Read, OpKind::Write, OpKind::Erase] {
            let variant = table.get(kind);
            println!(
                "  {:6} {} (opcode 0x{:02X})",
                kind,
                variant,
                variant.opcode(kind)
            );
        }
    }
}
