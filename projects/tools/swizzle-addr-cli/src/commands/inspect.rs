use crate::error::CliError;
use crate::util::{build_addresser, parse_block_size};
use argh::FromArgs;
use swizzle_addr_core::{Addresser, Axis, ElementSize, Extent3D, LUT_CAPACITY};

#[derive(FromArgs, Debug)]
/// Print the properties, lookup tables and copy routine of a swizzle equation
#[argh(subcommand, name = "inspect")]
pub struct InspectCmd {
    /// equation, least significant bit first (e.g. "0 x0 x1 y0 y1^x2")
    #[argh(option)]
    pub equation: String,

    /// block size in elements, as WxHxD
    #[argh(option, from_str_fn(parse_block_size))]
    pub block: Extent3D,

    /// log2 of the block size in bytes
    #[argh(option)]
    pub block_bits: u32,
}

pub fn handle_inspect_command(cmd: InspectCmd) -> Result<(), CliError> {
    let addresser = build_addresser(&cmd.equation, cmd.block, cmd.block_bits)?;
    print!("{}", describe(&addresser));
    Ok(())
}

fn describe(addresser: &Addresser) -> String {
    let equation = addresser.equation();
    let block = addresser.block_size();
    let mut out = String::new();

    out += &format!("Equation:     {equation}\n");
    out += &format!(
        "Block:        {}x{}x{} elements, {} bytes\n",
        block.width,
        block.height,
        block.depth,
        1u64 << addresser.block_size_bits()
    );
    out += &format!(
        "Element size: {} bytes\n",
        1u64 << addresser.element_size_log2()
    );
    out += &format!(
        "expandX:      {} ({:?} batch)\n",
        addresser.expand_x(),
        addresser.batch_class()
    );

    out += "Bits:\n";
    for index in 0..equation.valid_len() {
        out += &format!("  {index:>2}: {}\n", equation.bit(index));
    }

    out += "Lookup tables:\n";
    for axis in Axis::ALL {
        let mask = addresser.lut_mask(axis);
        if mask == 0 {
            continue;
        }
        out += &format!(
            "  {}: mask {mask:#06x}, {} entries\n",
            axis.letter(),
            addresser.lut(axis).len()
        );
    }
    out += &format!(
        "  {} of {LUT_CAPACITY} entries used\n",
        addresser.lut_entries_used()
    );

    match ElementSize::from_log2(addresser.element_size_log2()) {
        Some(size) => {
            out += &format!(
                "Copy routine: {:?} x {:?}\n",
                size,
                addresser.batch_class()
            )
        }
        None => out += "Copy routine: none, element size is not supported\n",
    }

    out
}
