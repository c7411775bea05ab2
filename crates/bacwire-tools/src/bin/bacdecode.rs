use bacwire_core::types::PropertyId;
use bacwire_core::value::{DecodeContext, VendorTagTable};
use bacwire_tools::{decode_frame, load_vendor_table, parse_address, parse_hex, ObjectTypeArg};
use clap::Parser;
use std::path::PathBuf;

/// Decode an APDU from hex and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "bacdecode")]
struct Args {
    #[arg(long)]
    hex: String,
    #[arg(long, value_enum, default_value = "analog-input")]
    object_type: ObjectTypeArg,
    /// Numeric property identifier giving context tags their meaning.
    #[arg(long, default_value_t = 85)]
    property: u32,
    /// Peer address (`network:mac`) used to pick vendor tag rules.
    #[arg(long)]
    peer: Option<String>,
    #[arg(long)]
    vendor_tags: Option<PathBuf>,
    /// Also decode the service data after the header.
    #[arg(long)]
    values: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let bytes = parse_hex(&args.hex)?;
    let table = match &args.vendor_tags {
        Some(path) => load_vendor_table(path)?,
        None => VendorTagTable::new(),
    };
    let mut ctx = DecodeContext::new(
        args.object_type.into_object_type(),
        PropertyId::from_u32(args.property),
    )
    .with_resolver(&table);
    if let Some(peer) = &args.peer {
        ctx = ctx.with_peer(parse_address(peer)?);
    }

    match decode_frame(&bytes, &ctx, args.values) {
        Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
        Err(e) => {
            eprintln!("decode failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
