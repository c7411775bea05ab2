use bacwire_tools::{encode_value, parse_value, to_hex, ValueKind};
use clap::Parser;

/// Encode one value and print its bytes as hex.
#[derive(Parser, Debug)]
#[command(name = "bacencode")]
struct Args {
    #[arg(long, value_enum)]
    kind: ValueKind,
    #[arg(long, default_value = "")]
    value: String,
    /// Encode under this context tag instead of the application tag.
    #[arg(long)]
    context_tag: Option<u8>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let value = parse_value(args.kind, &args.value)?;
    let bytes = encode_value(&value, args.context_tag)?;
    println!("{}", to_hex(&bytes));
    Ok(())
}
