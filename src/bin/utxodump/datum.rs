use miette::Context;

use utxodump::prelude::*;

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum Emit {
    /// cardano's detailed json schema
    #[default]
    Json,

    /// cbor, hex-encoded
    Cbor,
}

#[derive(Debug, clap::Args)]
pub struct Args {
    /// datum as printed by cardano-cli, e.g. `ScriptDataNumber 42`
    #[arg(required_unless_present = "cbor")]
    text: Option<String>,

    /// decode a hex-encoded cbor datum instead
    #[arg(long, conflicts_with = "text")]
    cbor: Option<String>,

    /// what to print
    #[arg(long, value_enum, default_value_t)]
    emit: Emit,
}

pub fn run(config: &RootConfig, args: &Args) -> miette::Result<()> {
    crate::common::setup_tracing(&config.logging)?;

    let data = match (&args.text, &args.cbor) {
        (_, Some(cbor)) => Data::from_cbor_hex(cbor)
            .map_err(Error::from)
            .context("decoding cbor datum")?,
        (Some(text), None) => utxodump::cardano::parse_data_text(text)
            .map_err(Error::from)
            .context("decoding datum text")?,
        (None, None) => return Err(Error::message("nothing to decode").into()),
    };

    match args.emit {
        Emit::Json => crate::common::print_json(&data, &config.output)?,
        Emit::Cbor => println!("{}", data.to_cbor_hex().map_err(Error::from)?),
    }

    Ok(())
}
