use std::path::PathBuf;

#[cfg(feature = "utils")]
use itertools::Itertools;
use miette::Context;
use tracing::info;

use utxodump::prelude::*;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// file with the dump, reads stdin when omitted
    file: Option<PathBuf>,

    /// bech32 address the dump was queried for
    #[arg(long)]
    address: Option<String>,

    /// hex-encoded script to attach to every output
    #[arg(long)]
    reference_script: Option<String>,

    /// decode lines in parallel
    #[arg(long)]
    parallel: bool,

    /// output format (json or table)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// pretty-print json output
    #[arg(long)]
    pretty: bool,
}

enum Formatter {
    Json(Vec<Utxo>),
    #[cfg(feature = "utils")]
    Table(comfy_table::Table),
}

#[cfg(feature = "utils")]
fn describe_datum(datum: Option<&Datum>) -> String {
    match datum {
        None => "none".into(),
        Some(Datum::Hash(x)) => format!("hash {x}"),
        Some(Datum::Inline(x)) => match x.to_cbor_hex() {
            Ok(cbor) => format!("inline {cbor}"),
            Err(_) => "inline".into(),
        },
    }
}

impl Formatter {
    fn new(format: OutputFormat) -> Result<Self, Error> {
        match format {
            OutputFormat::Json => Ok(Self::Json(vec![])),
            #[cfg(feature = "utils")]
            OutputFormat::Table => {
                let mut table = comfy_table::Table::new();
                table.set_header(vec!["Reference", "Lovelace", "Assets", "Datum"]);

                Ok(Self::Table(table))
            }
            #[cfg(not(feature = "utils"))]
            OutputFormat::Table => Err(Error::config("table output requires the utils feature")),
        }
    }

    fn write(&mut self, utxo: Utxo) {
        match self {
            Formatter::Json(all) => all.push(utxo),
            #[cfg(feature = "utils")]
            Formatter::Table(table) => {
                let assets = utxo
                    .value
                    .assets()
                    .map(|(policy, name, quantity)| {
                        format!("{quantity} {policy}.{}", hex::encode(name))
                    })
                    .join("\n");

                table.add_row(vec![
                    utxo.reference.to_string(),
                    utxo.value.lovelace.to_string(),
                    assets,
                    describe_datum(utxo.datum.as_ref()),
                ]);
            }
        }
    }

    fn flush(self, config: &OutputConfig) -> miette::Result<()> {
        match self {
            Formatter::Json(all) => crate::common::print_json(&all, config),
            #[cfg(feature = "utils")]
            Formatter::Table(table) => {
                println!("{table}");
                Ok(())
            }
        }
    }
}

pub fn run(config: &RootConfig, args: &Args) -> miette::Result<()> {
    crate::common::setup_tracing(&config.logging)?;

    let mut decoder_config = config.decoder.clone();

    if let Some(address) = &args.address {
        decoder_config.address = Some(address.clone());
    }

    if let Some(script) = &args.reference_script {
        decoder_config.reference_script = Some(script.clone());
    }

    decoder_config.parallel |= args.parallel;

    let mut output = config.output.clone();
    output.format = args.format.unwrap_or(output.format);
    output.pretty |= args.pretty;

    let decoder = utxodump::decoder_from_config(&decoder_config)?;

    let dump = utxodump::input::read_dump(args.file.as_deref()).context("reading dump")?;

    let utxos = decoder
        .decode(&dump)
        .map_err(Error::from)
        .context("decoding dump")?;

    info!(count = utxos.len(), "decoded dump");

    let mut formatter = Formatter::new(output.format)?;

    for utxo in utxos {
        formatter.write(utxo);
    }

    formatter.flush(&output)
}
