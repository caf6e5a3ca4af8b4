use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use utxodump_core::RootConfig;

mod common;
mod datum;
mod utxo;

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode the output of `cardano-cli query utxo`
    Utxo(utxo::Args),

    /// Decode a single inline datum
    Datum(datum::Args),
}

#[derive(Debug, Parser)]
#[clap(name = "utxodump")]
#[clap(bin_name = "utxodump")]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(explicit_file: &Option<PathBuf>) -> Result<RootConfig, config::ConfigError> {
    let mut s = config::Config::builder();

    // our base config will always be in /etc/utxodump
    s = s.add_source(config::File::with_name("/etc/utxodump/utxodump.toml").required(false));

    // but we can override it by having a file in the working dir
    s = s.add_source(config::File::with_name("utxodump.toml").required(false));

    // if an explicit file was passed, then we load it as mandatory
    if let Some(explicit) = explicit_file.as_ref().and_then(|x| x.to_str()) {
        s = s.add_source(config::File::with_name(explicit).required(true));
    }

    // finally, we use env vars to make some last-step overrides
    s = s.add_source(
        config::Environment::with_prefix("UTXODUMP")
            .prefix_separator("_")
            .separator("__"),
    );

    s.build()?.try_deserialize()
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let config = load_config(&args.config).into_diagnostic()?;

    match args.command {
        Command::Utxo(x) => utxo::run(&config, &x)?,
        Command::Datum(x) => datum::run(&config, &x)?,
    };

    Ok(())
}
