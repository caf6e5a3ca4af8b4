use miette::IntoDiagnostic;
use tracing_subscriber::{filter::Targets, prelude::*};

use utxodump_core::{LoggingConfig, OutputConfig};

pub fn setup_tracing(config: &LoggingConfig) -> miette::Result<()> {
    let level = config.max_level;

    let mut filter = Targets::new()
        .with_target("utxodump", level)
        .with_target("utxodump_cardano", level)
        .with_target("utxodump_core", level);

    if config.include_pallas {
        filter = filter.with_target("pallas", level);
    }

    // stdout is reserved for decoded output
    tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish()
        .with(filter)
        .init();

    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T, config: &OutputConfig) -> miette::Result<()> {
    let text = if config.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .into_diagnostic()?;

    println!("{text}");

    Ok(())
}
