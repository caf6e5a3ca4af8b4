pub mod input;
pub mod prelude;

pub use utxodump_cardano as cardano;
pub use utxodump_core as core;

use prelude::*;
use utxodump_cardano::DumpDecoder;

/// Builds a dump decoder out of the `[decoder]` config section.
pub fn decoder_from_config(config: &DecoderConfig) -> Result<DumpDecoder, Error> {
    let address = config
        .address
        .as_deref()
        .ok_or_else(|| Error::config("missing decoder address"))?;

    let decoder = DumpDecoder::new(Address::from_bech32(address)?).parallel(config.parallel);

    let decoder = match config.reference_script.as_deref() {
        Some(script) => decoder.with_reference_script(ReferenceScript::from_hex(script)?),
        None => decoder,
    };

    Ok(decoder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_required() {
        let config = DecoderConfig::default();

        assert!(matches!(
            decoder_from_config(&config),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn invalid_values_are_model_errors() {
        let config = DecoderConfig {
            address: Some("addr_nope".into()),
            ..Default::default()
        };

        assert!(matches!(
            decoder_from_config(&config),
            Err(Error::ModelError(ModelError::InvalidAddress(..)))
        ));

        let config = DecoderConfig {
            address: Some(utxodump_testing::ADDRESS.into()),
            reference_script: Some("zz".into()),
            ..Default::default()
        };

        assert!(matches!(
            decoder_from_config(&config),
            Err(Error::ModelError(ModelError::InvalidHex(_)))
        ));
    }

    #[test]
    fn reference_script_is_attached() {
        let config = DecoderConfig {
            address: Some(utxodump_testing::ADDRESS.into()),
            reference_script: Some("8201".into()),
            parallel: true,
        };

        let utxos = decoder_from_config(&config)
            .unwrap()
            .decode(utxodump_testing::SAMPLE_DUMP)
            .unwrap();

        assert_eq!(utxos.len(), 3);

        for utxo in utxos {
            assert_eq!(
                utxo.reference_script.as_deref(),
                Some(&ReferenceScript(vec![0x82, 0x01]))
            );
        }
    }
}
