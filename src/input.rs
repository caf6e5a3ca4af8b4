use std::io::Read as _;
use std::path::Path;

use tracing::debug;

use crate::prelude::*;

/// Reads a whole dump from `path`, or from stdin when no path is given.
pub fn read_dump(path: Option<&Path>) -> Result<String, Error> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading dump from file");
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            debug!("reading dump from stdin");

            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;

            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(utxodump_testing::SAMPLE_DUMP.as_bytes())
            .unwrap();

        let dump = read_dump(Some(file.path())).unwrap();

        assert_eq!(dump, utxodump_testing::SAMPLE_DUMP);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_dump(Some(Path::new("/nonexistent/utxodump/dump.txt"))).unwrap_err();
        assert!(matches!(err, Error::IO(_)));
    }
}
