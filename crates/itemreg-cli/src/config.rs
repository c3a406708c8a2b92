//! Registry options loaded from a JSON file

use crate::CliError;
use itemreg_core::RegistryOptions;
use std::fs;
use std::path::Path;

/// Read options from `path`, or use the defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<RegistryOptions, CliError> {
    let Some(path) = path else {
        return Ok(RegistryOptions::default());
    };

    let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load(None).unwrap(), RegistryOptions::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("itemreg.json");
        fs::write(&path, r#"{"scan_batch": 10, "cache_size": 1048576}"#).unwrap();

        let options = load(Some(&path)).unwrap();
        assert_eq!(options.scan_batch, 10);
        assert_eq!(options.store.cache_size, Some(1_048_576));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, CliError::ConfigRead { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "scan_batch = 3").unwrap();
        assert!(matches!(load(Some(&path)), Err(CliError::ConfigParse { .. })));
    }
}
