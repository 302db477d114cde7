//! Configuration validation.
//!
//! Checks the journal config before any store is opened.

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_storage_path(config)?;
    validate_pool_size(config)?;
    validate_mapper(config)?;
    Ok(())
}

fn validate_storage_path(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_non_empty("storage", "path") {
        Some(_) => Ok(()),
        None => Err(JournalError::ConfigMissing {
            section: "storage".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let value = config.get_int("storage", "pool_size", 4);
    if value <= 0 {
        return Err(JournalError::ConfigInvalid {
            section: "storage".to_string(),
            key: "pool_size".to_string(),
            reason: "pool_size must be positive".to_string(),
        });
    }
    Ok(())
}

/// Mapper credentials and URL must be configured together.
fn validate_mapper(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let key = config.get_non_empty("import", "api_key");
    let url = config.get_non_empty("import", "mapper_url");
    match (key, url) {
        (Some(_), None) => Err(JournalError::ConfigMissing {
            section: "import".to_string(),
            key: "mapper_url".to_string(),
        }),
        (None, Some(_)) => Err(JournalError::ConfigMissing {
            section: "import".to_string(),
            key: "api_key".to_string(),
        }),
        (_, Some(url)) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            Err(JournalError::ConfigInvalid {
                section: "import".to_string(),
                key: "mapper_url".to_string(),
                reason: "mapper_url must be an http(s) URL".to_string(),
            })
        }
        _ => Ok(()),
    }
}
