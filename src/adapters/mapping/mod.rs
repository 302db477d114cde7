//! Column mappers for generic CSV imports.

pub mod alias;
pub mod fallback;
#[cfg(feature = "remote-mapper")]
pub mod remote;

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;
use crate::ports::mapper_port::ColumnMapper;
use alias::AliasColumnMapper;

/// Rows passed to a mapper alongside the headers.
pub const SAMPLE_ROWS: usize = 3;

/// Picks the mapper for this configuration.
///
/// With `[import] api_key` and `mapper_url` set, the remote service is tried
/// first and the alias table is the fallback. Otherwise the alias table is
/// used alone.
pub fn select_mapper(config: &dyn ConfigPort) -> Result<Box<dyn ColumnMapper>, JournalError> {
    let key = config.get_non_empty("import", "api_key");
    let url = config.get_non_empty("import", "mapper_url");

    match (key, url) {
        (Some(key), Some(url)) => remote_with_fallback(url, key),
        _ => Ok(Box::new(AliasColumnMapper)),
    }
}

#[cfg(feature = "remote-mapper")]
fn remote_with_fallback(url: String, key: String) -> Result<Box<dyn ColumnMapper>, JournalError> {
    let remote = remote::RemoteColumnMapper::new(url, key)?;
    Ok(Box::new(fallback::FallbackColumnMapper::new(
        Box::new(remote),
        Box::new(AliasColumnMapper),
    )))
}

#[cfg(not(feature = "remote-mapper"))]
fn remote_with_fallback(url: String, _key: String) -> Result<Box<dyn ColumnMapper>, JournalError> {
    tracing::warn!(%url, "built without remote-mapper, using alias mapping");
    Ok(Box::new(AliasColumnMapper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn alias_without_credentials() {
        let config = FileConfigAdapter::from_string("[storage]\npath = j.db\n").unwrap();
        let mapper = select_mapper(&config).unwrap();
        assert_eq!(mapper.name(), "alias");
    }

    #[test]
    fn key_without_url_stays_offline() {
        let config = FileConfigAdapter::from_string("[import]\napi_key = k\n").unwrap();
        assert_eq!(select_mapper(&config).unwrap().name(), "alias");
    }

    #[cfg(feature = "remote-mapper")]
    #[test]
    fn remote_first_when_configured() {
        let config = FileConfigAdapter::from_string(
            "[import]\napi_key = k\nmapper_url = http://127.0.0.1:9/map\n",
        )
        .unwrap();
        assert_eq!(select_mapper(&config).unwrap().name(), "remote");
    }
}
