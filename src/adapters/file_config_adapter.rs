//! Journal settings read from an INI file.
//!
//! Keys live under `[storage]`, `[import]` and `[logging]`; lookups are
//! case-insensitive and values are trimmed by the parser.

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    /// Reads and parses `path`. A missing or malformed file is a
    /// `ConfigParse` error naming the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| JournalError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, JournalError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| JournalError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }

    /// An empty configuration; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { ini: Ini::new() }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const JOURNAL_INI: &str = r#"
[storage]
path = /var/lib/tradediary/journal.db
pool_size = 2

[import]
account_id = U1234567
api_key = sk-test
mapper_url = https://mapper.example/map-columns
strict = yes

[logging]
filter = tradediary=debug
"#;

    #[test]
    fn from_string_parses_config() {
        let adapter = FileConfigAdapter::from_string(JOURNAL_INI).unwrap();
        assert_eq!(
            adapter.get_string("storage", "path"),
            Some("/var/lib/tradediary/journal.db".to_string())
        );
        assert_eq!(
            adapter.get_string("import", "account_id"),
            Some("U1234567".to_string())
        );
        assert_eq!(
            adapter.get_string("logging", "filter"),
            Some("tradediary=debug".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[storage]\npath = j.db\n").unwrap();
        assert_eq!(adapter.get_string("storage", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(JOURNAL_INI).unwrap();
        assert_eq!(adapter.get_int("storage", "pool_size", 4), 2);
        assert_eq!(adapter.get_int("storage", "missing", 4), 4);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[storage]\npool_size = many\n").unwrap();
        assert_eq!(adapter.get_int("storage", "pool_size", 4), 4);
    }

    #[test]
    fn get_bool_parses_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[logging]\na = true\nb = yes\nc = 0\nd = maybe\ne = Off\n")
                .unwrap();
        assert!(adapter.get_bool("logging", "a", false));
        assert!(adapter.get_bool("logging", "b", false));
        assert!(!adapter.get_bool("logging", "c", true));
        assert!(adapter.get_bool("logging", "d", true));
        assert!(!adapter.get_bool("logging", "e", true));
        assert!(adapter.get_bool("logging", "missing", true));
    }

    #[test]
    fn malformed_string_is_config_parse_error() {
        let err = FileConfigAdapter::from_string("[storage\npath = j.db\n")
            .err()
            .unwrap();
        assert!(matches!(err, JournalError::ConfigParse { .. }));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_non_empty("storage", "path"), None);
        assert_eq!(adapter.get_int("storage", "pool_size", 4), 4);
        assert!(adapter.get_bool("logging", "ansi", true));
    }

    #[test]
    fn get_non_empty_treats_blank_as_missing() {
        let adapter = FileConfigAdapter::from_string("[import]\napi_key =   \n").unwrap();
        assert_eq!(adapter.get_non_empty("import", "api_key"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(JOURNAL_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(adapter.get_bool("import", "strict", false));
    }

    #[test]
    fn missing_file_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/tradediary.ini")
            .err()
            .unwrap();
        assert!(matches!(err, JournalError::ConfigParse { file, .. } if file.contains("tradediary.ini")));
    }
}
