//! Domain error types.
//!
//! The analytics engine itself is infallible; these errors come from the
//! import, storage and configuration layers around it.

/// Top-level error type for tradediary.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("import error: {reason}")]
    Import { reason: String },

    #[error("column mapping error: {reason}")]
    Mapping { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) => 1,
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. } => 2,
            JournalError::Database { .. } | JournalError::DatabaseQuery { .. } => 3,
            JournalError::Import { .. } | JournalError::Mapping { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_section_and_key() {
        let err = JournalError::ConfigMissing {
            section: "storage".into(),
            key: "path".into(),
        };
        assert_eq!(err.to_string(), "missing config key [storage] path");
    }

    #[test]
    fn io_errors_convert_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: JournalError = io.into();
        assert!(matches!(err, JournalError::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
