//! Primary/fallback mapper chaining.

use crate::domain::error::JournalError;
use crate::domain::import::MappingResult;
use crate::ports::mapper_port::ColumnMapper;
use std::collections::HashMap;

/// Tries `primary` and falls back to `fallback` on any error.
pub struct FallbackColumnMapper {
    primary: Box<dyn ColumnMapper>,
    fallback: Box<dyn ColumnMapper>,
}

impl FallbackColumnMapper {
    pub fn new(primary: Box<dyn ColumnMapper>, fallback: Box<dyn ColumnMapper>) -> Self {
        Self { primary, fallback }
    }
}

impl ColumnMapper for FallbackColumnMapper {
    fn map_columns(
        &self,
        headers: &[String],
        sample_rows: &[HashMap<String, String>],
    ) -> Result<MappingResult, JournalError> {
        match self.primary.map_columns(headers, sample_rows) {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "column mapping failed, falling back"
                );
                self.fallback.map_columns(headers, sample_rows)
            }
        }
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}
