//! Column-mapping port trait.

use crate::domain::error::JournalError;
use crate::domain::import::MappingResult;
use std::collections::HashMap;

/// Maps arbitrary table headers onto the normalized execution fields.
pub trait ColumnMapper {
    fn map_columns(
        &self,
        headers: &[String],
        sample_rows: &[HashMap<String, String>],
    ) -> Result<MappingResult, JournalError>;

    /// Short label used in log lines.
    fn name(&self) -> &'static str;
}
