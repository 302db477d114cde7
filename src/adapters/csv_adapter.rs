//! CSV table extraction for generic broker exports.

use crate::domain::error::JournalError;
use crate::domain::import::ExtractedTable;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reads and extracts the CSV file at `path`.
pub fn read_table(path: &Path) -> Result<ExtractedTable, JournalError> {
    let content = fs::read_to_string(path).map_err(|e| JournalError::Import {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    extract_table(&content)
}

/// Parses CSV text with a header row.
///
/// Headers are trimmed. Short rows are padded with empty cells and rows whose
/// cells are all blank are dropped. A malformed record is skipped unless
/// nothing parses at all, in which case the first error is returned.
pub fn extract_table(content: &str) -> Result<ExtractedTable, JournalError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| JournalError::Import {
            reason: format!("CSV parse error: {}", e),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut first_error: Option<csv::Error> = None;

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed CSV record");
                first_error.get_or_insert(e);
                continue;
            }
        };

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        if let Some(e) = first_error {
            return Err(JournalError::Import {
                reason: format!("CSV parse error: {}", e),
            });
        }
        return Ok(ExtractedTable::default());
    }

    Ok(ExtractedTable { headers, rows })
}
