//! HTTP column-mapping service client.
//!
//! POSTs `{"headers": [...], "sampleRows": [...]}` with an `x-api-key` header
//! and expects a [`MappingResult`] JSON body back, optionally wrapped in a
//! Markdown code fence.

use crate::domain::error::JournalError;
use crate::domain::import::MappingResult;
use crate::ports::mapper_port::ColumnMapper;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapRequest<'a> {
    headers: &'a [String],
    sample_rows: &'a [HashMap<String, String>],
}

pub struct RemoteColumnMapper {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl RemoteColumnMapper {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, JournalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| JournalError::Mapping {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

impl ColumnMapper for RemoteColumnMapper {
    fn map_columns(
        &self,
        headers: &[String],
        sample_rows: &[HashMap<String, String>],
    ) -> Result<MappingResult, JournalError> {
        let body = MapRequest {
            headers,
            sample_rows,
        };

        let resp = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| JournalError::Mapping {
                reason: format!("request to {} failed: {e}", self.url),
            })?;

        let status = resp.status();
        let text = resp.text().map_err(|e| JournalError::Mapping {
            reason: format!("failed to read response: {e}"),
        })?;

        if !status.is_success() {
            return Err(JournalError::Mapping {
                reason: format!("HTTP {status}: {}", text.trim()),
            });
        }

        parse_mapping_response(&text)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Parses a mapping body, tolerating a surrounding ```` ```json ```` fence.
pub fn parse_mapping_response(text: &str) -> Result<MappingResult, JournalError> {
    let mut body = text.trim();
    body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .unwrap_or(body);
    body = body.strip_suffix("```").unwrap_or(body);

    serde_json::from_str(body.trim()).map_err(|e| JournalError::Mapping {
        reason: format!("invalid mapping response: {e}"),
    })
}
