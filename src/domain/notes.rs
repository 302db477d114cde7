//! Free-text journal notes attached to a day or to a single trade.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNote {
    pub date: String,
    pub account_id: String,
    pub content: String,
    pub updated_at: i64,
}

/// Note keyed by (date, symbol, account), i.e. one aggregated trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeNote {
    pub date: String,
    pub symbol: String,
    pub account_id: String,
    pub content: String,
    pub tags: Vec<String>,
    pub updated_at: i64,
}

/// Splits a comma-separated tag list, dropping blanks and duplicates.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in input.split(',') {
        let tag = token.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_trims_and_dedups() {
        assert_eq!(
            parse_tags(" breakout, fomo ,,breakout"),
            vec!["breakout".to_string(), "fomo".to_string()]
        );
    }

    #[test]
    fn parse_tags_empty() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }
}
