//! Best-effort lookup of official bonus ball results.
//!
//! Answers come from a generative model with web search and are never
//! trusted: a human confirms any guess before it is settled.

pub mod gemini;

pub use gemini::GeminiLookup;

use crate::error::{BonusBallError, Result};
use crate::types::ExternalResult;
use async_trait::async_trait;
use serde_json::Value;

pub const LATEST_RESULT_PROMPT: &str = "What was the UK National Lottery Bonus Ball number for the most recent Saturday draw? Return only the number in JSON format: {\"number\": 23}";

pub const RECENT_RESULTS_PROMPT: &str = "List the UK National Lottery Bonus Ball numbers for the last 10 Saturday draws. Format as JSON array: [ { 'date': 'DD/MM/YYYY', 'number': X } ]. Return ONLY JSON array.";

#[async_trait]
pub trait ResultLookup: Send + Sync {
    /// Guess at the latest winning number, if one could be read.
    async fn latest_number(&self) -> Result<Option<u32>>;

    async fn recent_results(&self) -> Result<Vec<ExternalResult>>;
}

/// Reads `number` from the first `{...}` object in free text.
pub fn parse_latest_number(text: &str) -> Option<u32> {
    let start = text.find('{')?;
    let end = start + text[start..].find('}')?;
    let value: Value = serde_json::from_str(&text[start..=end]).ok()?;

    let number = match value.get("number")? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };

    u32::try_from(number).ok().filter(|n| *n > 0)
}

/// Reads the JSON array spanning the first `[` to the last `]` in free text.
/// Single-quoted pseudo-JSON is accepted.
pub fn parse_recent_results(text: &str) -> Result<Vec<ExternalResult>> {
    let start = text.find('[');
    let end = text.rfind(']');

    let slice = match (start, end) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => return Err(BonusBallError::lookup("No result list in response")),
    };

    let results: Vec<ExternalResult> = match serde_json::from_str(slice) {
        Ok(results) => results,
        Err(_) => serde_json::from_str(&slice.replace('\'', "\""))
            .map_err(|e| BonusBallError::lookup(format!("Unreadable result list: {}", e)))?,
    };

    Ok(results.into_iter().filter(|r| r.number > 0).collect())
}
