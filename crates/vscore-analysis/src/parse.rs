//! Parsing of generated analysis text.

use vscore_models::AnalysisReport;

use crate::error::AnalysisResult;

/// Remove a surrounding markdown code fence (` ```json ... ``` `) if present.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Parse generated text into a report.
///
/// Missing lists default to empty; scores are clamped into range. A report
/// parsed here never carries the fallback error marker.
pub fn parse_report(text: &str) -> AnalysisResult<AnalysisReport> {
    let mut report: AnalysisReport = serde_json::from_str(strip_code_fences(text))?;
    report.error = None;
    Ok(report)
}
