// ABOUTME: Recovers a JSON value from free-form model output.
// ABOUTME: Whole-text parse first, then the slice from the first '{' to the last '}'.

use serde_json::Value;

use crate::error::LlmError;

/// Parse JSON out of a model reply that may be wrapped in prose or code fences.
///
/// Tries the whole text, then the substring spanning the first `{` through the
/// last `}`. Text holding several separate objects is sliced across all of
/// them, which usually fails to parse; callers rely on that failure boundary.
pub fn extract_json(text: &str) -> Result<Value, LlmError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && start < end
        && let Ok(value) = serde_json::from_str::<Value>(&text[start..=end])
    {
        return Ok(value);
    }

    Err(LlmError::JsonExtractionFailed)
}
