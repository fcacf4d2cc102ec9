use crate::server::error::internal::InternalError;

/// Parses a u64 value from a stored string id.
///
/// # Arguments
/// - `value` - The string to parse
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed id
/// - `Err(InternalError::ParseStringId)` - The value is not a valid u64
pub fn parse_u64_from_string(value: &str) -> Result<u64, InternalError> {
    value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId {
            value: value.to_string(),
            source: e,
        })
}

/// Parses an optional stored id.
pub fn parse_optional_id(value: Option<&str>) -> Result<Option<u64>, InternalError> {
    value.map(parse_u64_from_string).transpose()
}

/// Reads a JSON column holding a list of string ids.
///
/// # Arguments
/// - `column` - Column name, used in the error message
/// - `value` - The stored JSON document
///
/// # Returns
/// - `Ok(Vec<u64>)` - Parsed ids in stored order
/// - `Err(InternalError)` - The document is not a list of numeric strings
pub fn parse_id_list(
    column: &'static str,
    value: &serde_json::Value,
) -> Result<Vec<u64>, InternalError> {
    let raw: Vec<String> =
        serde_json::from_value(value.clone()).map_err(|e| InternalError::MalformedJson {
            column,
            reason: e.to_string(),
        })?;

    raw.iter().map(|id| parse_u64_from_string(id)).collect()
}

/// Serializes ids back into the stored JSON list-of-strings form.
pub fn id_list_to_json(ids: &[u64]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect(),
    )
}

/// Reads a JSON column holding a list of strings.
pub fn parse_string_list(
    column: &'static str,
    value: &serde_json::Value,
) -> Result<Vec<String>, InternalError> {
    serde_json::from_value(value.clone()).map_err(|e| InternalError::MalformedJson {
        column,
        reason: e.to_string(),
    })
}

/// Parses a Discord snowflake typed by a user, accepting mention syntax.
///
/// `<@123>`, `<@!123>`, `<#123>`, `<@&123>` and a bare `123` all yield `123`.
pub fn parse_snowflake(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches(['@', '#', '!', '&']))
        .unwrap_or(trimmed);

    inner.parse::<u64>().ok().filter(|id| *id != 0)
}
