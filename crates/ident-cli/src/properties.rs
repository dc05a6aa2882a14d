//! `--property key=value` parsing.

use std::collections::BTreeMap;

use ident_client::types::RESERVED_SIP_FIELDS;

use crate::error::CliError;

/// Parse one `key=value` argument. The value may itself contain `=`.
///
/// # Errors
///
/// Returns a message suitable for clap when the `=` is missing or the key
/// is empty.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Collect parsed pairs into a map, later keys winning, rejecting keys
/// that would shadow typed sip fields.
pub fn collect_properties(pairs: &[(String, String)]) -> Result<BTreeMap<String, String>, CliError> {
    let mut properties = BTreeMap::new();
    for (key, value) in pairs {
        if RESERVED_SIP_FIELDS.contains(&key.as_str()) {
            return Err(CliError::InvalidArgument(format!(
                "property '{key}' is reserved; use the dedicated option instead"
            )));
        }
        properties.insert(key.clone(), value.clone());
    }
    Ok(properties)
}
