//! Operation context encoding
//!
//! Contexts travel to the backend as an opaque string and come back on the
//! matching completion event. The wire form is a JSON array of tag names,
//! e.g. `["goodbye"]`. An empty set is sent as no context at all.

use std::collections::BTreeSet;

use voicebot_core::{OperationContext, Result};

/// Encode contexts for the backend. Duplicates collapse; order is stable.
pub fn encode_contexts<I>(contexts: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = OperationContext>,
{
    let contexts: BTreeSet<OperationContext> = contexts.into_iter().collect();
    if contexts.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(&contexts)?))
}

/// Decode contexts reported by the backend
pub fn decode_contexts(raw: Option<&str>) -> Result<BTreeSet<OperationContext>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(BTreeSet::new()),
        Some(raw) => Ok(serde_json::from_str(raw)?),
    }
}
