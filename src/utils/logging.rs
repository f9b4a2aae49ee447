use serde::Serialize;
use tracing::{Level, debug};

/// Log a request payload as pretty JSON; serialization is skipped unless DEBUG is enabled.
pub(crate) fn debug_payload<T: Serialize>(what: &str, value: &T) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(json) => debug!(payload = %json, "{what}"),
        Err(error) => debug!(%error, "{what}: payload not serializable"),
    }
}
