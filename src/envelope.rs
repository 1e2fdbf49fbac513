//! Builds the transport envelope around a caller's payload.

use crate::core::{NotificationEvent, NotificationPayload, DEFAULT_EVENT_VERSION};
use chrono::{SecondsFormat, Utc};

/// Wraps `payload` in a [`NotificationEvent`] stamped with `source` and the
/// current time.
///
/// Never fails. Fields the caller left out stay absent in the envelope, and
/// a missing or zero version becomes 1.
pub fn build_event(payload: &NotificationPayload, source: &str) -> NotificationEvent {
    NotificationEvent {
        event_type: payload.event_type.clone(),
        created: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        source: source.to_string(),
        payload: payload.data.clone(),
        correlation_id: payload.correlation_id.clone(),
        version: payload
            .version
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_EVENT_VERSION),
    }
}
