//! Shared timestamp/event helpers for the ladder's envelopes and views.

use serde_json::Value as JsonValue;
use ulid::Ulid;

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    format!("{}Z", now_epoch_secs())
}

pub fn now_epoch_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn parse_epoch_z(ts: &str) -> Option<u64> {
    ts.trim_end_matches('Z').parse::<u64>().ok()
}

pub fn new_event_id() -> String {
    Ulid::new().to_string()
}

/// Humanize the age of an epoch-Z timestamp relative to `now` seconds.
///
/// Buckets match the recent-outcomes feed: years, months, days, hours, mins,
/// secs — always the largest unit with a count above 1.
pub fn time_since(created_at: &str, now_secs: u64) -> String {
    let created = match parse_epoch_z(created_at) {
        Some(secs) => secs,
        None => return "unknown".to_string(),
    };
    let elapsed = now_secs.saturating_sub(created);

    const BUCKETS: &[(u64, &str)] = &[
        (31_536_000, "years"),
        (2_592_000, "months"),
        (86_400, "days"),
        (3_600, "hours"),
        (60, "mins"),
    ];
    for (unit, label) in BUCKETS {
        if elapsed > *unit {
            return format!("{} {} ago", elapsed / unit, label);
        }
    }
    format!("{} secs ago", elapsed)
}

/// Standard command response envelope used by the JSON output surfaces.
pub fn command_envelope(cmd: &str, status: &str, extra: JsonValue) -> JsonValue {
    let mut base = serde_json::json!({
        "ts": now_epoch_z(),
        "event_id": new_event_id(),
        "cmd": cmd,
        "status": status
    });
    if let (Some(base_obj), Some(extra_obj)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra_obj {
            base_obj.insert(k.clone(), v.clone());
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_epoch_z_format() {
        let result = now_epoch_z();
        assert!(result.ends_with('Z'));
        assert!(result.trim_end_matches('Z').parse::<u64>().is_ok());
    }

    #[test]
    fn test_parse_epoch_z_round_trip() {
        assert_eq!(parse_epoch_z("1771220592Z"), Some(1771220592));
        assert_eq!(parse_epoch_z("garbage"), None);
    }

    #[test]
    fn test_time_since_buckets() {
        let now = 2_000_000_000u64;
        let at = |ago: u64| format!("{}Z", now - ago);
        assert_eq!(time_since(&at(5), now), "5 secs ago");
        assert_eq!(time_since(&at(61), now), "1 mins ago");
        assert_eq!(time_since(&at(2 * 3_600), now), "2 hours ago");
        assert_eq!(time_since(&at(3 * 86_400), now), "3 days ago");
        assert_eq!(time_since(&at(60 * 86_400), now), "2 months ago");
        assert_eq!(time_since(&at(2 * 31_536_000), now), "2 years ago");
        assert_eq!(time_since("junk", now), "unknown");
    }

    #[test]
    fn test_time_since_future_timestamp_clamps_to_zero() {
        assert_eq!(time_since("2000000100Z", 2_000_000_000), "0 secs ago");
    }

    #[test]
    fn test_command_envelope_merges_extra() {
        let envelope = command_envelope("vote", "ok", serde_json::json!({"points": 16}));
        assert_eq!(envelope["cmd"], "vote");
        assert_eq!(envelope["status"], "ok");
        assert_eq!(envelope["points"], 16);
        assert!(envelope["ts"].is_string());
        assert!(ulid::Ulid::from_string(envelope["event_id"].as_str().unwrap()).is_ok());
    }
}
