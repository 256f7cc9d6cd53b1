use chrono::{DateTime, Utc};

use crate::models::{Direction, TradeKey};

/// Round a timestamp down to the nearest bucket boundary. Width is a tunable:
/// wider buckets risk correlating unrelated trades, narrower ones risk
/// splitting one trade across keys.
pub fn bucket_timestamp(at: DateTime<Utc>, bucket_secs: i64) -> i64 {
    let width = bucket_secs.max(1);
    at.timestamp().div_euclid(width) * width
}

/// Deterministic correlation key: same symbol, direction and bucketed time
/// always yield the identical key, so replay is idempotent.
pub fn derive_key(symbol: &str, direction: Direction, at: DateTime<Utc>, bucket_secs: i64) -> TradeKey {
    TradeKey::from_parts(symbol, direction, &bucket_timestamp(at, bucket_secs).to_string())
}

/// Key built from an out-of-band reference (reply-to / thread id) instead of
/// a time bucket.
pub fn external_key(symbol: &str, direction: Direction, external_id: &str) -> TradeKey {
    TradeKey::from_parts(symbol, direction, external_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn bucket_rounds_down() {
        assert_eq!(bucket_timestamp(at(14400), 14400), 14400);
        assert_eq!(bucket_timestamp(at(14401), 14400), 14400);
        assert_eq!(bucket_timestamp(at(28799), 14400), 14400);
        assert_eq!(bucket_timestamp(at(28800), 14400), 28800);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive_key("BTCUSDT", Direction::Long, at(15000), 14400);
        let b = derive_key("BTCUSDT", Direction::Long, at(16000), 14400);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "BTCUSDT:LONG:14400");
    }

    #[test]
    fn any_input_change_changes_key() {
        let base = derive_key("BTCUSDT", Direction::Long, at(15000), 14400);
        assert_ne!(base, derive_key("ETHUSDT", Direction::Long, at(15000), 14400));
        assert_ne!(base, derive_key("BTCUSDT", Direction::Short, at(15000), 14400));
        assert_ne!(base, derive_key("BTCUSDT", Direction::Long, at(15000 + 14400), 14400));
    }

    #[test]
    fn external_key_bypasses_bucketing() {
        let key = external_key("BTCUSDT", Direction::Short, "msg-4471");
        assert_eq!(key.as_str(), "BTCUSDT:SHORT:msg-4471");
    }
}
