use chrono::{DateTime, Utc};

/// Milliseconds since the Unix epoch, clamped to zero for earlier instants.
pub fn timestamp_millis(time: DateTime<Utc>) -> u64 {
    u64::try_from(time.timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converts_to_millis() {
        let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(timestamp_millis(time), 1_700_000_000_123);
    }

    #[test]
    fn clamps_pre_epoch_times() {
        let time = Utc.timestamp_millis_opt(-5).unwrap();
        assert_eq!(timestamp_millis(time), 0);
    }
}
