//! Wall-clock formatting for device-facing timestamps.
//!
//! Devices and the mobile app display times in São Paulo civil time.
//! Brazil abolished daylight saving in 2019, so América/São Paulo is a
//! constant UTC-3 offset and a full tz database is not needed.

use chrono::{DateTime, FixedOffset, Utc};

const SAO_PAULO_UTC_OFFSET_SECS: i32 = -3 * 3600;

fn sao_paulo(epoch_ms: i64) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(SAO_PAULO_UTC_OFFSET_SECS)?;
    Some(DateTime::<Utc>::from_timestamp_millis(epoch_ms)?.with_timezone(&offset))
}

/// "HH:MM:SS" in São Paulo civil time.
pub fn format_time(epoch_ms: i64) -> String {
    sao_paulo(epoch_ms)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// "DD/MM/YYYY" in São Paulo civil time.
pub fn format_date(epoch_ms: i64) -> String {
    sao_paulo(epoch_ms)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// Current time as epoch milliseconds, the `TIME` field of every snapshot.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
