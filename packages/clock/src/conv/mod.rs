//! Conversions between clock timestamps and the millisecond values written
//! to the wire and to snapshots.
use filemesh_primitives::DurationSinceUnixEpoch;

/// It converts a timestamp to milliseconds since the Unix Epoch.
///
/// Saturates at `i64::MAX` (roughly 292 million years from the epoch).
#[must_use]
pub fn convert_from_timestamp_to_epoch_millis(timestamp: DurationSinceUnixEpoch) -> i64 {
    i64::try_from(timestamp.as_millis()).unwrap_or(i64::MAX)
}

/// It converts milliseconds since the Unix Epoch to a timestamp.
///
/// Returns `None` for instants before the epoch.
#[must_use]
pub fn convert_from_epoch_millis_to_timestamp(epoch_millis: i64) -> Option<DurationSinceUnixEpoch> {
    u64::try_from(epoch_millis).ok().map(DurationSinceUnixEpoch::from_millis)
}
