use chrono::{DateTime, Utc};
use crate::domain::models::appointment::{
    Appointment, STATUS_CANCELLED_BY_CLIENT, STATUS_CANCELLED_BY_SPA, STATUS_COMPLETED,
    STATUS_CONFIRMED, STATUS_NO_SHOW, STATUS_PENDING,
};

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
/// Back-to-back slots (a_end == b_start) do not conflict.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

pub fn conflicts_with_any(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Appointment],
) -> bool {
    existing
        .iter()
        .any(|a| intervals_overlap(start, end, a.start_at, a.end_at))
}

/// The statuses an appointment may currently hold for `new_status` to be a
/// legal transition target. `None` means `new_status` is not a recognised
/// status at all. Terminal statuses never appear as a source.
pub fn allowed_sources(new_status: &str) -> Option<&'static [&'static str]> {
    match new_status {
        STATUS_CONFIRMED => Some(&[STATUS_PENDING]),
        STATUS_COMPLETED => Some(&[STATUS_CONFIRMED]),
        STATUS_NO_SHOW | STATUS_CANCELLED_BY_CLIENT | STATUS_CANCELLED_BY_SPA => {
            Some(&[STATUS_PENDING, STATUS_CONFIRMED])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn overlapping_intervals_conflict() {
        assert!(intervals_overlap(at(10, 30), at(11, 30), at(10, 0), at(11, 0)));
        assert!(intervals_overlap(at(10, 0), at(11, 0), at(10, 15), at(10, 45)));
    }

    #[test]
    fn adjacent_intervals_do_not_conflict() {
        assert!(!intervals_overlap(at(11, 0), at(12, 0), at(10, 0), at(11, 0)));
        assert!(!intervals_overlap(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        assert!(!intervals_overlap(at(14, 0), at(15, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn transition_table() {
        assert_eq!(allowed_sources(STATUS_CONFIRMED), Some(&[STATUS_PENDING][..]));
        assert_eq!(allowed_sources(STATUS_COMPLETED), Some(&[STATUS_CONFIRMED][..]));
        assert_eq!(
            allowed_sources(STATUS_NO_SHOW),
            Some(&[STATUS_PENDING, STATUS_CONFIRMED][..])
        );
        assert_eq!(
            allowed_sources(STATUS_CANCELLED_BY_CLIENT),
            Some(&[STATUS_PENDING, STATUS_CONFIRMED][..])
        );
        assert_eq!(allowed_sources("pending"), None);
        assert_eq!(allowed_sources("garbage"), None);
    }
}
