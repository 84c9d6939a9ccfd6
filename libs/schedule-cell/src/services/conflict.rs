// libs/schedule-cell/src/services/conflict.rs
use chrono::NaiveTime;

use crate::models::{SlotCandidate, TimeSlot};

/// Two half-open intervals [s1,e1) and [s2,e2) overlap iff s1 < e2 AND s2 < e1.
/// This covers a candidate starting inside an existing slot, ending inside
/// one, or fully containing one. Adjacent intervals do not overlap.
pub fn overlaps(
    start1: NaiveTime,
    end1: NaiveTime,
    start2: NaiveTime,
    end2: NaiveTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// Find the first existing slot on the candidate's date that overlaps it.
/// No side effects; the caller decides how to reject.
pub fn find_conflict<'a>(
    candidate: &SlotCandidate,
    existing: &'a [TimeSlot],
) -> Option<&'a TimeSlot> {
    existing.iter().find(|slot| {
        slot.date == candidate.date
            && overlaps(
                candidate.start_time,
                candidate.end_time,
                slot.start_time,
                slot.end_time,
            )
    })
}
