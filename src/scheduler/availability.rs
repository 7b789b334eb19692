use super::types::{AvailabilityPolicy, DayMatch, Undeclared};
use super::util;
use crate::model::{AvailabilityWindow, Interval};
use chrono::FixedOffset;

/// Vrai si au moins une plage couvre le candidat.
///
/// Les jours sont comparés par nom : avec [`DayMatch::EitherBoundary`], un
/// créneau vendredi 23h → samedi 01h passe dès qu'une plage du vendredi ou
/// du samedi couvre les heures 23 → 1. [`DayMatch::SameDay`] exige en plus
/// que les deux bornes tombent le même jour.
pub fn is_available(
    candidate: &Interval,
    windows: &[AvailabilityWindow],
    policy: AvailabilityPolicy,
    offset: FixedOffset,
) -> bool {
    if windows.is_empty() {
        return policy.undeclared == Undeclared::Allow;
    }

    let (start_day, start_hour) = util::day_and_hour(candidate.start, offset);
    let (end_day, end_hour) = util::day_and_hour(candidate.end, offset);

    if policy.day_match == DayMatch::SameDay
        && !util::same_local_date(candidate.start, candidate.end, offset)
    {
        return false;
    }

    windows.iter().any(|w| {
        let day_ok = match policy.day_match {
            DayMatch::EitherBoundary => w.day == start_day || w.day == end_day,
            DayMatch::SameDay => w.day == start_day,
        };
        day_ok && u32::from(w.start_hour) <= start_hour && u32::from(w.end_hour) >= end_hour
    })
}
