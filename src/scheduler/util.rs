use crate::model::{Day, EmployeeId, Frame, FrameId};
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

/// Jour de la semaine et heure (0-23) de `at` lus dans `offset`.
pub(super) fn day_and_hour(at: DateTime<Utc>, offset: FixedOffset) -> (Day, u32) {
    let local = at.with_timezone(&offset);
    (Day::from(local.weekday()), local.hour())
}

pub(super) fn same_local_date(a: DateTime<Utc>, b: DateTime<Utc>, offset: FixedOffset) -> bool {
    a.with_timezone(&offset).date_naive() == b.with_timezone(&offset).date_naive()
}

/// Créneaux déjà assignés à `employee`, hors `exclude`, triés par début puis id.
pub(super) fn committed_frames<'a>(
    frames: &'a [Frame],
    employee: &EmployeeId,
    exclude: Option<&FrameId>,
) -> Vec<&'a Frame> {
    let mut out: Vec<&Frame> = frames
        .iter()
        .filter(|f| f.employee_id.as_ref() == Some(employee))
        .filter(|f| exclude != Some(&f.id))
        .collect();
    out.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    out
}

pub(super) fn find_frame_index(frames: &[Frame], frame_id: &FrameId) -> Option<usize> {
    frames.iter().position(|f| &f.id == frame_id)
}
