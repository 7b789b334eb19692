use super::{availability, conflicts, util, PlanError, Planner};
use crate::model::{AdminId, EmployeeId, Frame, FrameId, FramePatch, Interval, NewFrame};
use chrono::Utc;

pub(super) fn create_frame(
    planner: &mut Planner,
    admin: &AdminId,
    frame: NewFrame,
) -> Result<FrameId, PlanError> {
    let NewFrame {
        employee_id,
        interval,
    } = frame;
    Interval::new(interval.start, interval.end)?;

    if let Some(employee) = &employee_id {
        admit(planner, admin, employee, &interval, None)?;
    }

    let now = Utc::now();
    let frame = Frame {
        id: FrameId::random(),
        admin_id: admin.clone(),
        employee_id,
        start: interval.start,
        end: interval.end,
        created_at: now,
        updated_at: now,
    };
    let id = frame.id.clone();
    tracing::debug!(frame = %id, admin = %admin, "frame created");
    planner.workspace.frames.push(frame);
    Ok(id)
}

pub(super) fn update_frame(
    planner: &mut Planner,
    admin: &AdminId,
    frame_id: &FrameId,
    patch: FramePatch,
) -> Result<Frame, PlanError> {
    let Some(pos) = util::find_frame_index(&planner.workspace.frames, frame_id)
        .filter(|&i| &planner.workspace.frames[i].admin_id == admin)
    else {
        return Err(PlanError::UnknownFrame(frame_id.clone()));
    };

    let current = &planner.workspace.frames[pos];
    let interval = Interval::new(
        patch.start.unwrap_or(current.start),
        patch.end.unwrap_or(current.end),
    )?;
    let employee = match patch.employee {
        Some(next) => next,
        None => current.employee_id.clone(),
    };

    if let Some(employee) = &employee {
        admit(planner, admin, employee, &interval, Some(frame_id))?;
    }

    let frame = &mut planner.workspace.frames[pos];
    frame.start = interval.start;
    frame.end = interval.end;
    frame.employee_id = employee;
    frame.updated_at = Utc::now();
    tracing::debug!(frame = %frame_id, admin = %admin, "frame updated");
    Ok(frame.clone())
}

pub(super) fn delete_frame(
    planner: &mut Planner,
    admin: &AdminId,
    frame_id: &FrameId,
) -> Option<Frame> {
    let pos = util::find_frame_index(&planner.workspace.frames, frame_id)
        .filter(|&i| &planner.workspace.frames[i].admin_id == admin)?;
    tracing::debug!(frame = %frame_id, admin = %admin, "frame deleted");
    Some(planner.workspace.frames.remove(pos))
}

/// Disponibilité puis chevauchements pour `employee` sur `interval`.
fn admit(
    planner: &Planner,
    admin: &AdminId,
    employee: &EmployeeId,
    interval: &Interval,
    exclude: Option<&FrameId>,
) -> Result<(), PlanError> {
    let person = planner
        .workspace
        .find_employee(admin, employee)
        .ok_or_else(|| PlanError::UnknownEmployee(employee.clone()))?;

    if !availability::is_available(
        interval,
        &person.availability,
        planner.opts.availability,
        planner.opts.utc_offset,
    ) {
        tracing::warn!(employee = %employee, "frame outside declared availability");
        return Err(PlanError::NotAvailable);
    }

    let existing: Vec<Interval> =
        util::committed_frames(&planner.workspace.frames, employee, exclude)
            .into_iter()
            .map(Frame::interval)
            .collect();

    if let Some(kind) = conflicts::find_conflict(interval, &existing) {
        tracing::warn!(
            employee = %employee,
            kind = kind.code(),
            "frame conflicts with existing frame"
        );
        return Err(PlanError::Conflict(kind));
    }
    Ok(())
}
