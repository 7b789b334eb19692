use super::{availability, conflicts, ConflictKind, PlanOptions};
use crate::model::{AdminId, EmployeeId, Frame, FrameId, Workspace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    /// `frame_b` chevauche `frame_a` (ordre chronologique).
    Overlap(ConflictKind),
    /// Créneau hors des disponibilités déclarées.
    OutsideAvailability,
    /// Créneau assigné à un employé introuvable.
    UnknownEmployee,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub employee: EmployeeId,
    pub frame_a: FrameId,
    pub frame_b: Option<FrameId>,
    pub kind: FindingKind,
}

/// Vérifie tous les créneaux assignés de l'admin, employé par employé.
pub fn audit(workspace: &Workspace, admin: &AdminId, opts: PlanOptions) -> Vec<Finding> {
    let mut out = Vec::new();

    let mut assigned: Vec<&Frame> = workspace
        .frames
        .iter()
        .filter(|f| &f.admin_id == admin && f.employee_id.is_some())
        .collect();
    assigned.sort_by(|a, b| {
        a.employee_id
            .cmp(&b.employee_id)
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.id.cmp(&b.id))
    });

    for (idx, a) in assigned.iter().enumerate() {
        let Some(employee) = a.employee_id.as_ref() else {
            continue;
        };

        match workspace.find_employee(admin, employee) {
            None => out.push(Finding {
                employee: employee.clone(),
                frame_a: a.id.clone(),
                frame_b: None,
                kind: FindingKind::UnknownEmployee,
            }),
            Some(person) => {
                if !availability::is_available(
                    &a.interval(),
                    &person.availability,
                    opts.availability,
                    opts.utc_offset,
                ) {
                    out.push(Finding {
                        employee: employee.clone(),
                        frame_a: a.id.clone(),
                        frame_b: None,
                        kind: FindingKind::OutsideAvailability,
                    });
                }
            }
        }

        for b in assigned
            .iter()
            .skip(idx + 1)
            .take_while(|b| b.employee_id.as_ref() == Some(employee))
        {
            if let Some(kind) = conflicts::classify(&b.interval(), &a.interval()) {
                out.push(Finding {
                    employee: employee.clone(),
                    frame_a: a.id.clone(),
                    frame_b: Some(b.id.clone()),
                    kind: FindingKind::Overlap(kind),
                });
            }
        }
    }

    out
}
