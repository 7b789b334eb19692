mod audit;
mod availability;
mod conflicts;
mod mutate;
mod staff;
mod types;
mod util;

pub use audit::{audit, Finding, FindingKind};
pub use availability::is_available;
pub use conflicts::{classify, find_conflict};
pub use types::{
    AvailabilityPolicy, ConflictKind, DayMatch, PlanError, PlanOptions, Undeclared,
};

use crate::model::{
    AdminId, AvailabilityWindow, DateRange, Employee, EmployeeId, Frame, FrameId, FramePatch,
    NewEmployee, NewFrame, Workspace,
};

/// Planner : encapsule le Workspace et admet ou refuse les créneaux.
///
/// Toutes les mutations passent par `&mut self` : la lecture des créneaux
/// existants, la détection et l'écriture forment une seule section.
#[derive(Debug, Default)]
pub struct Planner {
    workspace: Workspace,
    opts: PlanOptions,
}

impl Planner {
    pub fn new(opts: PlanOptions) -> Self {
        Self {
            workspace: Workspace::default(),
            opts,
        }
    }

    pub fn with_workspace(workspace: Workspace, opts: PlanOptions) -> Self {
        Self { workspace, opts }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }
    pub fn options(&self) -> PlanOptions {
        self.opts
    }

    pub fn add_employee(
        &mut self,
        admin: &AdminId,
        employee: NewEmployee,
    ) -> Result<EmployeeId, PlanError> {
        staff::add_employee(self, admin, employee)
    }

    pub fn set_availability(
        &mut self,
        admin: &AdminId,
        employee: &EmployeeId,
        windows: Vec<AvailabilityWindow>,
    ) -> Result<(), PlanError> {
        staff::set_availability(self, admin, employee, windows)
    }

    pub fn remove_employee(
        &mut self,
        admin: &AdminId,
        employee: &EmployeeId,
    ) -> Result<Employee, PlanError> {
        staff::remove_employee(self, admin, employee)
    }

    /// Employés de l'admin, triés par nom.
    pub fn employees(&self, admin: &AdminId) -> Vec<&Employee> {
        let mut out: Vec<&Employee> = self
            .workspace
            .employees
            .iter()
            .filter(|e| &e.admin_id == admin)
            .collect();
        out.sort_by(|a, b| {
            a.lastname
                .cmp(&b.lastname)
                .then_with(|| a.firstname.cmp(&b.firstname))
        });
        out
    }

    pub fn create_frame(&mut self, admin: &AdminId, frame: NewFrame) -> Result<FrameId, PlanError> {
        mutate::create_frame(self, admin, frame)
    }

    pub fn update_frame(
        &mut self,
        admin: &AdminId,
        frame_id: &FrameId,
        patch: FramePatch,
    ) -> Result<Frame, PlanError> {
        mutate::update_frame(self, admin, frame_id, patch)
    }

    /// Supprime un créneau ; `None` s'il n'existait pas.
    pub fn delete_frame(&mut self, admin: &AdminId, frame_id: &FrameId) -> Option<Frame> {
        mutate::delete_frame(self, admin, frame_id)
    }

    pub fn frame(&self, admin: &AdminId, frame_id: &FrameId) -> Result<&Frame, PlanError> {
        self.workspace
            .find_frame(admin, frame_id)
            .ok_or_else(|| PlanError::UnknownFrame(frame_id.clone()))
    }

    /// Créneaux de l'admin triés par début, filtrés sur le début si `range`.
    pub fn frames(&self, admin: &AdminId, range: Option<DateRange>) -> Vec<&Frame> {
        let mut out: Vec<&Frame> = self
            .workspace
            .frames
            .iter()
            .filter(|f| &f.admin_id == admin)
            .filter(|f| range.map_or(true, |r| r.contains(f.start)))
            .collect();
        out.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        out
    }

    pub fn frames_for_employee(
        &self,
        admin: &AdminId,
        employee: &EmployeeId,
    ) -> Result<Vec<&Frame>, PlanError> {
        if self.workspace.find_employee(admin, employee).is_none() {
            return Err(PlanError::UnknownEmployee(employee.clone()));
        }
        Ok(self
            .frames(admin, None)
            .into_iter()
            .filter(|f| f.employee_id.as_ref() == Some(employee))
            .collect())
    }

    /// Rapport de cohérence sur tous les créneaux de l'admin.
    pub fn audit(&self, admin: &AdminId) -> Vec<Finding> {
        audit::audit(&self.workspace, admin, self.opts)
    }
}
