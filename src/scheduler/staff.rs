use super::{PlanError, Planner};
use crate::model::{AdminId, AvailabilityWindow, Employee, EmployeeId, NewEmployee};
use crate::validate;

pub(super) fn add_employee(
    planner: &mut Planner,
    admin: &AdminId,
    input: NewEmployee,
) -> Result<EmployeeId, PlanError> {
    validate::check_all(&[
        (validate::FIRSTNAME, Some(input.firstname.as_str())),
        (validate::LASTNAME, Some(input.lastname.as_str())),
        (validate::EMAIL, Some(input.email.as_str())),
        (validate::PHONE_NUMBER, input.phone_number.as_deref()),
    ])?;
    if !input.email.contains('@') {
        return Err(PlanError::validation("email", "must be an email address"));
    }
    if planner
        .workspace
        .find_employee_by_email(admin, &input.email)
        .is_some()
    {
        return Err(PlanError::validation("email", "already exists"));
    }
    check_windows(&input.availability)?;

    let employee = Employee {
        id: EmployeeId::random(),
        admin_id: admin.clone(),
        firstname: input.firstname.trim().to_string(),
        lastname: input.lastname.trim().to_string(),
        email: input.email,
        phone_number: input.phone_number,
        availability: input.availability,
    };
    let id = employee.id.clone();
    tracing::debug!(employee = %id, admin = %admin, "employee added");
    planner.workspace.employees.push(employee);
    Ok(id)
}

pub(super) fn set_availability(
    planner: &mut Planner,
    admin: &AdminId,
    employee: &EmployeeId,
    windows: Vec<AvailabilityWindow>,
) -> Result<(), PlanError> {
    check_windows(&windows)?;
    let person = planner
        .workspace
        .find_employee_mut(admin, employee)
        .ok_or_else(|| PlanError::UnknownEmployee(employee.clone()))?;
    person.availability = windows;
    Ok(())
}

/// Retire l'employé ; ses créneaux restent mais ne sont plus assignés.
pub(super) fn remove_employee(
    planner: &mut Planner,
    admin: &AdminId,
    employee: &EmployeeId,
) -> Result<Employee, PlanError> {
    let pos = planner
        .workspace
        .employees
        .iter()
        .position(|e| &e.id == employee && &e.admin_id == admin)
        .ok_or_else(|| PlanError::UnknownEmployee(employee.clone()))?;
    let removed = planner.workspace.employees.remove(pos);

    let mut released = 0usize;
    for frame in planner
        .workspace
        .frames
        .iter_mut()
        .filter(|f| f.employee_id.as_ref() == Some(employee))
    {
        frame.employee_id = None;
        released += 1;
    }
    tracing::debug!(employee = %employee, released, "employee removed");
    Ok(removed)
}

fn check_windows(windows: &[AvailabilityWindow]) -> Result<(), PlanError> {
    windows
        .iter()
        .try_for_each(|w| AvailabilityWindow::new(w.day, w.start_hour, w.end_hour).map(|_| ()))
}
