#![forbid(unsafe_code)]
//! Creneaux — planification de créneaux d'employés, locale (sans BD).
//!
//! - Stockage fichier (JSON), import/export CSV.
//! - Disponibilités hebdomadaires par employé.
//! - Détection de chevauchements à la création et à la mise à jour.
//! - Tout en UTC ; jour/heure lus dans un décalage configurable.

pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod validate;

pub use model::{
    parse_instant, AdminId, AvailabilityWindow, DateRange, Day, Employee, EmployeeId, Frame,
    FrameId, FramePatch, Interval, NewEmployee, NewFrame, Workspace,
};
pub use scheduler::{
    find_conflict, is_available, AvailabilityPolicy, ConflictKind, DayMatch, Finding,
    FindingKind, PlanError, PlanOptions, Planner, Undeclared,
};
pub use storage::{JsonStorage, Storage};
