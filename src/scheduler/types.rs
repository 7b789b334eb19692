use crate::model::{EmployeeId, FrameId};
use chrono::{FixedOffset, Offset, Utc};
use std::fmt;
use thiserror::Error;

/// Forme du chevauchement entre un candidat et un créneau existant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// Candidat entièrement inclus dans le créneau existant.
    ContainedWithin,
    /// La fin du candidat tombe dans le créneau existant.
    EndOverlaps,
    /// Le début du candidat tombe dans le créneau existant.
    StartOverlaps,
    /// Le candidat recouvre tout le créneau existant.
    Encloses,
}

impl ConflictKind {
    pub fn message(self) -> &'static str {
        match self {
            ConflictKind::ContainedWithin => "This frame is inside an existing frame.",
            ConflictKind::EndOverlaps => "This frame's ending is inside another frame.",
            ConflictKind::StartOverlaps => "This frame's start is inside another frame.",
            ConflictKind::Encloses => "There is a conflict with the selected time frame.",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ConflictKind::ContainedWithin => "contained",
            ConflictKind::EndOverlaps => "end",
            ConflictKind::StartOverlaps => "start",
            ConflictKind::Encloses => "encloses",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Que faire d'un employé sans aucune disponibilité déclarée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Undeclared {
    #[default]
    Reject,
    Allow,
}

/// Comment rapprocher les jours du créneau de ceux des plages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayMatch {
    /// Le jour de début OU le jour de fin doit correspondre à la plage.
    #[default]
    EitherBoundary,
    /// Début et fin le même jour, et ce jour correspond à la plage.
    SameDay,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityPolicy {
    pub undeclared: Undeclared,
    pub day_match: DayMatch,
}

/// Options de planification
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    /// Fuseau dans lequel on lit jour et heure des bornes.
    pub utc_offset: FixedOffset,
    pub availability: AvailabilityPolicy,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            availability: AvailabilityPolicy::default(),
        }
    }
}

impl PlanOptions {
    pub fn with_offset_minutes(mut self, minutes: i32) -> Result<Self, PlanError> {
        self.utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                PlanError::validation("utc_offset", format!("offset out of range: {minutes} min"))
            })?;
        Ok(self)
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("endFrame must be later than startFrame")]
    InvalidInterval,
    #[error("The employee is not available during these times")]
    NotAvailable,
    #[error("{0}")]
    Conflict(ConflictKind),
    #[error("unknown employee: {0}")]
    UnknownEmployee(EmployeeId),
    #[error("unknown frame: {0}")]
    UnknownFrame(FrameId),
    #[error("Field: '{field}' {reason}")]
    Validation { field: &'static str, reason: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlanError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        PlanError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Statut HTTP équivalent pour un appelant web.
    pub fn status(&self) -> u16 {
        match self {
            PlanError::InvalidInterval
            | PlanError::NotAvailable
            | PlanError::Conflict(_)
            | PlanError::Validation { .. } => 422,
            PlanError::UnknownEmployee(_) | PlanError::UnknownFrame(_) => 404,
            PlanError::Other(_) => 500,
        }
    }
}
