//! Règles de champs déclaratives, appliquées à la frontière avant le Planner.

use crate::scheduler::PlanError;

/// Contrainte sur un champ texte.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub trimmed: bool,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl FieldRule {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            trimmed: false,
            min: Some(1),
            max: None,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            trimmed: false,
            min: None,
            max: None,
        }
    }

    pub const fn trimmed(mut self) -> Self {
        self.trimmed = true;
        self
    }

    pub const fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn check(&self, value: Option<&str>) -> Result<(), PlanError> {
        let Some(value) = value else {
            if self.required {
                return Err(PlanError::validation(self.name, "is missing"));
            }
            return Ok(());
        };
        if self.trimmed && value.trim() != value {
            return Err(PlanError::validation(
                self.name,
                "cannot start or end with a whitespace!",
            ));
        }
        let len = value.trim().chars().count();
        if let Some(min) = self.min {
            if len < min {
                return Err(PlanError::validation(
                    self.name,
                    format!("must be at least {min} characters long"),
                ));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(PlanError::validation(
                    self.name,
                    format!("must be at most {max} characters long"),
                ));
            }
        }
        Ok(())
    }
}

/// Applique chaque règle à la valeur correspondante, première erreur gagnante.
pub fn check_all(fields: &[(FieldRule, Option<&str>)]) -> Result<(), PlanError> {
    fields.iter().try_for_each(|(rule, value)| rule.check(*value))
}

pub const FIRSTNAME: FieldRule = FieldRule::required("firstname").max(100);
pub const LASTNAME: FieldRule = FieldRule::required("lastname").max(100);
pub const EMAIL: FieldRule = FieldRule::required("email").trimmed().max(254);
pub const PHONE_NUMBER: FieldRule = FieldRule::optional("phoneNumber").trimmed().max(32);
