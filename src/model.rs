use chrono::{DateTime, FixedOffset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::scheduler::PlanError;

macro_rules! strong_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

strong_id!(
    /// Identifiant de l'admin propriétaire (sujet du jeton côté HTTP)
    AdminId
);
strong_id!(
    /// Identifiant fort pour Employee
    EmployeeId
);
strong_id!(
    /// Identifiant fort pour Frame
    FrameId
);

/// Intervalle UTC, toujours `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PlanError> {
        if end <= start {
            return Err(PlanError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    /// Parse deux bornes RFC3339.
    pub fn parse(start: &str, end: &str) -> Result<Self, PlanError> {
        let start = parse_instant("startFrame", start)?;
        let end = parse_instant("endFrame", end)?;
        Self::new(start, end)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Instant RFC3339 quelconque, ramené en UTC. `field` nomme la saisie fautive.
pub fn parse_instant(field: &'static str, raw: &str) -> Result<DateTime<Utc>, PlanError> {
    raw.trim()
        .parse::<DateTime<FixedOffset>>()
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PlanError::validation(field, format!("'{raw}' is not an RFC3339 datetime")))
}

/// Jour de la semaine tel qu'écrit dans les disponibilités (`"monday"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Sunday => "sunday",
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
        }
    }
}

impl From<Weekday> for Day {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Sun => Day::Sunday,
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
        }
    }
}

impl FromStr for Day {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Day::Sunday),
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            "saturday" | "sat" => Ok(Day::Saturday),
            other => Err(PlanError::validation("day", format!("unknown weekday '{other}'"))),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plage horaire déclarée pour un jour de la semaine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub day: Day,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl AvailabilityWindow {
    pub fn new(day: Day, start_hour: u8, end_hour: u8) -> Result<Self, PlanError> {
        if end_hour > 24 {
            return Err(PlanError::validation("availability", "end hour must be at most 24"));
        }
        if start_hour > end_hour {
            return Err(PlanError::validation(
                "availability",
                "start hour must not be after end hour",
            ));
        }
        Ok(Self {
            day,
            start_hour,
            end_hour,
        })
    }
}

/// Employé d'un admin, avec ses disponibilités hebdomadaires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub admin_id: AdminId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability: Vec<AvailabilityWindow>,
}

/// Saisie d'un nouvel employé, validée avant insertion.
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub availability: Vec<AvailabilityWindow>,
}

/// Créneau (UTC) appartenant à un admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub admin_id: AdminId,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Frame {
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    /// Rendu `jj-mm-aaaa hh:mm` dans le fuseau donné.
    pub fn display_range(&self, offset: FixedOffset) -> String {
        const FMT: &str = "%d-%m-%Y %H:%M";
        format!(
            "{} → {}",
            self.start.with_timezone(&offset).format(FMT),
            self.end.with_timezone(&offset).format(FMT)
        )
    }
}

/// Demande de création d'un créneau.
#[derive(Debug, Clone)]
pub struct NewFrame {
    pub employee_id: Option<EmployeeId>,
    pub interval: Interval,
}

/// Champs modifiables d'un créneau ; `None` = inchangé.
///
/// `employee: Some(None)` désassigne le créneau.
#[derive(Debug, Clone, Default)]
pub struct FramePatch {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub employee: Option<Option<EmployeeId>>,
}

impl FramePatch {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.employee.is_none()
    }
}

/// Filtre inclusif sur le début des créneaux.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

/// Document persisté : employés + créneaux de tous les admins
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Workspace {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Workspace {
    pub fn find_employee<'a>(&'a self, admin: &AdminId, id: &EmployeeId) -> Option<&'a Employee> {
        self.employees
            .iter()
            .find(|e| &e.id == id && &e.admin_id == admin)
    }
    pub fn find_employee_mut(&mut self, admin: &AdminId, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees
            .iter_mut()
            .find(|e| &e.id == id && &e.admin_id == admin)
    }
    pub fn find_employee_by_email<'a>(
        &'a self,
        admin: &AdminId,
        email: &str,
    ) -> Option<&'a Employee> {
        self.employees
            .iter()
            .find(|e| &e.admin_id == admin && e.email.eq_ignore_ascii_case(email))
    }
    pub fn find_frame<'a>(&'a self, admin: &AdminId, id: &FrameId) -> Option<&'a Frame> {
        self.frames
            .iter()
            .find(|f| &f.id == id && &f.admin_id == admin)
    }
}
