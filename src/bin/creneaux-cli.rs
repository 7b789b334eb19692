#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use creneaux::{
    io,
    model::{
        parse_instant, AdminId, DateRange, EmployeeId, FrameId, FramePatch, Interval,
        NewEmployee, NewFrame,
    },
    scheduler::{
        AvailabilityPolicy, DayMatch, FindingKind, PlanError, PlanOptions, Planner, Undeclared,
    },
    storage::{JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification de créneaux (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du workspace
    #[arg(
        long,
        global = true,
        env = "CRENEAUX_WORKSPACE",
        default_value = "creneaux.json"
    )]
    workspace: String,

    /// Admin propriétaire des employés et créneaux
    #[arg(long, global = true, env = "CRENEAUX_ADMIN", default_value = "default")]
    admin: String,

    /// Décalage UTC (minutes) pour lire jour et heure des créneaux
    #[arg(
        long,
        global = true,
        env = "CRENEAUX_UTC_OFFSET_MINUTES",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    utc_offset_minutes: i32,

    /// Accepte les employés sans disponibilité déclarée
    #[arg(long, global = true, env = "CRENEAUX_ALLOW_UNDECLARED")]
    allow_undeclared: bool,

    /// Exige que début et fin tombent le même jour que la plage
    #[arg(long, global = true, env = "CRENEAUX_SAME_DAY")]
    same_day: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un employé
    AddEmployee {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// "monday 9-17;tuesday 8-12"
        #[arg(long)]
        availability: Option<String>,
    },

    /// Remplacer les disponibilités d'un employé (id ou email)
    SetAvailability {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        availability: String,
    },

    /// Retirer un employé ; ses créneaux sont désassignés
    RemoveEmployee {
        #[arg(long)]
        employee: String,
    },

    /// Lister les employés
    Employees,

    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Importer des créneaux depuis un CSV
    ImportFrames {
        #[arg(long)]
        csv: String,
    },

    /// Créer un créneau
    CreateFrame {
        /// RFC3339
        #[arg(long)]
        start: String,
        /// RFC3339
        #[arg(long)]
        end: String,
        #[arg(long)]
        employee: Option<String>,
    },

    /// Modifier un créneau
    UpdateFrame {
        #[arg(long)]
        id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, conflicts_with = "unassign")]
        employee: Option<String>,
        #[arg(long)]
        unassign: bool,
    },

    /// Supprimer un créneau
    DeleteFrame {
        #[arg(long)]
        id: String,
    },

    /// Afficher un créneau
    ShowFrame {
        #[arg(long)]
        id: String,
    },

    /// Lister et optionnellement exporter
    List {
        /// Début minimal (RFC3339, inclus)
        #[arg(long)]
        from: Option<String>,
        /// Début maximal (RFC3339, inclus)
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier chevauchements et disponibilités
    Check {
        /// Export CSV des anomalies (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<PlanError>() {
                Some(plan) => eprintln!("error ({}): {plan}", plan.status()),
                None => eprintln!("error: {err:#}"),
            }
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let opts = PlanOptions {
        availability: AvailabilityPolicy {
            undeclared: if cli.allow_undeclared {
                Undeclared::Allow
            } else {
                Undeclared::Reject
            },
            day_match: if cli.same_day {
                DayMatch::SameDay
            } else {
                DayMatch::EitherBoundary
            },
        },
        ..PlanOptions::default()
    }
    .with_offset_minutes(cli.utc_offset_minutes)?;

    let admin = AdminId::new(&cli.admin);
    let storage = JsonStorage::open(&cli.workspace)?;
    let mut planner = Planner::with_workspace(storage.load_or_default()?, opts);

    let code = match cli.cmd {
        Commands::AddEmployee {
            firstname,
            lastname,
            email,
            phone,
            availability,
        } => {
            let availability = match availability {
                Some(raw) => io::parse_availability(&raw)?,
                None => Vec::new(),
            };
            let id = planner.add_employee(
                &admin,
                NewEmployee {
                    firstname,
                    lastname,
                    email,
                    phone_number: phone,
                    availability,
                },
            )?;
            storage.save(planner.workspace())?;
            println!("{id}");
            0
        }
        Commands::SetAvailability {
            employee,
            availability,
        } => {
            let id = resolve_employee(&planner, &admin, &employee)?;
            planner.set_availability(&admin, &id, io::parse_availability(&availability)?)?;
            storage.save(planner.workspace())?;
            0
        }
        Commands::RemoveEmployee { employee } => {
            let id = resolve_employee(&planner, &admin, &employee)?;
            planner.remove_employee(&admin, &id)?;
            storage.save(planner.workspace())?;
            0
        }
        Commands::Employees => {
            for e in planner.employees(&admin) {
                println!(
                    "{} | {} {} | {} | {}",
                    e.id,
                    e.firstname,
                    e.lastname,
                    e.email,
                    io::format_availability(&e.availability)
                );
            }
            0
        }
        Commands::ImportEmployees { csv } => {
            let rows = io::import_employees_csv(csv)?;
            let total = rows.len();
            for row in rows {
                planner.add_employee(&admin, row)?;
            }
            storage.save(planner.workspace())?;
            println!("imported {total} employee(s)");
            0
        }
        Commands::ImportFrames { csv } => {
            let rows = io::import_frames_csv(csv)?;
            let mut rejected = 0usize;
            for (line, row) in rows.into_iter().enumerate() {
                let outcome = row
                    .employee_email
                    .as_deref()
                    .map(|email| resolve_employee(&planner, &admin, email))
                    .transpose()
                    .and_then(|employee_id| {
                        planner.create_frame(
                            &admin,
                            NewFrame {
                                employee_id,
                                interval: row.interval,
                            },
                        )
                    });
                if let Err(err) = outcome {
                    eprintln!("row {}: {err}", line + 1);
                    rejected += 1;
                }
            }
            storage.save(planner.workspace())?;
            if rejected == 0 {
                0
            } else {
                eprintln!("{rejected} frame(s) rejected");
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::CreateFrame {
            start,
            end,
            employee,
        } => {
            let interval = Interval::parse(&start, &end)?;
            let employee_id = employee
                .map(|e| resolve_employee(&planner, &admin, &e))
                .transpose()?;
            let id = planner.create_frame(
                &admin,
                NewFrame {
                    employee_id,
                    interval,
                },
            )?;
            storage.save(planner.workspace())?;
            println!("{id}");
            0
        }
        Commands::UpdateFrame {
            id,
            start,
            end,
            employee,
            unassign,
        } => {
            let employee = if unassign {
                Some(None)
            } else {
                employee
                    .map(|e| resolve_employee(&planner, &admin, &e).map(Some))
                    .transpose()?
            };
            let patch = FramePatch {
                start: start
                    .as_deref()
                    .map(|raw| parse_instant("startFrame", raw))
                    .transpose()?,
                end: end
                    .as_deref()
                    .map(|raw| parse_instant("endFrame", raw))
                    .transpose()?,
                employee,
            };
            if patch.is_empty() {
                bail!("nothing to update: pass --start, --end, --employee or --unassign");
            }
            let frame = planner.update_frame(&admin, &FrameId::new(id), patch)?;
            storage.save(planner.workspace())?;
            println!("{} | {}", frame.id, frame.display_range(opts.utc_offset));
            0
        }
        Commands::DeleteFrame { id } => {
            if planner.delete_frame(&admin, &FrameId::new(&id)).is_some() {
                storage.save(planner.workspace())?;
            } else {
                eprintln!("frame {id} not found, nothing to delete");
            }
            0
        }
        Commands::ShowFrame { id } => {
            let frame = planner.frame(&admin, &FrameId::new(id))?;
            println!("{}", serde_json::to_string_pretty(frame)?);
            0
        }
        Commands::List {
            from,
            to,
            employee,
            out_json,
            out_csv,
        } => {
            let range = if from.is_some() || to.is_some() {
                Some(DateRange {
                    from: from
                        .as_deref()
                        .map(|raw| parse_instant("from", raw))
                        .transpose()?
                        .unwrap_or(DateTime::<Utc>::MIN_UTC),
                    to: to
                        .as_deref()
                        .map(|raw| parse_instant("to", raw))
                        .transpose()?
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                })
            } else {
                None
            };
            let employee_id = employee
                .map(|e| resolve_employee(&planner, &admin, &e))
                .transpose()?;
            let frames: Vec<_> = planner
                .frames(&admin, range)
                .into_iter()
                .filter(|f| employee_id.is_none() || f.employee_id == employee_id)
                .collect();

            if let Some(path) = out_json {
                io::export_frames_json(path, &frames)?;
            }
            if let Some(path) = out_csv {
                io::export_frames_csv(path, planner.workspace(), &admin, &frames)?;
            }
            // impression compacte
            for f in &frames {
                let assigned = f
                    .employee_id
                    .as_ref()
                    .and_then(|id| planner.workspace().find_employee(&admin, id))
                    .map(|e| e.email.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} | {}",
                    f.id,
                    f.display_range(opts.utc_offset),
                    assigned
                );
            }
            0
        }
        Commands::Check { report } => {
            let findings = planner.audit(&admin);
            if findings.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} issue(s)", findings.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["employee_id", "frame_a", "frame_b", "kind"])?;
                    for f in &findings {
                        let kind = match &f.kind {
                            FindingKind::Overlap(k) => k.code(),
                            FindingKind::OutsideAvailability => "availability",
                            FindingKind::UnknownEmployee => "unknown-employee",
                        };
                        w.write_record([
                            f.employee.as_str(),
                            f.frame_a.as_str(),
                            f.frame_b.as_ref().map_or("", |id| id.as_str()),
                            kind,
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    Ok(code)
}

/// Employé par id, sinon par email.
fn resolve_employee(
    planner: &Planner,
    admin: &AdminId,
    key: &str,
) -> Result<EmployeeId, PlanError> {
    let ws = planner.workspace();
    let id = EmployeeId::new(key);
    if ws.find_employee(admin, &id).is_some() {
        return Ok(id);
    }
    ws.find_employee_by_email(admin, key)
        .map(|e| e.id.clone())
        .ok_or(PlanError::UnknownEmployee(id))
}
