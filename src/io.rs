use crate::model::{AdminId, AvailabilityWindow, Day, Frame, Interval, NewEmployee, Workspace};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV: header `firstname,lastname,email[,phone_number][,availability]`
///
/// `availability` : `monday 9-17;tuesday 8-12`.
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NewEmployee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let firstname = rec.get(0).context("missing firstname")?.trim();
        let lastname = rec.get(1).context("missing lastname")?.trim();
        let email = rec.get(2).context("missing email")?.trim();
        if email.is_empty() {
            bail!("invalid employee row (empty email)");
        }
        let phone_number = rec
            .get(3)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let availability = match rec.get(4).map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_availability(raw)
                .with_context(|| format!("invalid availability for {email}"))?,
            _ => Vec::new(),
        };
        out.push(NewEmployee {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email.to_string(),
            phone_number,
            availability,
        });
    }
    Ok(out)
}

/// `monday 9-17;sat 10-14` → plages.
pub fn parse_availability(raw: &str) -> anyhow::Result<Vec<AvailabilityWindow>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(parse_window)
        .collect()
}

fn parse_window(chunk: &str) -> anyhow::Result<AvailabilityWindow> {
    let (day, hours) = chunk
        .split_once(char::is_whitespace)
        .with_context(|| format!("expected '<day> <start>-<end>', got '{chunk}'"))?;
    let day: Day = day.parse()?;
    let (start, end) = hours
        .trim()
        .split_once('-')
        .with_context(|| format!("expected hour range, got '{hours}'"))?;
    let start: u8 = start.trim().parse().context("start hour")?;
    let end: u8 = end.trim().parse().context("end hour")?;
    Ok(AvailabilityWindow::new(day, start, end)?)
}

/// Inverse de [`parse_availability`].
pub fn format_availability(windows: &[AvailabilityWindow]) -> String {
    let mut buf = itoa::Buffer::new();
    let mut out = String::new();
    for (i, w) in windows.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(w.day.as_str());
        out.push(' ');
        out.push_str(buf.format(w.start_hour));
        out.push('-');
        out.push_str(buf.format(w.end_hour));
    }
    out
}

/// Ligne de créneau importée, à faire admettre par le Planner.
#[derive(Debug, Clone)]
pub struct FrameRow {
    pub interval: Interval,
    pub employee_email: Option<String>,
}

/// Import de créneaux: header `start,end[,employee_email]` (RFC3339)
pub fn import_frames_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<FrameRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let start = rec.get(0).context("missing start")?;
        let end = rec.get(1).context("missing end")?;
        let interval =
            Interval::parse(start, end).with_context(|| format!("row {}", line + 1))?;
        let employee_email = rec
            .get(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        out.push(FrameRow {
            interval,
            employee_email,
        });
    }
    Ok(out)
}

/// Export JSON des créneaux (jolie mise en forme)
pub fn export_frames_json<P: AsRef<Path>>(path: P, frames: &[&Frame]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(frames)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des créneaux: header `id,start,end,employee_email`
pub fn export_frames_csv<P: AsRef<Path>>(
    path: P,
    workspace: &Workspace,
    admin: &AdminId,
    frames: &[&Frame],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "start", "end", "employee_email"])?;
    for f in frames {
        let email = f
            .employee_id
            .as_ref()
            .and_then(|id| workspace.find_employee(admin, id))
            .map(|e| e.email.as_str())
            .unwrap_or("");
        let start = f.start.to_rfc3339();
        let end = f.end.to_rfc3339();
        w.write_record([f.id.as_str(), start.as_str(), end.as_str(), email])?;
    }
    w.flush()?;
    Ok(())
}
