use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::time_slot::{format_hhmm, parse_hhmm};
use crate::models::{
    Appointment, AppointmentStatus, BusinessHours, ClientInfo, Service, ServiceCategory,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Services ──

const SERVICE_COLUMNS: &str =
    "id, category, name, description, price_min, price_max, duration_minutes";

pub fn get_service(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1"),
        params![id],
        |row| Ok(parse_service_row(row)),
    );

    match result {
        Ok(service) => Ok(Some(service?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services ORDER BY category ASC, name ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let id: String = row.get(0)?;
    let category_str: String = row.get(1)?;
    let category = ServiceCategory::parse(&category_str)
        .with_context(|| format!("service {id} has unknown category {category_str}"))?;

    let service = Service {
        category,
        name: row.get(2)?,
        description: row.get(3)?,
        price_min: row.get(4)?,
        price_max: row.get(5)?,
        duration: row.get(6)?,
        id,
    };
    service.validate()?;
    Ok(service)
}

// ── Business Hours ──

pub fn get_business_hours(conn: &Connection) -> anyhow::Result<Vec<BusinessHours>> {
    let mut stmt = conn.prepare(
        "SELECT day_of_week, open_time, close_time, is_closed FROM business_hours ORDER BY day_of_week ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let day_of_week: u8 = row.get(0)?;
        let open_str: String = row.get(1)?;
        let close_str: String = row.get(2)?;
        let is_closed: bool = row.get::<_, i32>(3)? != 0;
        Ok((day_of_week, open_str, close_str, is_closed))
    })?;

    let mut hours = vec![];
    for row in rows {
        let (day_of_week, open_str, close_str, is_closed) = row?;
        let open_time = parse_hhmm(&open_str)
            .with_context(|| format!("invalid open time for day {day_of_week}: {open_str}"))?;
        let close_time = parse_hhmm(&close_str)
            .with_context(|| format!("invalid close time for day {day_of_week}: {close_str}"))?;
        hours.push(BusinessHours {
            day_of_week,
            open_time,
            close_time,
            is_closed,
        });
    }
    Ok(hours)
}

// ── Appointments ──

const APPOINTMENT_COLUMNS: &str = "id, service_id, date, time, first_name, last_name, email, phone, notes, status, created_at, updated_at";

// The slot index turns a double booking into a UNIQUE violation.
pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO appointments ({APPOINTMENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            appt.id,
            appt.service_id,
            appt.date.format(DATE_FORMAT).to_string(),
            format_hhmm(&appt.time),
            appt.client_info.first_name,
            appt.client_info.last_name,
            appt.client_info.email,
            appt.client_info.phone,
            appt.client_info.notes,
            appt.status.as_str(),
            appt.created_at.format(TIMESTAMP_FORMAT).to_string(),
            appt.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_appointments_for_date(
    conn: &Connection,
    date: &NaiveDate,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE date = ?1 AND status != 'cancelled' ORDER BY time ASC"
    ))?;

    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
        Ok(parse_appointment_row(row))
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn get_all_appointments_for_date(
    conn: &Connection,
    date: &NaiveDate,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE date = ?1 ORDER BY time ASC, created_at ASC"
    ))?;

    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
        Ok(parse_appointment_row(row))
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn get_appointment_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appt) => Ok(Some(appt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// Compare-and-set: only moves the row if it is still in `from`.
pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    from: &AppointmentStatus,
    to: &AppointmentStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        params![to.as_str(), now, id, from.as_str()],
    )?;
    Ok(count > 0)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let id: String = row.get(0)?;
    let service_id: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    let time_str: String = row.get(3)?;
    let status_str: String = row.get(9)?;
    let created_at_str: String = row.get(10)?;
    let updated_at_str: String = row.get(11)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .with_context(|| format!("appointment {id} has invalid date {date_str}"))?;
    let time = parse_hhmm(&time_str)
        .with_context(|| format!("appointment {id} has invalid time {time_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Appointment {
        id,
        service_id,
        date,
        time,
        client_info: ClientInfo {
            first_name: row.get(4)?,
            last_name: row.get(5)?,
            email: row.get(6)?,
            phone: row.get(7)?,
            notes: row.get(8)?,
        },
        status: AppointmentStatus::parse(&status_str),
        created_at,
        updated_at,
    })
}
