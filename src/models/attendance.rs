use std::fmt;
use std::str::FromStr;

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

/// The three attendance outcomes, as stored in the `estado` column and
/// carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Asistio,
    NoAsistio,
    Excusa,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Asistio => "asistio",
            AttendanceStatus::NoAsistio => "no_asistio",
            AttendanceStatus::Excusa => "excusa",
        }
    }
}

#[derive(Debug)]
pub struct InvalidEstado(String);

impl fmt::Display for InvalidEstado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid estado: {}", self.0)
    }
}

impl std::error::Error for InvalidEstado {}

impl FromStr for AttendanceStatus {
    type Err = InvalidEstado;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asistio" => Ok(AttendanceStatus::Asistio),
            "no_asistio" => Ok(AttendanceStatus::NoAsistio),
            "excusa" => Ok(AttendanceStatus::Excusa),
            other => Err(InvalidEstado(other.to_string())),
        }
    }
}

/// One persona's status for one reunion. At most one row per pair,
/// refreshed in place by the sheet upsert.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub reunion_id: i64,
    pub persona_id: i64,
    pub estado: AttendanceStatus,
    pub observaciones: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Attendance row joined with the persona's name parts for display.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceWithPerson {
    #[serde(flatten)]
    pub asistencia: AttendanceRecord,
    pub nombre: String,
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
}

/// One entry of a submitted attendance sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEntry {
    pub persona_id: i64,
    pub estado: AttendanceStatus,
    pub observaciones: Option<String>,
}

/// Attendance summary for a persona across all of a group's meetings.
/// `ausencias` counts meetings with neither an asistio nor an excusa row,
/// so unrecorded meetings count as absences.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttendanceStats {
    pub total_reuniones: i64,
    pub asistencias: i64,
    pub excusas: i64,
    pub ausencias: i64,
}

fn parse_estado_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<AttendanceStatus> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e: InvalidEstado| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_attendance_with_person(row: &rusqlite::Row) -> rusqlite::Result<AttendanceWithPerson> {
    Ok(AttendanceWithPerson {
        asistencia: AttendanceRecord {
            id: row.get(0)?,
            reunion_id: row.get(1)?,
            persona_id: row.get(2)?,
            estado: parse_estado_column(row, 3)?,
            observaciones: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        },
        nombre: row.get(7)?,
        primer_apellido: row.get(8)?,
        segundo_apellido: row.get(9)?,
    })
}

/// All attendance rows for a meeting, joined with persona names.
pub fn find_by_meeting(
    conn: &Connection,
    reunion_id: i64,
) -> rusqlite::Result<Vec<AttendanceWithPerson>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.reunion_id, a.persona_id, a.estado, a.observaciones, \
                a.created_at, a.updated_at, \
                p.nombre, p.primer_apellido, p.segundo_apellido \
         FROM asistencias a \
         JOIN personas p ON a.persona_id = p.id \
         WHERE a.reunion_id = ?1 \
         ORDER BY p.primer_apellido, p.nombre",
    )?;
    let rows = stmt.query_map(params![reunion_id], row_to_attendance_with_person)?;
    rows.collect()
}

/// Write a whole attendance sheet for a meeting in one transaction.
///
/// Each entry upserts on (reunion_id, persona_id): new pairs insert,
/// existing pairs overwrite estado/observaciones and touch updated_at.
/// Any failure (e.g. an entry referencing a nonexistent persona) rolls
/// the whole batch back.
pub fn save_sheet(
    conn: &mut Connection,
    reunion_id: i64,
    entries: &[AttendanceEntry],
) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO asistencias (reunion_id, persona_id, estado, observaciones) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(reunion_id, persona_id) DO UPDATE SET \
                 estado = excluded.estado, \
                 observaciones = excluded.observaciones, \
                 updated_at = CURRENT_TIMESTAMP",
        )?;
        for entry in entries {
            stmt.execute(params![
                reunion_id,
                entry.persona_id,
                entry.estado.as_str(),
                entry.observaciones,
            ])?;
        }
    }
    tx.commit()
}

/// Aggregate attendance for a persona over every meeting of a group.
/// Zero-filled when the group has no meetings.
pub fn stats_for_person_in_group(
    conn: &Connection,
    persona_id: i64,
    grupo_id: i64,
) -> rusqlite::Result<AttendanceStats> {
    let (total_reuniones, asistencias, excusas) = conn.query_row(
        "SELECT COUNT(r.id), \
                COALESCE(SUM(CASE WHEN a.estado = 'asistio' THEN 1 ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN a.estado = 'excusa' THEN 1 ELSE 0 END), 0) \
         FROM reuniones r \
         LEFT JOIN asistencias a ON a.reunion_id = r.id AND a.persona_id = ?1 \
         WHERE r.grupo_id = ?2",
        params![persona_id, grupo_id],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)),
    )?;

    Ok(AttendanceStats {
        total_reuniones,
        asistencias,
        excusas,
        ausencias: total_reuniones - asistencias - excusas,
    })
}
