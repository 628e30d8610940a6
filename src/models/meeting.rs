use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

/// A scheduled event belonging to a group, target of attendance tracking.
#[derive(Debug, Clone, Serialize)]
pub struct Meeting {
    pub id: i64,
    pub grupo_id: i64,
    pub fecha: NaiveDate,
    pub hora: String,
    pub ubicacion: String,
    pub descripcion: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

const SELECT_REUNION: &str = "\
    SELECT id, grupo_id, fecha, hora, ubicacion, descripcion, created_at, updated_at \
    FROM reuniones";

fn row_to_meeting(row: &rusqlite::Row) -> rusqlite::Result<Meeting> {
    Ok(Meeting {
        id: row.get("id")?,
        grupo_id: row.get("grupo_id")?,
        fecha: row.get("fecha")?,
        hora: row.get("hora")?,
        ubicacion: row.get("ubicacion")?,
        descripcion: row.get("descripcion")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// List meetings newest first, optionally scoped to a group.
pub fn find_all(conn: &Connection, grupo_id: Option<i64>) -> rusqlite::Result<Vec<Meeting>> {
    match grupo_id {
        Some(gid) => {
            let sql = format!("{SELECT_REUNION} WHERE grupo_id = ?1 ORDER BY fecha DESC, hora DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![gid], row_to_meeting)?;
            rows.collect()
        }
        None => {
            let sql = format!("{SELECT_REUNION} ORDER BY fecha DESC, hora DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_meeting)?;
            rows.collect()
        }
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Meeting>> {
    conn.query_row(&format!("{SELECT_REUNION} WHERE id = ?1"), params![id], row_to_meeting)
        .optional()
}

pub fn create(
    conn: &Connection,
    grupo_id: i64,
    fecha: NaiveDate,
    hora: &str,
    ubicacion: &str,
    descripcion: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO reuniones (grupo_id, fecha, hora, ubicacion, descripcion) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![grupo_id, fecha, hora, ubicacion, descripcion],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(
    conn: &Connection,
    id: i64,
    fecha: NaiveDate,
    hora: &str,
    ubicacion: &str,
    descripcion: Option<&str>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE reuniones SET fecha = ?1, hora = ?2, ubicacion = ?3, descripcion = ?4, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?5",
        params![fecha, hora, ubicacion, descripcion, id],
    )?;
    Ok(changed > 0)
}

/// Deletes the meeting; its attendance rows cascade.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM reuniones WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
