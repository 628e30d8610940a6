use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

/// An organizational unit with a roster of members and a schedule of meetings.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
}

fn row_to_group(row: &rusqlite::Row) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        nombre: row.get("nombre")?,
        descripcion: row.get("descripcion")?,
    })
}

pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<Group>> {
    let mut stmt = conn.prepare("SELECT id, nombre, descripcion FROM grupos ORDER BY id")?;
    let rows = stmt.query_map([], row_to_group)?;
    rows.collect()
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Group>> {
    conn.query_row(
        "SELECT id, nombre, descripcion FROM grupos WHERE id = ?1",
        params![id],
        row_to_group,
    )
    .optional()
}

pub fn create(conn: &Connection, nombre: &str, descripcion: Option<&str>) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO grupos (nombre, descripcion) VALUES (?1, ?2)",
        params![nombre, descripcion],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns false when no row matched the id.
pub fn update(
    conn: &Connection,
    id: i64,
    nombre: &str,
    descripcion: Option<&str>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE grupos SET nombre = ?1, descripcion = ?2 WHERE id = ?3",
        params![nombre, descripcion, id],
    )?;
    Ok(changed > 0)
}

/// Deletes the group; memberships, meetings, and their attendance rows
/// go with it via ON DELETE CASCADE.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM grupos WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
