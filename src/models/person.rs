use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

/// A person on the roster. The password hash never leaves the server:
/// it is skipped on serialization.
#[derive(Debug, Clone, Serialize)]
pub struct Person {
    pub id: i64,
    pub nombre: String,
    pub primer_apellido: String,
    pub segundo_apellido: Option<String>,
    pub email: String,
    pub telefono: Option<String>,
    pub puesto_trabajo: Option<String>,
    pub observaciones: Option<String>,
    pub es_admin: bool,
    pub activo: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Person {
    /// Display name used on attendance sheets: "Nombre PrimerApellido".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nombre, self.primer_apellido)
    }
}

/// Create/update request body. `password`, when present, is hashed by the
/// handler before it reaches the store.
#[derive(Debug, Deserialize)]
pub struct PersonPayload {
    pub nombre: Option<String>,
    pub primer_apellido: Option<String>,
    pub segundo_apellido: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub puesto_trabajo: Option<String>,
    pub observaciones: Option<String>,
    pub password: Option<String>,
    pub es_admin: Option<bool>,
    pub activo: Option<bool>,
}

const SELECT_PERSONA: &str = "\
    SELECT id, nombre, primer_apellido, segundo_apellido, email, telefono, \
           puesto_trabajo, observaciones, es_admin, activo, \
           created_at, updated_at, password \
    FROM personas";

fn row_to_person(row: &rusqlite::Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get("id")?,
        nombre: row.get("nombre")?,
        primer_apellido: row.get("primer_apellido")?,
        segundo_apellido: row.get("segundo_apellido")?,
        email: row.get("email")?,
        telefono: row.get("telefono")?,
        puesto_trabajo: row.get("puesto_trabajo")?,
        observaciones: row.get("observaciones")?,
        es_admin: row.get("es_admin")?,
        activo: row.get("activo")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        password: row.get("password")?,
    })
}

pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<Person>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PERSONA} ORDER BY id"))?;
    let rows = stmt.query_map([], row_to_person)?;
    rows.collect()
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Person>> {
    conn.query_row(&format!("{SELECT_PERSONA} WHERE id = ?1"), params![id], row_to_person)
        .optional()
}

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<Person>> {
    conn.query_row(
        &format!("{SELECT_PERSONA} WHERE email = ?1"),
        params![email],
        row_to_person,
    )
    .optional()
}

#[allow(clippy::too_many_arguments)]
pub fn create(
    conn: &Connection,
    nombre: &str,
    primer_apellido: &str,
    segundo_apellido: Option<&str>,
    email: &str,
    telefono: Option<&str>,
    puesto_trabajo: Option<&str>,
    observaciones: Option<&str>,
    password_hash: Option<&str>,
    es_admin: bool,
    activo: bool,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO personas \
         (nombre, primer_apellido, segundo_apellido, email, telefono, \
          puesto_trabajo, observaciones, password, es_admin, activo) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            nombre,
            primer_apellido,
            segundo_apellido,
            email,
            telefono,
            puesto_trabajo,
            observaciones,
            password_hash,
            es_admin,
            activo
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Full profile update. The stored password is only replaced when a new
/// hash is passed (COALESCE keeps the old one on None).
#[allow(clippy::too_many_arguments)]
pub fn update(
    conn: &Connection,
    id: i64,
    nombre: &str,
    primer_apellido: &str,
    segundo_apellido: Option<&str>,
    email: &str,
    telefono: Option<&str>,
    puesto_trabajo: Option<&str>,
    observaciones: Option<&str>,
    password_hash: Option<&str>,
    es_admin: bool,
    activo: bool,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE personas SET \
            nombre = ?1, primer_apellido = ?2, segundo_apellido = ?3, email = ?4, \
            telefono = ?5, puesto_trabajo = ?6, observaciones = ?7, \
            password = COALESCE(?8, password), es_admin = ?9, activo = ?10, \
            updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?11",
        params![
            nombre,
            primer_apellido,
            segundo_apellido,
            email,
            telefono,
            puesto_trabajo,
            observaciones,
            password_hash,
            es_admin,
            activo,
            id
        ],
    )?;
    Ok(changed > 0)
}

/// Hard delete; memberships and attendance rows cascade. The admin guard
/// lives at the handler boundary.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM personas WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
