use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use super::person::Person;

/// Whether a membership span is open or has been closed with an end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Active,
    Ended(NaiveDate),
}

/// A time-bounded association between a persona and a grupo.
/// "Removal" from a group closes the span instead of deleting the row,
/// so historical attendance keeps its roster context.
#[derive(Debug, Clone, Serialize)]
pub struct Membership {
    pub id: i64,
    pub persona_id: i64,
    pub grupo_id: i64,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

impl Membership {
    pub fn status(&self) -> MembershipStatus {
        match self.fecha_fin {
            Some(fin) => MembershipStatus::Ended(fin),
            None => MembershipStatus::Active,
        }
    }

    /// Active iff the reference date falls within [fecha_inicio, fecha_fin].
    /// A start date in the future means not yet active.
    pub fn is_active_on(&self, reference: NaiveDate) -> bool {
        if reference < self.fecha_inicio {
            return false;
        }
        match self.status() {
            MembershipStatus::Active => true,
            MembershipStatus::Ended(fin) => reference <= fin,
        }
    }
}

/// Membership row joined with its persona, as served by the members API.
/// `activo` is computed against the reference date of the query.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipWithPerson {
    #[serde(flatten)]
    pub miembro: Membership,
    pub activo: bool,
    pub persona: Person,
}

/// End date, when present, must not precede the start date.
pub fn span_is_valid(fecha_inicio: NaiveDate, fecha_fin: Option<NaiveDate>) -> bool {
    match fecha_fin {
        Some(fin) => fin >= fecha_inicio,
        None => true,
    }
}

fn row_to_membership(row: &rusqlite::Row) -> rusqlite::Result<Membership> {
    Ok(Membership {
        id: row.get("id")?,
        persona_id: row.get("persona_id")?,
        grupo_id: row.get("grupo_id")?,
        fecha_inicio: row.get("fecha_inicio")?,
        fecha_fin: row.get("fecha_fin")?,
    })
}

const SELECT_MIEMBRO_PERSONA: &str = "\
    SELECT m.id, m.persona_id, m.grupo_id, m.fecha_inicio, m.fecha_fin, \
           p.id AS p_id, p.nombre, p.primer_apellido, p.segundo_apellido, p.email, \
           p.telefono, p.puesto_trabajo, p.observaciones, p.es_admin, p.activo, \
           p.created_at, p.updated_at, p.password \
    FROM miembros m \
    JOIN personas p ON m.persona_id = p.id";

fn row_to_membership_with_person(
    row: &rusqlite::Row,
    reference: NaiveDate,
) -> rusqlite::Result<MembershipWithPerson> {
    let miembro = row_to_membership(row)?;
    let persona = Person {
        id: row.get("p_id")?,
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
    };
    let activo = miembro.is_active_on(reference);
    Ok(MembershipWithPerson { miembro, activo, persona })
}

/// List memberships joined with persona data, optionally scoped to a group.
/// `reference` is the date the `activo` flag is evaluated against.
pub fn find_with_persons(
    conn: &Connection,
    grupo_id: Option<i64>,
    reference: NaiveDate,
) -> rusqlite::Result<Vec<MembershipWithPerson>> {
    match grupo_id {
        Some(gid) => {
            let sql = format!("{SELECT_MIEMBRO_PERSONA} WHERE m.grupo_id = ?1 ORDER BY m.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![gid], |row| {
                row_to_membership_with_person(row, reference)
            })?;
            rows.collect()
        }
        None => {
            let sql = format!("{SELECT_MIEMBRO_PERSONA} ORDER BY m.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| row_to_membership_with_person(row, reference))?;
            rows.collect()
        }
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Membership>> {
    conn.query_row(
        "SELECT id, persona_id, grupo_id, fecha_inicio, fecha_fin FROM miembros WHERE id = ?1",
        params![id],
        row_to_membership,
    )
    .optional()
}

pub fn find_by_id_with_person(
    conn: &Connection,
    id: i64,
    reference: NaiveDate,
) -> rusqlite::Result<Option<MembershipWithPerson>> {
    let sql = format!("{SELECT_MIEMBRO_PERSONA} WHERE m.id = ?1");
    conn.query_row(&sql, params![id], |row| {
        row_to_membership_with_person(row, reference)
    })
    .optional()
}

pub fn create(
    conn: &Connection,
    persona_id: i64,
    grupo_id: i64,
    fecha_inicio: NaiveDate,
    fecha_fin: Option<NaiveDate>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO miembros (persona_id, grupo_id, fecha_inicio, fecha_fin) \
         VALUES (?1, ?2, ?3, ?4)",
        params![persona_id, grupo_id, fecha_inicio, fecha_fin],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_span(
    conn: &Connection,
    id: i64,
    fecha_inicio: NaiveDate,
    fecha_fin: Option<NaiveDate>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE miembros SET fecha_inicio = ?1, fecha_fin = ?2 WHERE id = ?3",
        params![fecha_inicio, fecha_fin, id],
    )?;
    Ok(changed > 0)
}

/// Soft removal: close the span by setting fecha_fin. The row (and the
/// attendance history behind it) survives.
pub fn end_membership(conn: &Connection, id: i64, fecha_fin: NaiveDate) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE miembros SET fecha_fin = ?1 WHERE id = ?2",
        params![fecha_fin, id],
    )?;
    Ok(changed > 0)
}
