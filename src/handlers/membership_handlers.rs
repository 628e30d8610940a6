use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::parse_fecha;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{group, membership, person};

#[derive(Debug, Deserialize)]
pub struct MiembrosQuery {
    #[serde(rename = "grupoId")]
    pub grupo_id: Option<i64>,
    pub activo: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MiembroPayload {
    pub persona_id: Option<i64>,
    pub grupo_id: Option<i64>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound("Miembro no encontrado".to_string())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse the optional span fields and enforce fin >= inicio.
/// A missing fecha_inicio defaults to today.
fn parse_span(payload: &MiembroPayload) -> Result<(NaiveDate, Option<NaiveDate>), AppError> {
    let fecha_inicio = match payload.fecha_inicio.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => parse_fecha(raw, "fecha_inicio")?,
        None => today(),
    };
    let fecha_fin = match payload.fecha_fin.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_fecha(raw, "fecha_fin")?),
        None => None,
    };
    if !membership::span_is_valid(fecha_inicio, fecha_fin) {
        return Err(AppError::Validation(
            "La fecha de fin no puede ser anterior a la fecha de inicio".to_string(),
        ));
    }
    Ok((fecha_inicio, fecha_fin))
}

/// GET /api/miembros?grupoId=&activo= lists memberships joined with persona
/// data; `activo` filters on activity as of today.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<MiembrosQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let mut miembros = membership::find_with_persons(&conn, query.grupo_id, today())?;
    if let Some(activo) = query.activo {
        miembros.retain(|m| m.activo == activo);
    }
    Ok(HttpResponse::Ok().json(miembros))
}

pub async fn get(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let miembro = membership::find_by_id_with_person(&conn, path.into_inner(), today())?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(miembro))
}

pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<MiembroPayload>,
) -> Result<HttpResponse, AppError> {
    let (persona_id, grupo_id) = match (body.persona_id, body.grupo_id) {
        (Some(p), Some(g)) => (p, g),
        _ => {
            return Err(AppError::Validation(
                "ID de persona y grupo son requeridos".to_string(),
            ));
        }
    };
    let (fecha_inicio, fecha_fin) = parse_span(&body)?;

    let conn = pool.get()?;
    if person::find_by_id(&conn, persona_id)?.is_none() {
        return Err(AppError::Validation("La persona especificada no existe".to_string()));
    }
    if group::find_by_id(&conn, grupo_id)?.is_none() {
        return Err(AppError::Validation("El grupo especificado no existe".to_string()));
    }

    let id = match membership::create(&conn, persona_id, grupo_id, fecha_inicio, fecha_fin) {
        Ok(id) => id,
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AppError::Conflict(
                "Ya existe una membresía con esa fecha de inicio".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let miembro =
        membership::find_by_id_with_person(&conn, id, today())?.ok_or_else(not_found)?;
    Ok(HttpResponse::Created().json(miembro))
}

/// PUT /api/miembros/{id} adjusts the membership span.
pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<MiembroPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let conn = pool.get()?;
    let existing = membership::find_by_id(&conn, id)?.ok_or_else(not_found)?;

    // Absent fields keep their current value; empty-string fecha_fin clears it.
    let fecha_inicio = match body.fecha_inicio.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => parse_fecha(raw, "fecha_inicio")?,
        None => existing.fecha_inicio,
    };
    let fecha_fin = match body.fecha_fin.as_deref() {
        Some("") => None,
        Some(raw) => Some(parse_fecha(raw, "fecha_fin")?),
        None => existing.fecha_fin,
    };
    if !membership::span_is_valid(fecha_inicio, fecha_fin) {
        return Err(AppError::Validation(
            "La fecha de fin no puede ser anterior a la fecha de inicio".to_string(),
        ));
    }

    membership::update_span(&conn, id, fecha_inicio, fecha_fin)?;
    let miembro =
        membership::find_by_id_with_person(&conn, id, today())?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(miembro))
}

/// DELETE /api/miembros/{id} is a soft removal: sets fecha_fin to today so
/// the attendance history behind the membership survives.
pub async fn remove(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;

    membership::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    membership::end_membership(&conn, id, today())?;

    let miembro =
        membership::find_by_id_with_person(&conn, id, today())?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(miembro))
}
