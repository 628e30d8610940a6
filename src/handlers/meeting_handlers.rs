use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::parse_fecha;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance::AttendanceWithPerson;
use crate::models::meeting::Meeting;
use crate::models::{attendance, group, meeting};

#[derive(Debug, Deserialize)]
pub struct ReunionesQuery {
    #[serde(rename = "grupoId")]
    pub grupo_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReunionPayload {
    pub grupo_id: Option<i64>,
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub ubicacion: Option<String>,
    pub descripcion: Option<String>,
}

/// Meeting with its attendance sheet embedded, as the list/detail
/// endpoints serve it.
#[derive(Debug, Serialize)]
pub struct MeetingWithAttendance {
    #[serde(flatten)]
    pub reunion: Meeting,
    pub asistencias: Vec<AttendanceWithPerson>,
}

fn not_found() -> AppError {
    AppError::NotFound("Reunión no encontrada".to_string())
}

/// Check the required fields are present, reporting all missing ones at once.
fn required_fields<'a>(
    body: &'a ReunionPayload,
) -> Result<(&'a str, &'a str, &'a str), AppError> {
    let mut missing = Vec::new();
    if body.grupo_id.is_none() {
        missing.push("grupo_id");
    }
    let fecha = body.fecha.as_deref().map(str::trim).unwrap_or("");
    if fecha.is_empty() {
        missing.push("fecha");
    }
    let hora = body.hora.as_deref().map(str::trim).unwrap_or("");
    if hora.is_empty() {
        missing.push("hora");
    }
    let ubicacion = body.ubicacion.as_deref().map(str::trim).unwrap_or("");
    if ubicacion.is_empty() {
        missing.push("ubicacion");
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Faltan campos requeridos: {}",
            missing.join(", ")
        )));
    }
    Ok((fecha, hora, ubicacion))
}

/// GET /api/reuniones?grupoId= lists newest first, each with its asistencias.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<ReunionesQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let reuniones = meeting::find_all(&conn, query.grupo_id)?;

    let mut out = Vec::with_capacity(reuniones.len());
    for reunion in reuniones {
        let asistencias = attendance::find_by_meeting(&conn, reunion.id)?;
        out.push(MeetingWithAttendance { reunion, asistencias });
    }
    Ok(HttpResponse::Ok().json(out))
}

pub async fn get(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let reunion = meeting::find_by_id(&conn, path.into_inner())?.ok_or_else(not_found)?;
    let asistencias = attendance::find_by_meeting(&conn, reunion.id)?;
    Ok(HttpResponse::Ok().json(MeetingWithAttendance { reunion, asistencias }))
}

pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<ReunionPayload>,
) -> Result<HttpResponse, AppError> {
    let (fecha_raw, hora, ubicacion) = required_fields(&body)?;
    let grupo_id = body.grupo_id.unwrap_or_default();
    let fecha = parse_fecha(fecha_raw, "fecha")?;

    let conn = pool.get()?;
    if group::find_by_id(&conn, grupo_id)?.is_none() {
        return Err(AppError::Validation("El grupo especificado no existe".to_string()));
    }

    let id = meeting::create(&conn, grupo_id, fecha, hora, ubicacion, body.descripcion.as_deref())?;
    let reunion = meeting::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Created().json(reunion))
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<ReunionPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let conn = pool.get()?;
    let existing = meeting::find_by_id(&conn, id)?.ok_or_else(not_found)?;

    let fecha = match body.fecha.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => parse_fecha(raw, "fecha")?,
        None => existing.fecha,
    };
    let hora = body.hora.as_deref().filter(|s| !s.is_empty()).unwrap_or(&existing.hora);
    let ubicacion = body
        .ubicacion
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&existing.ubicacion);
    let descripcion = body.descripcion.as_deref().or(existing.descripcion.as_deref());

    meeting::update(&conn, id, fecha, hora, ubicacion, descripcion)?;
    let reunion = meeting::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(reunion))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    if !meeting::delete(&conn, path.into_inner())? {
        return Err(not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}
