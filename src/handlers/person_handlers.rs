use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::auth::password;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::person::{self, PersonPayload};
use crate::models::{attendance, group};

fn not_found() -> AppError {
    AppError::NotFound("Usuario no encontrado".to_string())
}

/// Extract the three required fields or fail with the combined 400 message.
fn required_fields(body: &PersonPayload) -> Result<(&str, &str, &str), AppError> {
    let nombre = body.nombre.as_deref().map(str::trim).unwrap_or("");
    let primer_apellido = body.primer_apellido.as_deref().map(str::trim).unwrap_or("");
    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    if nombre.is_empty() || primer_apellido.is_empty() || email.is_empty() {
        return Err(AppError::Validation(
            "Nombre, primer apellido y email son campos requeridos".to_string(),
        ));
    }
    Ok((nombre, primer_apellido, email))
}

fn hash_if_present(body: &PersonPayload) -> Result<Option<String>, AppError> {
    match body.password.as_deref().filter(|p| !p.is_empty()) {
        Some(plain) => password::hash_password(plain).map(Some).map_err(AppError::Hash),
        None => Ok(None),
    }
}

pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let personas = person::find_all(&conn)?;
    Ok(HttpResponse::Ok().json(personas))
}

pub async fn get(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let persona = person::find_by_id(&conn, path.into_inner())?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(persona))
}

pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<PersonPayload>,
) -> Result<HttpResponse, AppError> {
    let (nombre, primer_apellido, email) = required_fields(&body)?;
    let hash = hash_if_present(&body)?;

    let conn = pool.get()?;
    if person::find_by_email(&conn, email)?.is_some() {
        return Err(AppError::Conflict("El email ya está registrado".to_string()));
    }

    let id = person::create(
        &conn,
        nombre,
        primer_apellido,
        body.segundo_apellido.as_deref(),
        email,
        body.telefono.as_deref(),
        body.puesto_trabajo.as_deref(),
        body.observaciones.as_deref(),
        hash.as_deref(),
        body.es_admin.unwrap_or(false),
        body.activo.unwrap_or(true),
    )?;
    let persona = person::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Created().json(persona))
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<PersonPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (nombre, primer_apellido, email) = required_fields(&body)?;
    let hash = hash_if_present(&body)?;

    let conn = pool.get()?;
    let existing = person::find_by_id(&conn, id)?.ok_or_else(not_found)?;

    if let Some(other) = person::find_by_email(&conn, email)? {
        if other.id != id {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }
    }

    person::update(
        &conn,
        id,
        nombre,
        primer_apellido,
        body.segundo_apellido.as_deref(),
        email,
        body.telefono.as_deref(),
        body.puesto_trabajo.as_deref(),
        body.observaciones.as_deref(),
        hash.as_deref(),
        body.es_admin.unwrap_or(existing.es_admin),
        body.activo.unwrap_or(existing.activo),
    )?;
    let persona = person::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(persona))
}

/// DELETE /api/usuarios/{id}. Administrators cannot be deleted.
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;

    let persona = person::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    if persona.es_admin {
        return Err(AppError::Forbidden(
            "No se puede eliminar un administrador".to_string(),
        ));
    }

    person::delete(&conn, id)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Usuario eliminado correctamente" })))
}

/// GET /api/usuarios/{id}/grupos/{grupo_id}/estadisticas: attendance
/// summary for one persona across a group's meetings.
pub async fn stats(
    pool: web::Data<DbPool>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (persona_id, grupo_id) = path.into_inner();
    let conn = pool.get()?;

    person::find_by_id(&conn, persona_id)?.ok_or_else(not_found)?;
    group::find_by_id(&conn, grupo_id)?
        .ok_or_else(|| AppError::NotFound("Grupo no encontrado".to_string()))?;

    let resumen = attendance::stats_for_person_in_group(&conn, persona_id, grupo_id)?;
    Ok(HttpResponse::Ok().json(resumen))
}
