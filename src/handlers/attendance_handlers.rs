use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance::{self, AttendanceEntry};
use crate::models::meeting;

#[derive(Debug, Deserialize)]
pub struct SheetPayload {
    pub asistencias: Option<Vec<AttendanceEntry>>,
}

fn meeting_not_found() -> AppError {
    AppError::NotFound("Reunión no encontrada".to_string())
}

/// GET /api/reuniones/{id}/asistencias
pub async fn list(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let reunion_id = path.into_inner();
    let conn = pool.get()?;

    meeting::find_by_id(&conn, reunion_id)?.ok_or_else(meeting_not_found)?;
    let asistencias = attendance::find_by_meeting(&conn, reunion_id)?;
    Ok(HttpResponse::Ok().json(asistencias))
}

/// POST /api/reuniones/{id}/asistencias bulk-upserts the whole sheet.
/// All-or-nothing: a failing entry aborts the batch and leaves prior
/// state untouched. Responds with the refreshed sheet.
pub async fn save(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<SheetPayload>,
) -> Result<HttpResponse, AppError> {
    let reunion_id = path.into_inner();
    let entries = body
        .into_inner()
        .asistencias
        .ok_or_else(|| {
            AppError::Validation("Se esperaba un arreglo de asistencias".to_string())
        })?;

    let mut conn = pool.get()?;
    meeting::find_by_id(&conn, reunion_id)?.ok_or_else(meeting_not_found)?;

    match attendance::save_sheet(&mut conn, reunion_id, &entries) {
        Ok(()) => {}
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AppError::Conflict(
                "No se pudieron guardar las asistencias".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    let asistencias = attendance::find_by_meeting(&conn, reunion_id)?;
    Ok(HttpResponse::Ok().json(asistencias))
}
