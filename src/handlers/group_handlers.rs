use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::group;

#[derive(Debug, Deserialize)]
pub struct GroupPayload {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
}

impl GroupPayload {
    fn nombre(&self) -> Result<&str, AppError> {
        self.nombre
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("El nombre es requerido".to_string()))
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Grupo no encontrado".to_string())
}

pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let grupos = group::find_all(&conn)?;
    Ok(HttpResponse::Ok().json(grupos))
}

pub async fn get(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let grupo = group::find_by_id(&conn, path.into_inner())?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(grupo))
}

pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<GroupPayload>,
) -> Result<HttpResponse, AppError> {
    let nombre = body.nombre()?;

    let conn = pool.get()?;
    let id = group::create(&conn, nombre, body.descripcion.as_deref())?;
    let grupo = group::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Created().json(grupo))
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<GroupPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let nombre = body.nombre()?;

    let conn = pool.get()?;
    if !group::update(&conn, id, nombre, body.descripcion.as_deref())? {
        return Err(not_found());
    }
    let grupo = group::find_by_id(&conn, id)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(grupo))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    if !group::delete(&conn, path.into_inner())? {
        return Err(not_found());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Grupo eliminado correctamente" })))
}
