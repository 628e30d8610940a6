use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{password, token};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::person;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login takes email and password, returns `{token, persona}`.
/// Unknown email and wrong password are indistinguishable on the wire.
pub async fn login(
    pool: web::Data<DbPool>,
    signer: web::Data<token::TokenSigner>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let missing = || AppError::Validation("Email y contraseña son requeridos".to_string());
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(missing)?;
    let plain = body
        .password
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(missing)?;

    let invalid = || AppError::Auth("Credenciales inválidas".to_string());

    let conn = pool.get()?;
    let persona = person::find_by_email(&conn, email)?.ok_or_else(invalid)?;
    let hash = persona.password.as_deref().ok_or_else(invalid)?;

    match password::verify_password(plain, hash) {
        Ok(true) => {}
        _ => return Err(invalid()),
    }

    let bearer = signer.issue(persona.id, token::DEFAULT_TTL_SECS);
    Ok(HttpResponse::Ok().json(json!({ "token": bearer, "persona": persona })))
}
