use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};
use serde_json::json;

use crate::auth::token::TokenSigner;

/// The authenticated persona, attached to request extensions by `require_auth`.
#[derive(Debug, Clone, Copy)]
pub struct AuthPersona(pub i64);

/// Middleware function that checks for a valid `Authorization: Bearer <token>`
/// header. Responds 401 with a JSON body otherwise.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let unauthorized = |req: ServiceRequest, msg: &str| {
        let response = HttpResponse::Unauthorized().json(json!({ "error": msg }));
        Ok(req.into_response(response).map_into_right_body())
    };

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let Some(header) = header else {
        return unauthorized(req, "Token no proporcionado");
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        return unauthorized(req, "Cabecera Authorization mal formada");
    };

    let Some(signer) = req.app_data::<web::Data<TokenSigner>>() else {
        return unauthorized(req, "Token inválido");
    };

    match signer.verify(token) {
        Ok(persona_id) => {
            req.extensions_mut().insert(AuthPersona(persona_id));
            next.call(req).await.map(|res| res.map_into_left_body())
        }
        Err(e) => {
            log::debug!("Rejected bearer token: {e}");
            unauthorized(req, "Token inválido o expirado")
        }
    }
}
