use actix_web::web;
use chrono::NaiveDate;

use crate::auth;
use crate::errors::AppError;

pub mod attendance_handlers;
pub mod auth_handlers;
pub mod group_handlers;
pub mod meeting_handlers;
pub mod membership_handlers;
pub mod person_handlers;

/// Parse an ISO date field from a request body, mapping failure to a 400.
pub(crate) fn parse_fecha(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("Fecha inválida en {field}: se espera YYYY-MM-DD"))
    })
}

/// Mount the full API under /api. Login is public; everything else sits
/// behind the bearer-token gate.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/auth/login", web::post().to(auth_handlers::login))
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    // Grupos
                    .route("/grupos", web::get().to(group_handlers::list))
                    .route("/grupos", web::post().to(group_handlers::create))
                    .route("/grupos/{id}", web::get().to(group_handlers::get))
                    .route("/grupos/{id}", web::put().to(group_handlers::update))
                    .route("/grupos/{id}", web::delete().to(group_handlers::delete))
                    // Personas
                    .route("/usuarios", web::get().to(person_handlers::list))
                    .route("/usuarios", web::post().to(person_handlers::create))
                    .route("/usuarios/{id}", web::get().to(person_handlers::get))
                    .route("/usuarios/{id}", web::put().to(person_handlers::update))
                    .route("/usuarios/{id}", web::delete().to(person_handlers::delete))
                    .route(
                        "/usuarios/{id}/grupos/{grupo_id}/estadisticas",
                        web::get().to(person_handlers::stats),
                    )
                    // Miembros
                    .route("/miembros", web::get().to(membership_handlers::list))
                    .route("/miembros", web::post().to(membership_handlers::create))
                    .route("/miembros/{id}", web::get().to(membership_handlers::get))
                    .route("/miembros/{id}", web::put().to(membership_handlers::update))
                    .route("/miembros/{id}", web::delete().to(membership_handlers::remove))
                    // Reuniones
                    .route("/reuniones", web::get().to(meeting_handlers::list))
                    .route("/reuniones", web::post().to(meeting_handlers::create))
                    .route("/reuniones/{id}", web::get().to(meeting_handlers::get))
                    .route("/reuniones/{id}", web::put().to(meeting_handlers::update))
                    .route("/reuniones/{id}", web::delete().to(meeting_handlers::delete))
                    // Asistencias
                    .route(
                        "/reuniones/{id}/asistencias",
                        web::get().to(attendance_handlers::list),
                    )
                    .route(
                        "/reuniones/{id}/asistencias",
                        web::post().to(attendance_handlers::save),
                    ),
            ),
    );
}
