use actix_web::{App, HttpServer, middleware, web};

use grupos::auth::token::TokenSigner;
use grupos::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/grupos.db".to_string());
    if let Some(parent) = std::path::Path::new(&database_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }

    let pool = db::init_pool(&database_path);
    db::run_migrations(&pool);

    // Bootstrap an admin account on an empty database.
    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    db::seed_admin(&pool, &admin_email, &admin_password);

    let signer = TokenSigner::from_env();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    log::info!("Starting server at http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(signer.clone()))
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
