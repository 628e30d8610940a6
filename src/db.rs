use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::auth::password;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_path: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed an administrator account when the personas table is empty.
///
/// Idempotent: a non-empty table means the database was already
/// bootstrapped (or is a restored production copy), so nothing is written.
pub fn seed_admin(pool: &DbPool, email: &str, plain_password: &str) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM personas", [], |row| row.get(0))
        .unwrap_or(0);
    if count > 0 {
        log::info!("Personas table already has {count} rows, skipping admin seed");
        return;
    }

    let hash = password::hash_password(plain_password).expect("Failed to hash admin password");
    conn.execute(
        "INSERT INTO personas (nombre, primer_apellido, email, password, es_admin, puesto_trabajo) \
         VALUES ('Admin', 'User', ?1, ?2, 1, 'Administrador')",
        params![email, hash],
    )
    .expect("Failed to seed admin user");
    log::info!("Seeded admin user {email}");
}
