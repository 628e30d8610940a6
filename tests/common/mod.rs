//! Shared test infrastructure.
//!
//! Model-layer tests run against a temporary SQLite database with the real
//! schema applied; HTTP tests additionally get a pooled handle and a token
//! signer with a fixed secret.

#![allow(dead_code)]

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;

use grupos::auth::token::TokenSigner;
use grupos::db::{self, DbPool, MIGRATIONS};
use grupos::models::{group, meeting, membership, person};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASS: &str = "admin123";

/// Temporary database with schema and pragmas applied. The TempDir must be
/// kept alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");
    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS).expect("Failed to run migrations");
    (dir, conn)
}

/// Pooled variant for handler-level tests.
pub fn setup_test_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let pool = db::init_pool(db_path.to_str().expect("utf8 path"));
    db::run_migrations(&pool);
    (dir, pool)
}

pub fn test_signer() -> TokenSigner {
    TokenSigner::new(b"integration-test-secret-0123456789abcdef".to_vec())
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad test date")
}

pub fn insert_group(conn: &Connection, nombre: &str) -> i64 {
    group::create(conn, nombre, None).expect("Failed to insert group")
}

pub fn insert_person(conn: &Connection, nombre: &str, primer_apellido: &str, email: &str) -> i64 {
    person::create(
        conn,
        nombre,
        primer_apellido,
        None,
        email,
        None,
        None,
        None,
        None,
        false,
        true,
    )
    .expect("Failed to insert person")
}

pub fn insert_membership(conn: &Connection, persona_id: i64, grupo_id: i64, inicio: &str) -> i64 {
    membership::create(conn, persona_id, grupo_id, date(inicio), None)
        .expect("Failed to insert membership")
}

pub fn insert_meeting(conn: &Connection, grupo_id: i64, fecha: &str, hora: &str) -> i64 {
    meeting::create(conn, grupo_id, date(fecha), hora, "Sala 1", None)
        .expect("Failed to insert meeting")
}
