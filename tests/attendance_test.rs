//! Bulk attendance upsert and the statistics aggregate.

mod common;

use common::*;
use grupos::models::attendance::{self, AttendanceEntry, AttendanceStatus};

fn entry(persona_id: i64, estado: AttendanceStatus, obs: Option<&str>) -> AttendanceEntry {
    AttendanceEntry {
        persona_id,
        estado,
        observaciones: obs.map(String::from),
    }
}

#[test]
fn test_sheet_inserts_and_joins_person_name() {
    let (_dir, mut conn) = setup_test_db();
    let grupo_id = insert_group(&conn, "Finance");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");
    let reunion_id = insert_meeting(&conn, grupo_id, "2024-06-01", "18:00");

    attendance::save_sheet(
        &mut conn,
        reunion_id,
        &[entry(ana, AttendanceStatus::Asistio, None)],
    )
    .unwrap();

    let rows = attendance::find_by_meeting(&conn, reunion_id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].asistencia.estado, AttendanceStatus::Asistio);
    assert_eq!(rows[0].nombre, "Ana");
    assert_eq!(rows[0].primer_apellido, "Diaz");
}

#[test]
fn test_repeated_upserts_keep_one_row_with_last_value() {
    let (_dir, mut conn) = setup_test_db();
    let grupo_id = insert_group(&conn, "Finance");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");
    let reunion_id = insert_meeting(&conn, grupo_id, "2024-06-01", "18:00");

    for (estado, obs) in [
        (AttendanceStatus::Asistio, None),
        (AttendanceStatus::NoAsistio, Some("No avisó")),
        (AttendanceStatus::Excusa, Some("Enfermedad")),
    ] {
        attendance::save_sheet(&mut conn, reunion_id, &[entry(ana, estado, obs)]).unwrap();
    }

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM asistencias WHERE reunion_id = ?1 AND persona_id = ?2",
            rusqlite::params![reunion_id, ana],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);

    let rows = attendance::find_by_meeting(&conn, reunion_id).unwrap();
    assert_eq!(rows[0].asistencia.estado, AttendanceStatus::Excusa);
    assert_eq!(rows[0].asistencia.observaciones.as_deref(), Some("Enfermedad"));
}

#[test]
fn test_failing_entry_rolls_back_whole_batch() {
    let (_dir, mut conn) = setup_test_db();
    let grupo_id = insert_group(&conn, "Finance");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");
    let reunion_id = insert_meeting(&conn, grupo_id, "2024-06-01", "18:00");

    // Second entry violates the persona FK; the first must not be committed.
    let result = attendance::save_sheet(
        &mut conn,
        reunion_id,
        &[
            entry(ana, AttendanceStatus::Asistio, None),
            entry(99999, AttendanceStatus::Asistio, None),
        ],
    );
    assert!(result.is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM asistencias", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_sheet_covers_multiple_people() {
    let (_dir, mut conn) = setup_test_db();
    let grupo_id = insert_group(&conn, "Finance");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");
    let luis = insert_person(&conn, "Luis", "Pérez", "luis@x.com");
    let reunion_id = insert_meeting(&conn, grupo_id, "2024-06-01", "18:00");

    attendance::save_sheet(
        &mut conn,
        reunion_id,
        &[
            entry(ana, AttendanceStatus::Asistio, None),
            entry(luis, AttendanceStatus::NoAsistio, None),
        ],
    )
    .unwrap();

    let rows = attendance::find_by_meeting(&conn, reunion_id).unwrap();
    assert_eq!(rows.len(), 2);
    // Ordered by apellido: Diaz before Pérez.
    assert_eq!(rows[0].primer_apellido, "Diaz");
    assert_eq!(rows[1].primer_apellido, "Pérez");
}

#[test]
fn test_stats_counts_attended_excused_and_absent() {
    let (_dir, mut conn) = setup_test_db();
    let grupo_id = insert_group(&conn, "Finance");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");

    let r1 = insert_meeting(&conn, grupo_id, "2024-01-01", "18:00");
    let r2 = insert_meeting(&conn, grupo_id, "2024-02-01", "18:00");
    let r3 = insert_meeting(&conn, grupo_id, "2024-03-01", "18:00");
    let _r4 = insert_meeting(&conn, grupo_id, "2024-04-01", "18:00"); // unrecorded

    attendance::save_sheet(&mut conn, r1, &[entry(ana, AttendanceStatus::Asistio, None)]).unwrap();
    attendance::save_sheet(&mut conn, r2, &[entry(ana, AttendanceStatus::Excusa, None)]).unwrap();
    attendance::save_sheet(&mut conn, r3, &[entry(ana, AttendanceStatus::NoAsistio, None)])
        .unwrap();

    let stats = attendance::stats_for_person_in_group(&conn, ana, grupo_id).unwrap();
    assert_eq!(stats.total_reuniones, 4);
    assert_eq!(stats.asistencias, 1);
    assert_eq!(stats.excusas, 1);
    // Explicit no_asistio and the unrecorded meeting both count as absences.
    assert_eq!(stats.ausencias, 2);
}

#[test]
fn test_stats_zero_filled_without_meetings() {
    let (_dir, conn) = setup_test_db();
    let grupo_id = insert_group(&conn, "Finance");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");

    let stats = attendance::stats_for_person_in_group(&conn, ana, grupo_id).unwrap();
    assert_eq!(stats.total_reuniones, 0);
    assert_eq!(stats.asistencias, 0);
    assert_eq!(stats.excusas, 0);
    assert_eq!(stats.ausencias, 0);
}

#[test]
fn test_stats_ignores_other_groups() {
    let (_dir, mut conn) = setup_test_db();
    let g1 = insert_group(&conn, "Finance");
    let g2 = insert_group(&conn, "Ops");
    let ana = insert_person(&conn, "Ana", "Diaz", "ana@x.com");

    let r1 = insert_meeting(&conn, g1, "2024-01-01", "18:00");
    let r2 = insert_meeting(&conn, g2, "2024-01-02", "18:00");
    attendance::save_sheet(&mut conn, r1, &[entry(ana, AttendanceStatus::Asistio, None)]).unwrap();
    attendance::save_sheet(&mut conn, r2, &[entry(ana, AttendanceStatus::Asistio, None)]).unwrap();

    let stats = attendance::stats_for_person_in_group(&conn, ana, g1).unwrap();
    assert_eq!(stats.total_reuniones, 1);
    assert_eq!(stats.asistencias, 1);
}
