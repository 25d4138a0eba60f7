use chrono::{NaiveDate, TimeZone, Utc};
use schooladmin_backend::models::attendance::AttendanceRecord;
use schooladmin_backend::services::attendance_service::{recency_key, resolve_current};
use uuid::Uuid;

fn record(
    student_id: Uuid,
    date: NaiveDate,
    status: &str,
    created_min: Option<u32>,
    updated_min: Option<u32>,
) -> AttendanceRecord {
    let at = |m: u32| Utc.with_ymd_and_hms(2026, 3, 10, 8, m, 0).unwrap();
    AttendanceRecord {
        id: Uuid::new_v4(),
        student_id,
        date,
        status: status.to_string(),
        time: None,
        teacher_id: None,
        remarks: None,
        notification_sent: false,
        created_at: created_min.map(at),
        updated_at: updated_min.map(at),
    }
}

#[test]
fn latest_updated_record_wins() {
    let student = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    let records = vec![
        record(student, date, "absent", Some(1), Some(2)),
        record(student, date, "present", Some(1), Some(30)),
        record(student, date, "late", Some(1), Some(10)),
    ];

    let resolved = resolve_current(records);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].status, "present");
}

#[test]
fn created_at_breaks_ties_when_updated_at_is_missing() {
    let student = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    let records = vec![
        record(student, date, "absent", Some(5), None),
        record(student, date, "late", Some(20), None),
    ];

    let resolved = resolve_current(records);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].status, "late");
}

#[test]
fn records_with_no_timestamps_fall_back_to_the_date() {
    let student = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    let bare = record(student, date, "holiday", None, None);
    let key = recency_key(&bare);
    assert_eq!(key, Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap());

    // Any record with a real timestamp beats the midnight fallback.
    let records = vec![bare, record(student, date, "present", Some(1), None)];
    let resolved = resolve_current(records);
    assert_eq!(resolved[0].status, "present");
}

#[test]
fn distinct_students_and_days_are_kept_apart() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    let records = vec![
        record(a, monday, "present", Some(1), None),
        record(a, tuesday, "absent", Some(1), None),
        record(b, monday, "late", Some(1), None),
        record(b, monday, "present", Some(1), Some(5)),
    ];

    let resolved = resolve_current(records);
    assert_eq!(resolved.len(), 3);
    let b_monday = resolved
        .iter()
        .find(|r| r.student_id == b && r.date == monday)
        .unwrap();
    assert_eq!(b_monday.status, "present");
}
