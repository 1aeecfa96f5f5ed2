use chrono::Duration;
use rtimeledger::core::ledger::{ClockOutcome, PeriodPatch};
use rtimeledger::db::repository::RECORDS_KEY;
use rtimeledger::db::store::MemoryStore;
use rtimeledger::errors::AppError;
use rtimeledger::models::period::PeriodDraft;
use rtimeledger::models::period_type::PeriodType;
use rtimeledger::utils::time::format_hms;
use serde_json::json;

mod common;
use common::{at, d, ledger_over, memory_ledger, t};

fn closed(kind: PeriodType, a: &str, b: &str) -> PeriodDraft {
    PeriodDraft::with_times(kind, t(a), Some(t(b)))
}

#[test]
fn toggle_opens_then_closes() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "09:00:00"));

    let opened = ledger.open_period(day, PeriodType::Main).unwrap();
    assert!(matches!(opened, ClockOutcome::Opened { index: 0, .. }));
    assert!(ledger.get_day(day).unwrap().open_slot(PeriodType::Main).is_some());

    ledger.clock().advance(Duration::hours(3));
    let closed = ledger.open_period(day, PeriodType::Main).unwrap();
    match closed {
        ClockOutcome::Closed { index, period } => {
            assert_eq!(index, 0);
            assert_eq!(period.clock_out, Some(t("12:00:00")));
            assert_eq!(period.duration, Some(Duration::hours(3)));
        }
        other => panic!("expected close, got {other:?}"),
    }

    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.open_slot(PeriodType::Main), None);
    assert_eq!(stored.total_work_time(), Some(Duration::hours(3)));
}

#[test]
fn types_toggle_independently() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "09:00:00"));

    ledger.open_period(day, PeriodType::Main).unwrap();
    ledger.clock().advance(Duration::minutes(30));
    let ot = ledger.open_period(day, PeriodType::Overtime).unwrap();
    assert!(matches!(ot, ClockOutcome::Opened { index: 1, .. }));

    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.open_slot(PeriodType::Main), Some(0));
    assert_eq!(stored.open_slot(PeriodType::Overtime), Some(1));
}

#[test]
fn second_main_period_opens_after_the_first_closed() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "09:00:00"));

    ledger.open_period(day, PeriodType::Main).unwrap();
    ledger.clock().set(at(day, "12:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();
    ledger.clock().set(at(day, "13:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();
    ledger.clock().set(at(day, "17:30:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();

    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(
        stored.total_by_type(PeriodType::Main),
        Duration::minutes(7 * 60 + 30)
    );
}

#[test]
fn close_without_open_period_fails() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "09:00:00"));
    let err = ledger.close_period(day, PeriodType::Overtime).unwrap_err();
    assert!(matches!(err, AppError::NoOpenPeriod(_, _)));
}

#[test]
fn closing_into_an_existing_period_is_rejected() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "08:00:00"));
    ledger
        .save(
            day,
            &[
                PeriodDraft::with_times(PeriodType::Main, t("08:00"), None),
                closed(PeriodType::Overtime, "09:00", "10:00"),
            ],
        )
        .unwrap();

    ledger.clock().set(at(day, "11:00:00"));
    let err = ledger.close_period(day, PeriodType::Main).unwrap_err();
    assert!(matches!(err, AppError::PeriodConflict { changed: 0, other: 1 }));
    // still open
    assert!(ledger.get_day(day).unwrap().open_slot(PeriodType::Main).is_some());
}

#[test]
fn save_touching_periods() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    let saved = ledger
        .save(
            day,
            &[
                closed(PeriodType::Main, "09:00", "12:00"),
                closed(PeriodType::Overtime, "12:00", "13:00"),
            ],
        )
        .unwrap();
    assert_eq!(saved.total_work_time(), Some(Duration::hours(4)));
    assert_eq!(saved.total_by_type(PeriodType::Overtime), Duration::hours(1));
}

#[test]
fn save_rejects_overlap_without_writing() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    let err = ledger
        .save(
            day,
            &[
                closed(PeriodType::Main, "09:00", "18:00"),
                closed(PeriodType::Overtime, "17:00", "19:00"),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, AppError::PeriodConflict { changed: 1, .. }));
    assert_eq!(ledger.repository().store().write_count(), 0);
    assert!(ledger.get_day(day).is_none());
}

#[test]
fn save_replaces_the_whole_day() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    ledger
        .save(day, &[closed(PeriodType::Main, "09:00", "12:00")])
        .unwrap();
    ledger
        .save(day, &[closed(PeriodType::Main, "10:00", "11:00")])
        .unwrap();

    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.periods()[0].clock_in, t("10:00"));
}

#[test]
fn edit_changes_fields_and_recomputes() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    ledger
        .save(day, &[closed(PeriodType::Main, "09:00", "12:00")])
        .unwrap();

    let patch = PeriodPatch {
        clock_out: Some(Some(t("12:45"))),
        ..Default::default()
    };
    let p = ledger.upsert_period_fields(day, 0, &patch).unwrap();
    assert_eq!(format_hms(p.duration.unwrap()), "03:45:00");
    assert_eq!(
        ledger.get_day(day).unwrap().total_work_time(),
        Some(Duration::minutes(225))
    );
}

#[test]
fn edit_into_overlap_is_rejected() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    ledger
        .save(
            day,
            &[
                closed(PeriodType::Main, "09:00", "12:00"),
                closed(PeriodType::Overtime, "13:00", "14:00"),
            ],
        )
        .unwrap();
    let writes = ledger.repository().store().write_count();

    let patch = PeriodPatch {
        clock_in: Some(t("11:00")),
        ..Default::default()
    };
    let err = ledger.upsert_period_fields(day, 1, &patch).unwrap_err();
    assert!(matches!(err, AppError::PeriodConflict { changed: 1, other: 0 }));
    assert_eq!(ledger.repository().store().write_count(), writes);
}

#[test]
fn edit_with_inverted_range_is_rejected() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    ledger
        .save(day, &[closed(PeriodType::Main, "09:00", "12:00")])
        .unwrap();

    let patch = PeriodPatch {
        clock_out: Some(Some(t("08:00"))),
        ..Default::default()
    };
    let err = ledger.upsert_period_fields(day, 0, &patch).unwrap_err();
    assert!(matches!(err, AppError::InvalidRange { index: 0, .. }));
}

#[test]
fn edit_unknown_index_or_date() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    let patch = PeriodPatch::default();
    assert!(matches!(
        ledger.upsert_period_fields(day, 0, &patch),
        Err(AppError::NoRecordForDate(_))
    ));

    ledger
        .save(day, &[closed(PeriodType::Main, "09:00", "12:00")])
        .unwrap();
    assert!(matches!(
        ledger.upsert_period_fields(day, 3, &patch),
        Err(AppError::InvalidPeriodIndex(3))
    ));
}

#[test]
fn deleting_last_period_removes_the_day() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    ledger
        .save(
            day,
            &[
                closed(PeriodType::Main, "09:00", "12:00"),
                closed(PeriodType::Main, "13:00", "17:00"),
            ],
        )
        .unwrap();

    ledger.delete_period(day, 0).unwrap();
    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.total_work_time(), Some(Duration::hours(4)));

    ledger.delete_period(day, 0).unwrap();
    assert!(ledger.get_day(day).is_none());
}

#[test]
fn delete_day_of_unknown_date() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "20:00:00"));
    assert!(matches!(
        ledger.delete_day(day),
        Err(AppError::NoRecordForDate(_))
    ));
}

#[test]
fn unreadable_storage_fails_closed_for_reads() {
    let day = d(2024, 5, 2);
    let mut store = MemoryStore::new();
    store.set_fail_reads(true);
    let ledger = ledger_over(store, at(day, "20:00:00"));

    assert!(ledger.get_day(day).is_none());
    assert!(ledger.all_days().is_empty());
}

#[test]
fn unreadable_storage_aborts_mutations() {
    let day = d(2024, 5, 2);
    let mut store = MemoryStore::new();
    store.set_fail_reads(true);
    let mut ledger = ledger_over(store, at(day, "20:00:00"));

    let err = ledger.open_period(day, PeriodType::Main).unwrap_err();
    assert!(matches!(err, AppError::StorageUnavailable(_)));
    assert_eq!(ledger.repository().store().write_count(), 0);
}

#[test]
fn write_failure_surfaces() {
    let day = d(2024, 5, 2);
    let mut store = MemoryStore::new();
    store.set_fail_writes(true);
    let mut ledger = ledger_over(store, at(day, "20:00:00"));

    let err = ledger
        .save(day, &[closed(PeriodType::Main, "09:00", "12:00")])
        .unwrap_err();
    assert!(matches!(err, AppError::StorageUnavailable(_)));
}

#[test]
fn unknown_entries_survive_a_save() {
    let day = d(2024, 5, 2);
    let foreign = json!({"note": "kept as is"});
    let store = MemoryStore::new().with_value(RECORDS_KEY, json!([foreign.clone()]));
    let mut ledger = ledger_over(store, at(day, "20:00:00"));

    ledger
        .save(day, &[closed(PeriodType::Main, "09:00", "12:00")])
        .unwrap();

    let raw = ledger.repository().store().raw(RECORDS_KEY).unwrap();
    let entries = raw.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&foreign));
}

#[test]
fn mutations_are_audited() {
    let day = d(2024, 5, 2);
    let mut ledger = memory_ledger(at(day, "09:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();

    let trail = ledger.repository().store().audit_trail();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].0, "clock_in");
    assert_eq!(trail[0].1, "2024/05/02");
}

#[test]
fn overnight_close_into_an_existing_period_is_rejected() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "22:00:00"));
    ledger
        .save(
            day,
            &[
                PeriodDraft::with_times(PeriodType::Main, t("22:00"), None),
                closed(PeriodType::Overtime, "23:00", "23:30"),
            ],
        )
        .unwrap();

    ledger.clock().set(at(d(2025, 3, 11), "01:00:00"));
    let err = ledger.open_period(day, PeriodType::Main).unwrap_err();
    assert!(matches!(err, AppError::PeriodConflict { changed: 0, other: 1 }));

    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.open_slot(PeriodType::Main), Some(0));
    assert_eq!(stored.periods()[0].clock_out, None);
}

#[test]
fn overnight_close_stays_editable() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "22:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();
    ledger.clock().set(at(d(2025, 3, 11), "01:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();

    let stored = ledger.get_day(day).unwrap();
    assert!(stored.periods()[0].wraps());
    assert_eq!(stored.periods()[0].duration, Some(Duration::hours(3)));

    // the stored day saves back unchanged
    let drafts: Vec<PeriodDraft> = stored.periods().iter().map(PeriodDraft::from).collect();
    let resaved = ledger.save(day, &drafts).unwrap();
    assert_eq!(resaved, stored);

    // a type change keeps the overnight span
    let patch = PeriodPatch {
        kind: Some(PeriodType::Overtime),
        ..PeriodPatch::default()
    };
    let edited = ledger.upsert_period_fields(day, 0, &patch).unwrap();
    assert_eq!(edited.duration, Some(Duration::hours(3)));

    // moving a time falls back to the same-day rule
    let patch = PeriodPatch {
        clock_in: Some(t("23:00")),
        ..PeriodPatch::default()
    };
    let err = ledger.upsert_period_fields(day, 0, &patch).unwrap_err();
    assert!(matches!(err, AppError::InvalidRange { index: 0, .. }));
}

#[test]
fn early_period_conflicts_with_an_overnight_tail() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "22:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();
    ledger.clock().set(at(d(2025, 3, 11), "01:00:00"));
    ledger.open_period(day, PeriodType::Main).unwrap();

    let mut drafts: Vec<PeriodDraft> = ledger
        .get_day(day)
        .unwrap()
        .periods()
        .iter()
        .map(PeriodDraft::from)
        .collect();
    drafts.push(closed(PeriodType::Overtime, "00:30", "00:45"));

    let err = ledger.save(day, &drafts).unwrap_err();
    assert!(matches!(err, AppError::PeriodConflict { changed: 0, other: 1 }));
    assert_eq!(ledger.get_day(day).unwrap().len(), 1);
}

#[test]
fn second_open_period_of_a_type_is_refused() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "12:00:00"));
    let err = ledger
        .save(
            day,
            &[
                PeriodDraft::with_times(PeriodType::Main, t("08:00"), None),
                PeriodDraft::with_times(PeriodType::Main, t("09:00"), None),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::MultipleOpenPeriods {
            first: 0,
            second: 1,
            ..
        }
    ));
    assert!(ledger.get_day(day).is_none());
}

#[test]
fn reopening_beside_an_open_period_is_refused() {
    let day = d(2025, 3, 10);
    let mut ledger = memory_ledger(at(day, "12:00:00"));
    ledger
        .save(
            day,
            &[
                closed(PeriodType::Main, "08:00", "09:00"),
                PeriodDraft::with_times(PeriodType::Main, t("10:00"), None),
            ],
        )
        .unwrap();

    let patch = PeriodPatch {
        clock_out: Some(None),
        ..PeriodPatch::default()
    };
    let err = ledger.upsert_period_fields(day, 0, &patch).unwrap_err();
    assert!(matches!(err, AppError::MultipleOpenPeriods { .. }));

    let stored = ledger.get_day(day).unwrap();
    assert_eq!(stored.periods()[0].clock_out, Some(t("09:00")));
    assert_eq!(stored.open_slot(PeriodType::Main), Some(1));
}
