use rtimeledger::core::validator::{
    Conflict, check_change, find_conflict, overlaps, validate_day, validate_order,
};
use rtimeledger::errors::AppError;
use rtimeledger::models::period::PeriodDraft;
use rtimeledger::models::period_type::PeriodType;

mod common;
use common::t;

fn closed(kind: PeriodType, a: &str, b: &str) -> PeriodDraft {
    PeriodDraft::with_times(kind, t(a), Some(t(b)))
}

fn open(kind: PeriodType, a: &str) -> PeriodDraft {
    PeriodDraft::with_times(kind, t(a), None)
}

#[test]
fn touching_endpoints_do_not_overlap() {
    assert!(!overlaps((540, 720), (720, 780)));
    assert!(!overlaps((720, 780), (540, 720)));
    assert!(overlaps((540, 1080), (1020, 1140)));
}

#[test]
fn adjacent_main_and_overtime_validate() {
    let day = [
        closed(PeriodType::Main, "09:00", "12:00"),
        closed(PeriodType::Overtime, "12:00", "13:00"),
    ];
    assert!(validate_day(&day).is_ok());
}

#[test]
fn overlap_reports_the_second_period() {
    let day = [
        closed(PeriodType::Main, "09:00", "18:00"),
        closed(PeriodType::Overtime, "17:00", "19:00"),
    ];
    match validate_day(&day) {
        Err(AppError::PeriodConflict { changed, other }) => {
            assert_eq!(changed, 1);
            assert_eq!(other, 0);
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn containment_is_a_conflict() {
    let day = [
        closed(PeriodType::Main, "08:00", "18:00"),
        closed(PeriodType::Main, "10:00", "11:00"),
    ];
    assert_eq!(
        find_conflict(&day),
        Some(Conflict {
            changed: 1,
            other: 0
        })
    );
}

#[test]
fn conflict_found_regardless_of_list_order() {
    let day = [
        closed(PeriodType::Main, "14:00", "16:00"),
        closed(PeriodType::Main, "09:00", "15:00"),
    ];
    // index 0 starts later, so it is the one reported as changed
    assert_eq!(
        find_conflict(&day),
        Some(Conflict {
            changed: 0,
            other: 1
        })
    );
}

#[test]
fn open_periods_are_excluded_from_overlap() {
    let day = [
        closed(PeriodType::Main, "09:00", "12:00"),
        open(PeriodType::Overtime, "10:00"),
    ];
    assert!(validate_day(&day).is_ok());
    assert_eq!(check_change(&day, 1), None);
}

#[test]
fn check_change_names_first_overlap_in_list_order() {
    let day = [
        closed(PeriodType::Main, "09:00", "10:00"),
        closed(PeriodType::Main, "11:00", "12:00"),
        closed(PeriodType::Overtime, "09:30", "11:30"),
    ];
    assert_eq!(
        check_change(&day, 2),
        Some(Conflict {
            changed: 2,
            other: 0
        })
    );
}

#[test]
fn empty_day_is_rejected() {
    assert!(matches!(validate_day(&[]), Err(AppError::EmptyDay)));
}

#[test]
fn missing_clock_in_is_rejected() {
    let day = [
        closed(PeriodType::Main, "09:00", "12:00"),
        PeriodDraft::new(PeriodType::Overtime),
    ];
    assert!(matches!(validate_day(&day), Err(AppError::MissingClockIn(1))));
}

#[test]
fn inverted_range_is_rejected() {
    let day = [closed(PeriodType::Main, "18:00", "09:00")];
    match validate_day(&day) {
        Err(e @ AppError::InvalidRange { .. }) => assert!(e.is_validation()),
        other => panic!("expected invalid range, got {other:?}"),
    }
}

#[test]
fn overnight_span_overlaps_early_morning_periods() {
    // 22:00-01:00 runs to minute 1500
    assert!(overlaps((1320, 1500), (30, 45)));
    assert!(overlaps((30, 45), (1320, 1500)));
    assert!(overlaps((1320, 1500), (1380, 1410)));
    assert!(!overlaps((1320, 1500), (60, 120)));
    assert!(!overlaps((0, 60), (1400, 1440)));
}

#[test]
fn stored_overnight_draft_keeps_its_order() {
    let mut night = closed(PeriodType::Main, "22:00", "01:00");
    assert!(matches!(
        validate_order(0, &night),
        Err(AppError::InvalidRange { index: 0, .. })
    ));

    night.overnight = true;
    assert!(validate_order(0, &night).is_ok());
    assert_eq!(night.minute_range(), Some((1320, 1500)));

    let day = [night, closed(PeriodType::Overtime, "00:30", "00:45")];
    assert_eq!(
        find_conflict(&day),
        Some(Conflict {
            changed: 0,
            other: 1
        })
    );
}

#[test]
fn one_open_period_per_type() {
    let day = [open(PeriodType::Main, "08:00"), open(PeriodType::Main, "09:00")];
    assert!(matches!(
        validate_day(&day),
        Err(AppError::MultipleOpenPeriods {
            first: 0,
            second: 1,
            ..
        })
    ));

    let mixed = [open(PeriodType::Main, "08:00"), open(PeriodType::Overtime, "09:00")];
    assert!(validate_day(&mixed).is_ok());
}
