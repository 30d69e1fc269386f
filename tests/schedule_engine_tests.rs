use chrono::NaiveDate;
use gantt_schedule::{
    CalendarMode, ParseError, PlanConfig, PlanError, PlanOutcome, RawTaskRecord, ResolveError,
    WarningKind, build_plan_from_dsl, build_plan_from_records,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2024-01-01 is a Monday
fn config() -> PlanConfig {
    PlanConfig::default().with_project_start(d(2024, 1, 1))
}

fn build(text: &str) -> PlanOutcome {
    build_plan_from_dsl(text, &config()).unwrap()
}

fn dates(outcome: &PlanOutcome, id: &str) -> (NaiveDate, NaiveDate) {
    let task = outcome.plan.task(id).unwrap();
    (task.computed_start.unwrap(), task.computed_end.unwrap())
}

const DIAMOND: &str = "\
A : a, 3d
B : b, after a, 5d
C : c, after a, 2d
D : d, after b c, 1d
";

#[test]
fn diamond_dates_and_critical_path() {
    let outcome = build(DIAMOND);

    assert_eq!(dates(&outcome, "a"), (d(2024, 1, 1), d(2024, 1, 3)));
    assert_eq!(dates(&outcome, "b"), (d(2024, 1, 4), d(2024, 1, 8)));
    assert_eq!(dates(&outcome, "c"), (d(2024, 1, 4), d(2024, 1, 5)));
    assert_eq!(dates(&outcome, "d"), (d(2024, 1, 9), d(2024, 1, 9)));

    let summary = outcome.plan.summary();
    assert_eq!(summary.critical_path, vec!["a", "b", "d"]);
    assert_eq!(summary.critical_path_days, 9);
    assert_eq!(summary.total_span_days, 9);
    assert!(!outcome.plan.task("c").unwrap().is_critical);
}

#[test]
fn five_day_task_from_friday() {
    let text = "Ship : s, 2024-01-05, 5d";

    let calendar = build_plan_from_dsl(text, &config()).unwrap();
    assert_eq!(dates(&calendar, "s"), (d(2024, 1, 5), d(2024, 1, 9)));

    let business = build_plan_from_dsl(
        text,
        &config().with_calendar_mode(CalendarMode::BusinessDay),
    )
    .unwrap();
    assert_eq!(dates(&business, "s"), (d(2024, 1, 5), d(2024, 1, 11)));
    assert_eq!(
        business.plan.metadata().calendar_mode,
        CalendarMode::BusinessDay
    );
}

#[test]
fn excludes_weekends_directive_switches_calendar() {
    let outcome = build("excludes weekends\nA : a, 2024-01-04, 2d\nB : b, after a, 1d");
    assert_eq!(dates(&outcome, "a"), (d(2024, 1, 4), d(2024, 1, 5)));
    assert_eq!(dates(&outcome, "b"), (d(2024, 1, 8), d(2024, 1, 8)));
}

#[test]
fn weekend_project_start_rolls_forward_in_business_mode() {
    let config = PlanConfig::default()
        .with_project_start(d(2024, 1, 6))
        .with_calendar_mode(CalendarMode::BusinessDay);
    let outcome = build_plan_from_dsl("A : a, 2d", &config).unwrap();
    assert_eq!(dates(&outcome, "a"), (d(2024, 1, 8), d(2024, 1, 9)));
}

#[test]
fn milestones_have_no_length_and_release_on_their_date() {
    let outcome = build("A : a, 3d\nmilestone Gate : g, after a\nB : b, after g, 2d");
    assert_eq!(dates(&outcome, "g"), (d(2024, 1, 4), d(2024, 1, 4)));
    assert_eq!(dates(&outcome, "b"), (d(2024, 1, 4), d(2024, 1, 5)));
    assert_eq!(outcome.plan.summary().milestone_count, 1);
}

#[test]
fn explicit_dates_are_reproduced() {
    let outcome = build("A : a, 2024-02-01, 2024-02-07\nB : b, 2024-03-10, 2024-03-10");
    assert_eq!(dates(&outcome, "a"), (d(2024, 2, 1), d(2024, 2, 7)));
    assert_eq!(outcome.plan.task("a").unwrap().duration_days, 7);
    assert_eq!(dates(&outcome, "b"), (d(2024, 3, 10), d(2024, 3, 10)));
}

#[test]
fn pinned_end_after_dependency() {
    let outcome = build("A : a, 3d\nB : b, after a, 2024-01-10");
    assert_eq!(dates(&outcome, "b"), (d(2024, 1, 4), d(2024, 1, 10)));
    assert_eq!(outcome.plan.task("b").unwrap().duration_days, 7);
}

#[test]
fn early_explicit_start_conflicts_with_dependency() {
    let text = "A : a, 3d\nB : b, after a, 2024-01-02, 2d";
    let err = build_plan_from_dsl(text, &config()).unwrap_err();
    assert_eq!(
        err,
        PlanError::Resolve(ResolveError::ScheduleConflict {
            task_id: "b".into(),
            explicit: d(2024, 1, 2),
            earliest: d(2024, 1, 4),
        })
    );

    let outcome = build_plan_from_dsl(text, &config().with_schedule_override(true)).unwrap();
    assert_eq!(dates(&outcome, "b"), (d(2024, 1, 2), d(2024, 1, 3)));
    assert!(
        outcome
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::ScheduleOverride && w.line == Some(2))
    );
}

#[test]
fn later_explicit_start_is_kept() {
    let outcome = build("A : a, 3d\nB : b, after a, 2024-01-15, 2d");
    assert_eq!(dates(&outcome, "b"), (d(2024, 1, 15), d(2024, 1, 16)));
}

#[test]
fn pinned_end_before_dependency_conflicts_even_with_override() {
    let text = "A : a, 3d\nB : b, after a, 2024-01-02";
    let err = build_plan_from_dsl(text, &config().with_schedule_override(true)).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Resolve(ResolveError::ScheduleConflict { ref task_id, .. }) if task_id == "b"
    ));
}

#[test]
fn three_task_cycle_names_every_member() {
    let err = build_plan_from_dsl(
        "A : a, after b, 1d\nB : b, after c, 1d\nC : c, after a, 1d",
        &config(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        PlanError::Resolve(ResolveError::CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "c".into()],
        })
    );
    assert_eq!(err.to_string(), "cyclic dependency: a -> b -> c -> a");
}

#[test]
fn unknown_dependency_names_both_tasks() {
    let err = build_plan_from_dsl("A : a, after taskX, 1d", &config()).unwrap_err();
    assert_eq!(
        err,
        PlanError::Resolve(ResolveError::UnknownDependency {
            task_id: "a".into(),
            referenced_id: "taskX".into(),
        })
    );
    let message = err.to_string();
    assert!(message.contains("'a'") && message.contains("'taskX'"), "{message}");
}

#[test]
fn dependencies_by_display_name() {
    let outcome = build("Design : 2d\nBuild : after Design, 1d");
    assert_eq!(outcome.plan.tasks()[1].dependencies, vec!["task1"]);
    assert_eq!(dates(&outcome, "task2"), (d(2024, 1, 3), d(2024, 1, 3)));
}

#[test]
fn duplicate_ids_are_fatal() {
    let err = build_plan_from_dsl("A : x, 1d\nB : x, 1d", &config()).unwrap_err();
    assert_eq!(
        err,
        PlanError::Resolve(ResolveError::DuplicateTaskId {
            task_id: "x".into(),
            line: Some(2),
        })
    );
}

#[test]
fn same_input_same_plan() {
    assert_eq!(build(DIAMOND).plan, build(DIAMOND).plan);
}

#[test]
fn huge_duration_is_an_error_not_a_panic() {
    let err = build_plan_from_dsl("A : a, 100000000d", &config()).unwrap_err();
    assert_eq!(
        err,
        PlanError::Resolve(ResolveError::DateOutOfRange {
            task_id: "a".into()
        })
    );

    let records = vec![
        RawTaskRecord::new("Long").with_id("long").with_duration(u32::MAX),
        RawTaskRecord::new("Next").with_id("next").after(["long"]),
    ];
    let err = build_plan_from_records(records, &config()).unwrap_err();
    assert!(err.to_string().contains("'long'"), "{err}");
}

#[test]
fn long_business_task_lands_on_a_weekday() {
    let outcome = build_plan_from_dsl(
        "A : a, 2024-01-01, 52w",
        &config().with_calendar_mode(CalendarMode::BusinessDay),
    )
    .unwrap();
    // 364 working days from Monday: 72 full weeks plus four days
    assert_eq!(dates(&outcome, "a"), (d(2024, 1, 1), d(2025, 5, 22)));
}

#[test]
fn record_with_end_and_duration_is_rejected() {
    let records = vec![
        RawTaskRecord::new("A")
            .with_id("a")
            .ending(d(2024, 3, 10))
            .with_duration(3),
    ];
    let err = build_plan_from_records(records, &config()).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Parse(ParseError::ConflictingAttributes { ref task, .. }) if task == "a"
    ));
}

#[test]
fn record_with_only_an_end_keeps_its_span() {
    let records = vec![RawTaskRecord::new("A").with_id("a").ending(d(2024, 1, 10))];
    let outcome = build_plan_from_records(records, &config()).unwrap();
    assert_eq!(dates(&outcome, "a"), (d(2024, 1, 1), d(2024, 1, 10)));
    assert_eq!(outcome.plan.task("a").unwrap().duration_days, 10);
    assert!(outcome.warnings.is_empty());
}
