use chrono::NaiveDate;
use gantt_schedule::{
    PlanBuilder, PlanConfig, RawTaskRecord, RecordBatch, TaskStatus, build_plan_from_dsl,
    build_plan_from_records,
};
use polars::prelude::*;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config() -> PlanConfig {
    PlanConfig::default().with_project_start(d(2024, 1, 1))
}

const ROADMAP: &str = "\
gantt
    title Roadmap
    section Research
    Survey     : done, survey, 2d
    Interviews : active, interviews, after survey, 3d
    section Build
    Prototype  : proto, after interviews, 4d
    Docs       : docs, after survey, 1d
    milestone Demo : demo, after proto docs
";

#[test]
fn accessors_navigate_the_plan() {
    let plan = build_plan_from_dsl(ROADMAP, &config()).unwrap().plan;

    assert_eq!(plan.title(), Some("Roadmap"));
    assert_eq!(plan.sections(), &["Research".to_string(), "Build".to_string()]);
    let build_ids: Vec<&str> = plan.tasks_in_section("Build").map(|t| t.id.as_str()).collect();
    assert_eq!(build_ids, vec!["proto", "docs", "demo"]);

    let deps: Vec<&str> = plan
        .dependencies_of("demo")
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(deps, vec!["proto", "docs"]);

    let dependents: Vec<&str> = plan
        .dependents_of("survey")
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(dependents, vec!["interviews", "docs"]);

    assert!(plan.task("missing").is_none());
    assert!(plan.dependencies_of("missing").is_empty());
}

#[test]
fn summary_counts_and_critical_chain() {
    let plan = build_plan_from_dsl(ROADMAP, &config()).unwrap().plan;
    let summary = plan.summary();

    assert_eq!(summary.task_count, 5);
    assert_eq!(summary.milestone_count, 1);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.in_progress_count, 1);
    assert_eq!(summary.critical_path, vec!["survey", "interviews", "proto", "demo"]);
    assert_eq!(summary.critical_path_days, 9);
    assert_eq!(summary.start, Some(d(2024, 1, 1)));
    // survey 1-2, interviews 3-5, proto 6-9, demo 10
    assert_eq!(summary.end, Some(d(2024, 1, 10)));
    assert_eq!(summary.total_span_days, 10);
    assert!((summary.completion_rate() - 0.2).abs() < 1e-9);

    let critical: Vec<&str> = plan.critical_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(critical, summary.critical_path);
    assert_eq!(plan.metadata().project_end, Some(d(2024, 1, 10)));

    let line = summary.to_cli_summary();
    assert!(line.starts_with("tasks=5, critical=4, milestones=1"), "{line}");
    assert!(line.contains("crit_path=survey->interviews->proto->demo"), "{line}");
}

#[test]
fn empty_input_gives_an_empty_plan() {
    let plan = build_plan_from_dsl("gantt\n", &config()).unwrap().plan;
    assert!(plan.is_empty());
    assert_eq!(plan.summary().total_span_days, 0);
    assert_eq!(plan.summary().to_cli_summary(), "tasks=0, critical=0, span=0d");
}

#[test]
fn dataframe_view_has_one_row_per_task() {
    let plan = build_plan_from_dsl(ROADMAP, &config()).unwrap().plan;
    let df = plan.to_dataframe().unwrap();

    assert_eq!(df.height(), 5);
    let ids: Vec<Option<&str>> = df.column("id").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(ids[2], Some("proto"));
    assert_eq!(df.column("start").unwrap().dtype(), &DataType::Date);
    let critical: Vec<Option<bool>> = df
        .column("critical")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(critical, vec![Some(true), Some(true), Some(true), Some(false), Some(true)]);
}

#[test]
fn records_enter_without_the_dsl() {
    let records = vec![
        RawTaskRecord::new("Design").with_id("design").with_duration(2),
        RawTaskRecord::new("Build").after(["design"]).with_duration(3),
        RawTaskRecord::new("Launch").after(["Build"]).milestone(),
    ];
    let outcome = build_plan_from_records(records, &config()).unwrap();
    let plan = &outcome.plan;

    let ids: Vec<&str> = plan.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["design", "task2", "task3"]);
    let launch = plan.task("task3").unwrap();
    assert!(launch.is_milestone);
    assert_eq!(launch.computed_start, Some(d(2024, 1, 6)));
    assert_eq!(launch.computed_end, launch.computed_start);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn record_batch_carries_title_and_status() {
    let mut review = RawTaskRecord::new("Review").with_duration(1);
    review.status = TaskStatus::Done;
    let batch = RecordBatch {
        title: Some("From records".into()),
        tasks: vec![review],
    };
    let outcome = PlanBuilder::new(config()).build(&batch).unwrap();
    assert_eq!(outcome.plan.title(), Some("From records"));
    assert_eq!(outcome.plan.summary().completed_count, 1);
}

#[test]
fn declared_sections_survive_without_tasks() {
    let text = "\
gantt
    section Backlog
    section Build
    Prototype : proto, 2d
    section Later
";
    let plan = build_plan_from_dsl(text, &config()).unwrap().plan;
    assert_eq!(plan.sections(), &["Backlog", "Build", "Later"]);
    assert_eq!(plan.tasks_in_section("Backlog").count(), 0);
    assert_eq!(plan.metadata().sections, plan.sections());
}
