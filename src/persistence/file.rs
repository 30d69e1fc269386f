use super::{PersistenceError, PersistenceResult};
use crate::metadata::PlanMetadata;
use crate::plan::ProjectPlan;
use crate::source::RecordBatch;
use crate::task::{RawTaskRecord, Task, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

const METADATA_ROW: &str = "__metadata__";

#[derive(Serialize, Deserialize)]
struct PlanSnapshot {
    metadata: PlanMetadata,
    #[serde(default)]
    critical_path_days: u64,
    tasks: Vec<Task>,
}

impl PlanSnapshot {
    fn from_plan(plan: &ProjectPlan) -> PersistenceResult<Self> {
        super::validate_tasks(plan.tasks())?;
        Ok(Self {
            metadata: plan.metadata().clone(),
            critical_path_days: plan.summary().critical_path_days,
            tasks: plan.tasks().to_vec(),
        })
    }

    fn into_plan(self) -> PersistenceResult<ProjectPlan> {
        super::validate_tasks(&self.tasks)?;
        Ok(ProjectPlan::assemble(
            self.metadata,
            self.tasks,
            self.critical_path_days,
        ))
    }
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &ProjectPlan, path: P) -> PersistenceResult<()> {
    let snapshot = PlanSnapshot::from_plan(plan)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ProjectPlan> {
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    snapshot.into_plan()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Batch(RecordBatch),
    List(Vec<RawTaskRecord>),
}

/// Reads records produced outside the DSL: either `{"title": .., "tasks": [..]}`
/// or a bare array of records.
pub fn load_records_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<RecordBatch> {
    let file = File::open(path)?;
    let parsed: RecordFile = serde_json::from_reader(file)?;
    let batch = match parsed {
        RecordFile::Batch(batch) => batch,
        RecordFile::List(tasks) => RecordBatch { title: None, tasks },
    };
    Ok(batch)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    name: String,
    section: String,
    duration_days: u32,
    dependencies: String,
    explicit_start: String,
    explicit_end: String,
    start: String,
    end: String,
    milestone: String,
    status: String,
    flagged_critical: String,
    critical: String,
    line: String,
    #[serde(default)]
    metadata_json: String,
    #[serde(default)]
    critical_path_days: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        TaskCsvRecord {
            id: task.id.clone(),
            name: task.name.clone(),
            section: task.section.clone().unwrap_or_default(),
            duration_days: task.duration_days,
            dependencies: task.dependencies.join(";"),
            explicit_start: format_date(task.explicit_start),
            explicit_end: format_date(task.explicit_end),
            start: format_date(task.computed_start),
            end: format_date(task.computed_end),
            milestone: task.is_milestone.to_string(),
            status: task.status.as_str().to_string(),
            flagged_critical: task.flagged_critical.to_string(),
            critical: task.is_critical.to_string(),
            line: task.line.map(|l| l.to_string()).unwrap_or_default(),
            ..TaskCsvRecord::default()
        }
    }
}

impl TaskCsvRecord {
    fn metadata_row(plan: &ProjectPlan) -> PersistenceResult<Self> {
        Ok(TaskCsvRecord {
            name: METADATA_ROW.to_string(),
            metadata_json: serde_json::to_string(plan.metadata())?,
            critical_path_days: plan.summary().critical_path_days.to_string(),
            ..TaskCsvRecord::default()
        })
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<Task> {
        let mut task = Task::new(self.id, self.name, self.duration_days);
        task.section = parse_string_option(self.section);
        task.dependencies = split_strings(&self.dependencies);
        task.explicit_start = parse_date(&self.explicit_start)?;
        task.explicit_end = parse_date(&self.explicit_end)?;
        task.computed_start = parse_date(&self.start)?;
        task.computed_end = parse_date(&self.end)?;
        task.is_milestone = parse_bool(&self.milestone)?;
        task.flagged_critical = parse_bool(&self.flagged_critical)?;
        task.is_critical = parse_bool(&self.critical)?;
        task.status = parse_status(&self.status)?;
        task.line = if self.line.trim().is_empty() {
            None
        } else {
            Some(self.line.trim().parse().map_err(|e| {
                PersistenceError::InvalidData(format!("invalid line number '{}': {e}", self.line))
            })?)
        };
        Ok(task)
    }
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &ProjectPlan, path: P) -> PersistenceResult<()> {
    super::validate_tasks(plan.tasks())?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(plan)?)?;
    for task in plan.tasks() {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_plan_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<ProjectPlan> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut metadata: Option<PlanMetadata> = None;
    let mut critical_path_days = 0;
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if metadata.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            metadata = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            critical_path_days = record.critical_path_days.trim().parse().unwrap_or(0);
            continue;
        }
        tasks.push(record.into_task()?);
    }

    let metadata = metadata
        .ok_or_else(|| PersistenceError::InvalidData("CSV file has no metadata row".into()))?;
    PlanSnapshot {
        metadata,
        critical_path_days,
        tasks,
    }
    .into_plan()
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn parse_status(input: &str) -> PersistenceResult<TaskStatus> {
    match input.trim() {
        "" | "not-started" => Ok(TaskStatus::NotStarted),
        "in-progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid status '{other}'"
        ))),
    }
}

fn split_strings(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(';').map(|s| s.trim().to_string()).collect()
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
