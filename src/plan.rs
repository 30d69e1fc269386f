use crate::metadata::PlanMetadata;
use crate::task::{Task, TaskStatus};
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub task_count: usize,
    pub milestone_count: usize,
    pub critical_count: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    /// Inclusive calendar days from the earliest start to the latest end.
    pub total_span_days: i64,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Critical task ids ordered by start date, then input order.
    pub critical_path: Vec<String>,
    pub critical_path_days: u64,
}

impl PlanSummary {
    fn compute(tasks: &[Task], critical_path_days: u64) -> Self {
        let start = tasks.iter().filter_map(|t| t.computed_start).min();
        let end = tasks.iter().filter_map(|t| t.computed_end).max();
        let total_span_days = match (start, end) {
            (Some(start), Some(end)) => (end - start).num_days() + 1,
            _ => 0,
        };

        let mut critical: Vec<&Task> = tasks.iter().filter(|t| t.is_critical).collect();
        // stable sort keeps input order among equal starts
        critical.sort_by_key(|t| t.computed_start);

        Self {
            task_count: tasks.len(),
            milestone_count: tasks.iter().filter(|t| t.is_milestone).count(),
            critical_count: critical.len(),
            completed_count: tasks.iter().filter(|t| t.status == TaskStatus::Done).count(),
            in_progress_count: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::InProgress)
                .count(),
            total_span_days,
            start,
            end,
            critical_path: critical.into_iter().map(|t| t.id.clone()).collect(),
            critical_path_days,
        }
    }

    /// Share of tasks marked done, between 0 and 1.
    pub fn completion_rate(&self) -> f64 {
        if self.task_count == 0 {
            return 0.0;
        }
        self.completed_count as f64 / self.task_count as f64
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        if self.milestone_count > 0 {
            parts.push(format!("milestones={}", self.milestone_count));
        }
        if self.completed_count > 0 {
            parts.push(format!("done={}", self.completed_count));
        }
        if self.in_progress_count > 0 {
            parts.push(format!("active={}", self.in_progress_count));
        }
        if let Some(date) = self.start {
            parts.push(format!("start={}", date));
        }
        if let Some(date) = self.end {
            parts.push(format!("finish={}", date));
        }
        parts.push(format!("span={}d", self.total_span_days));
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
            parts.push(format!("crit_days={}", self.critical_path_days));
        }
        parts.join(", ")
    }
}

/// A fully dated, immutable project plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPlan {
    metadata: PlanMetadata,
    tasks: Vec<Task>,
    sections: Vec<String>,
    summary: PlanSummary,
}

impl ProjectPlan {
    /// Wraps resolved tasks, which must already carry computed dates.
    pub fn assemble(mut metadata: PlanMetadata, tasks: Vec<Task>, critical_path_days: u64) -> Self {
        let summary = PlanSummary::compute(&tasks, critical_path_days);
        metadata.project_end = summary.end;

        // declared sections first, then any only tasks name
        let mut sections = metadata.sections.clone();
        for section in tasks.iter().filter_map(|t| t.section.as_ref()) {
            if !sections.contains(section) {
                sections.push(section.clone());
            }
        }

        tracing::info!(
            tasks = summary.task_count,
            critical = summary.critical_count,
            span_days = summary.total_span_days,
            "assembled project plan"
        );

        Self {
            metadata,
            tasks,
            sections,
            summary,
        }
    }

    pub fn metadata(&self) -> &PlanMetadata {
        &self.metadata
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn summary(&self) -> &PlanSummary {
        &self.summary
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks_in_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.section.as_deref() == Some(section))
    }

    /// Tasks `id` depends on, in declaration order. Empty for an unknown id.
    pub fn dependencies_of(&self, id: &str) -> Vec<&Task> {
        self.task(id)
            .map(|task| {
                task.dependencies
                    .iter()
                    .filter_map(|dep| self.task(dep))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tasks that depend on `id`, in input order.
    pub fn dependents_of(&self, id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.dependencies.iter().any(|dep| dep == id))
            .collect()
    }

    pub fn critical_tasks(&self) -> Vec<&Task> {
        self.summary
            .critical_path
            .iter()
            .filter_map(|id| self.task(id))
            .collect()
    }

    /// One row per task, in input order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<&str> = self.tasks.iter().map(|t| t.id.as_str()).collect();
        let names: Vec<&str> = self.tasks.iter().map(|t| t.name.as_str()).collect();
        let sections: Vec<Option<&str>> =
            self.tasks.iter().map(|t| t.section.as_deref()).collect();
        let durations: Vec<i64> = self
            .tasks
            .iter()
            .map(|t| i64::from(t.duration_days))
            .collect();
        let starts: Vec<Option<i32>> = self
            .tasks
            .iter()
            .map(|t| t.computed_start.map(date_to_i32))
            .collect();
        let ends: Vec<Option<i32>> = self
            .tasks
            .iter()
            .map(|t| t.computed_end.map(date_to_i32))
            .collect();
        let dependencies: Vec<Series> = self
            .tasks
            .iter()
            .map(|t| {
                let inner: Vec<&str> = t.dependencies.iter().map(String::as_str).collect();
                Series::new(PlSmallStr::from_static(""), inner)
            })
            .collect();
        let milestones: Vec<bool> = self.tasks.iter().map(|t| t.is_milestone).collect();
        let statuses: Vec<&str> = self.tasks.iter().map(|t| t.status.as_str()).collect();
        let critical: Vec<bool> = self.tasks.iter().map(|t| t.is_critical).collect();

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("name"), names).into_column(),
            Series::new(PlSmallStr::from_static("section"), sections).into_column(),
            Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
            Series::new(PlSmallStr::from_static("start"), starts)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("end"), ends)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("dependencies"), &dependencies).into_column(),
            Series::new(PlSmallStr::from_static("milestone"), milestones).into_column(),
            Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
            Series::new(PlSmallStr::from_static("critical"), critical).into_column(),
        ];

        DataFrame::new(columns)
    }
}

fn date_to_i32(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01, the polars Date epoch
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}
