use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Maps the gantt status keywords `done` and `active`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "done" => Some(TaskStatus::Done),
            "active" => Some(TaskStatus::InProgress),
            _ => None,
        }
    }
}

/// A task as produced by the DSL parser or an external record producer,
/// before references are resolved and dates computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTaskRecord {
    pub id: Option<String>,
    pub name: String,
    pub section: Option<String>,
    /// Unresolved dependency tokens (ids or display names).
    pub dependencies: Vec<String>,
    #[serde(alias = "start_date")]
    pub start: Option<NaiveDate>,
    #[serde(alias = "end_date")]
    pub end: Option<NaiveDate>,
    #[serde(alias = "duration")]
    pub duration_days: Option<u32>,
    pub is_milestone: bool,
    pub status: TaskStatus,
    /// Author tagged the task `crit`.
    pub flagged_critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raw_attributes: Vec<String>,
}

impl RawTaskRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    pub fn after<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    pub fn ending(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    pub fn milestone(mut self) -> Self {
        self.is_milestone = true;
        self
    }

    /// Label used in diagnostics before an id has been assigned.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn has_timing(&self) -> bool {
        self.start.is_some()
            || self.end.is_some()
            || self.duration_days.is_some()
            || !self.dependencies.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub section: Option<String>,
    pub duration_days: u32,
    pub explicit_start: Option<NaiveDate>,
    pub explicit_end: Option<NaiveDate>,
    /// Resolved task ids, de-duplicated, in declaration order.
    pub dependencies: Vec<String>,
    pub is_milestone: bool,
    pub status: TaskStatus,
    pub flagged_critical: bool,
    pub computed_start: Option<NaiveDate>,
    pub computed_end: Option<NaiveDate>,
    pub is_critical: bool,
    pub line: Option<usize>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_days: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            section: None,
            duration_days,
            explicit_start: None,
            explicit_end: None,
            dependencies: Vec::new(),
            is_milestone: false,
            status: TaskStatus::NotStarted,
            flagged_critical: false,
            computed_start: None,
            computed_end: None,
            is_critical: false,
            line: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.computed_start.is_some() && self.computed_end.is_some()
    }
}
