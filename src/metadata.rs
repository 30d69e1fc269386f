use crate::calendar::CalendarMode;
use crate::dsl::DateFormat;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub title: Option<String>,
    pub date_format: DateFormat,
    pub calendar_mode: CalendarMode,
    /// Start given to tasks without dependencies or dates.
    pub project_start: NaiveDate,
    /// Latest computed end; `None` for an empty plan.
    pub project_end: Option<NaiveDate>,
    /// Sections the source declared, including ones left without tasks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,
}

impl PlanMetadata {
    pub fn new(project_start: NaiveDate) -> Self {
        Self {
            title: None,
            date_format: DateFormat::default(),
            calendar_mode: CalendarMode::default(),
            project_start,
            project_end: None,
            sections: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    pub fn with_calendar_mode(mut self, mode: CalendarMode) -> Self {
        self.calendar_mode = mode;
        self
    }

    pub fn with_sections(mut self, sections: Vec<String>) -> Self {
        self.sections = sections;
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled plan")
    }
}
