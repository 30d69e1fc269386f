//! Producers of raw task records.
//!
//! The DSL parser is one producer; anything else that can emit
//! [`RawTaskRecord`]s (a JSON file, an extraction service) plugs in through
//! [`TaskRecordSource`] and enters the pipeline at reference resolution.

use crate::calendar::CalendarMode;
use crate::config::PlanConfig;
use crate::dsl::{self, DateFormat};
use crate::error::PlanError;
use crate::task::RawTaskRecord;
use crate::warning::Warnings;
use serde::{Deserialize, Serialize};

/// Records handed to the resolver, plus what the producer knows about the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordBatch {
    pub title: Option<String>,
    pub tasks: Vec<RawTaskRecord>,
}

/// Output of a source: records and whatever the source decided about the plan.
#[derive(Debug, Clone, Default)]
pub struct SourceOutput {
    pub title: Option<String>,
    pub date_format: Option<DateFormat>,
    pub calendar_mode: Option<CalendarMode>,
    /// Declared section names in order; sections only named by records need not appear.
    pub sections: Vec<String>,
    pub records: Vec<RawTaskRecord>,
    pub warnings: Warnings,
}

pub trait TaskRecordSource {
    fn records(&self, config: &PlanConfig) -> Result<SourceOutput, PlanError>;
}

/// Gantt DSL text.
#[derive(Debug, Clone, Copy)]
pub struct DslSource<'a> {
    text: &'a str,
}

impl<'a> DslSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl TaskRecordSource for DslSource<'_> {
    fn records(&self, config: &PlanConfig) -> Result<SourceOutput, PlanError> {
        let doc = dsl::parse_document(self.text, config)?;
        Ok(SourceOutput {
            title: doc.title,
            date_format: Some(doc.date_format),
            calendar_mode: doc.calendar_mode,
            sections: doc.sections,
            records: doc.records,
            warnings: doc.warnings,
        })
    }
}

impl TaskRecordSource for RecordBatch {
    fn records(&self, _config: &PlanConfig) -> Result<SourceOutput, PlanError> {
        Ok(SourceOutput {
            title: self.title.clone(),
            records: self.tasks.clone(),
            ..SourceOutput::default()
        })
    }
}

impl TaskRecordSource for [RawTaskRecord] {
    fn records(&self, _config: &PlanConfig) -> Result<SourceOutput, PlanError> {
        Ok(SourceOutput {
            records: self.to_vec(),
            ..SourceOutput::default()
        })
    }
}
