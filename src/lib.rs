pub mod calculations;
pub mod calendar;
pub mod config;
pub mod dsl;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod persistence;
pub mod pipeline;
pub mod plan;
pub mod resolve;
pub mod source;
pub mod task;
pub(crate) mod task_validation;
pub mod warning;

pub use calendar::{CalendarMode, WorkCalendar};
pub use config::{ConfigError, PlanConfig, load_config};
pub use dsl::{DateFormat, ParsedDocument, parse_document};
pub use error::{ParseError, PlanError, ResolveError, Result};
pub use metadata::PlanMetadata;
pub use persistence::{
    PersistenceError, load_plan_from_csv, load_plan_from_json, load_records_from_json,
    save_plan_to_csv, save_plan_to_json,
};
pub use pipeline::{PlanBuilder, PlanOutcome, build_plan_from_dsl, build_plan_from_records};
pub use plan::{PlanSummary, ProjectPlan};
pub use resolve::resolve_records;
pub use source::{DslSource, RecordBatch, SourceOutput, TaskRecordSource};
pub use task::{RawTaskRecord, Task, TaskStatus};
pub use warning::{Warning, WarningKind, Warnings};
