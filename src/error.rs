use chrono::NaiveDate;
use thiserror::Error;

/// Fatal conditions raised while turning DSL lines into raw task records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed task statement '{text}': {reason}")]
    MalformedTask {
        line: usize,
        text: String,
        reason: String,
    },

    #[error("{}task '{task}' has conflicting date/duration attributes: {reason}", line_prefix(.line))]
    ConflictingAttributes {
        line: Option<usize>,
        task: String,
        reason: String,
    },
}

/// Fatal conditions raised while resolving references and computing dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("task '{task_id}' depends on unknown task '{referenced_id}'")]
    UnknownDependency {
        task_id: String,
        referenced_id: String,
    },

    #[error(
        "task '{task_id}' references '{reference}', which matches several tasks by name: {}",
        .candidates.join(", ")
    )]
    AmbiguousReference {
        task_id: String,
        reference: String,
        candidates: Vec<String>,
    },

    #[error("task '{task_id}' depends on itself")]
    SelfDependency { task_id: String },

    #[error("{}task id '{task_id}' is declared more than once", line_prefix(.line))]
    DuplicateTaskId { task_id: String, line: Option<usize> },

    #[error("cyclic dependency: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<String> },

    #[error(
        "task '{task_id}' is pinned to {explicit} but its dependencies allow {earliest} at the earliest"
    )]
    ScheduleConflict {
        task_id: String,
        explicit: NaiveDate,
        earliest: NaiveDate,
    },

    #[error("task '{task_id}' runs past the last date the calendar can represent")]
    DateOutOfRange { task_id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

pub type Result<T> = std::result::Result<T, PlanError>;

fn line_prefix(line: &Option<usize>) -> String {
    line.map(|l| format!("line {l}: ")).unwrap_or_default()
}

fn format_cycle(cycle: &[String]) -> String {
    let mut chain = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        chain.push_str(" -> ");
        chain.push_str(first);
    }
    chain
}
