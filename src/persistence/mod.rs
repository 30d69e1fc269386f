use crate::task::Task;
use std::collections::HashSet;
use thiserror::Error;

pub mod file;

pub use file::{
    load_plan_from_csv, load_plan_from_json, load_records_from_json, save_plan_to_csv,
    save_plan_to_json,
};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Checks that stored tasks still form a resolved plan.
pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }

    for task in tasks {
        if let Some(dep) = task.dependencies.iter().find(|dep| !seen_ids.contains(dep.as_str())) {
            return Err(PersistenceError::InvalidData(format!(
                "task {} depends on missing task {dep}",
                task.id
            )));
        }
        match (task.computed_start, task.computed_end) {
            (Some(start), Some(end)) if start <= end => {}
            (Some(start), Some(end)) => {
                return Err(PersistenceError::InvalidData(format!(
                    "task {} ends ({end}) before it starts ({start})",
                    task.id
                )));
            }
            _ => {
                return Err(PersistenceError::InvalidData(format!(
                    "task {} has no computed dates",
                    task.id
                )));
            }
        }
    }
    Ok(())
}
