//! Turns raw records into tasks whose dependencies are stable task ids.

use crate::config::PlanConfig;
use crate::error::{ResolveError, Result};
use crate::task::{RawTaskRecord, Task};
use crate::task_validation::{apply_default_duration, validate_record, validate_record_collection};
use crate::warning::{WarningKind, Warnings};
use std::collections::{HashMap, HashSet};

/// Assigns `task<N>` to records without an id, skipping ids already declared.
fn assign_ids(records: &[RawTaskRecord]) -> Vec<String> {
    let mut taken: HashSet<String> = records.iter().filter_map(|r| r.id.clone()).collect();
    let mut ids = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        if let Some(id) = &record.id {
            ids.push(id.clone());
            continue;
        }
        let mut n = idx + 1;
        let mut candidate = format!("task{n}");
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("task{n}");
        }
        taken.insert(candidate.clone());
        ids.push(candidate);
    }
    ids
}

struct ReferenceIndex<'a> {
    by_id: HashMap<&'a str, usize>,
    by_name: HashMap<&'a str, Vec<usize>>,
    ids: &'a [String],
}

impl<'a> ReferenceIndex<'a> {
    fn new(ids: &'a [String], records: &'a [RawTaskRecord]) -> Self {
        let by_id = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.as_str(), idx))
            .collect();
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_name.entry(record.name.as_str()).or_default().push(idx);
        }
        Self { by_id, by_name, ids }
    }

    fn lookup(&self, owner: usize, token: &str) -> std::result::Result<usize, ResolveError> {
        let task_id = &self.ids[owner];
        let target = match self.by_id.get(token) {
            Some(&idx) => idx,
            None => match self.by_name.get(token).map(Vec::as_slice) {
                Some([idx]) => *idx,
                Some(matches) if !matches.is_empty() => {
                    return Err(ResolveError::AmbiguousReference {
                        task_id: task_id.clone(),
                        reference: token.to_string(),
                        candidates: matches.iter().map(|&m| self.ids[m].clone()).collect(),
                    });
                }
                _ => {
                    return Err(ResolveError::UnknownDependency {
                        task_id: task_id.clone(),
                        referenced_id: token.to_string(),
                    });
                }
            },
        };

        if target == owner {
            return Err(ResolveError::SelfDependency {
                task_id: task_id.clone(),
            });
        }
        Ok(target)
    }
}

/// Brings a record's timing into the shape the forward pass expects.
fn normalize_timing(record: &mut RawTaskRecord, id: &str, config: &PlanConfig, warnings: &mut Warnings) {
    if !record.is_milestone && record.duration_days == Some(0) {
        warnings.push(
            record.line,
            WarningKind::ZeroDurationPromoted,
            format!("task '{id}' has a zero duration and is treated as a milestone"),
        );
        record.is_milestone = true;
    }

    if record.is_milestone {
        record.duration_days = Some(0);
        match (record.start, record.end) {
            (None, Some(end)) => {
                record.start = Some(end);
                record.end = None;
            }
            (Some(start), Some(end)) => {
                if start != end {
                    warnings.push(
                        record.line,
                        WarningKind::IgnoredAttribute,
                        format!("milestone '{id}' ignores its end date {end}"),
                    );
                }
                record.end = None;
            }
            _ => {}
        }
        return;
    }

    apply_default_duration(record, config.default_duration_days, warnings);
}

/// Resolves dependency tokens to task ids and normalizes timing.
pub fn resolve_records(
    mut records: Vec<RawTaskRecord>,
    config: &PlanConfig,
    warnings: &mut Warnings,
) -> Result<Vec<Task>> {
    for record in &records {
        validate_record(record)?;
    }
    validate_record_collection(&records)?;

    let ids = assign_ids(&records);

    let mut resolved_deps: Vec<Vec<String>> = Vec::with_capacity(records.len());
    {
        let index = ReferenceIndex::new(&ids, &records);
        for (idx, record) in records.iter().enumerate() {
            let mut deps: Vec<String> = Vec::with_capacity(record.dependencies.len());
            for token in &record.dependencies {
                let target = index.lookup(idx, token)?;
                let target_id = &ids[target];
                if !deps.contains(target_id) {
                    deps.push(target_id.clone());
                }
            }
            resolved_deps.push(deps);
        }
    }

    let mut tasks = Vec::with_capacity(records.len());
    for ((mut record, id), dependencies) in records.drain(..).zip(ids).zip(resolved_deps) {
        normalize_timing(&mut record, &id, config, warnings);

        let mut task = Task::new(id, record.name, record.duration_days.unwrap_or(0));
        task.section = record.section;
        task.explicit_start = record.start;
        task.explicit_end = record.end;
        task.dependencies = dependencies;
        task.is_milestone = record.is_milestone;
        task.status = record.status;
        task.flagged_critical = record.flagged_critical;
        task.line = record.line;
        tasks.push(task);
    }

    tracing::debug!(tasks = tasks.len(), "resolved task references");
    Ok(tasks)
}
