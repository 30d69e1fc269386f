use crate::error::{ParseError, ResolveError};
use crate::task::RawTaskRecord;
use crate::warning::{WarningKind, Warnings};
use std::collections::HashSet;

pub fn validate_record(record: &RawTaskRecord) -> Result<(), ParseError> {
    let conflict = |reason: String| ParseError::ConflictingAttributes {
        line: record.line,
        task: record.label().to_string(),
        reason,
    };

    if let (Some(start), Some(end)) = (record.start, record.end) {
        if record.duration_days.is_some() && !record.is_milestone {
            return Err(conflict(
                "start date, end date and duration given together".to_string(),
            ));
        }
        if end < start {
            return Err(conflict(format!("end {end} is before start {start}")));
        }
    }

    // a pinned end already fixes the length; a milestone's 0d is its marker
    let has_length = record.duration_days.is_some_and(|days| days > 0);
    if record.end.is_some() && has_length && !record.is_milestone {
        return Err(conflict("end date and duration given together".to_string()));
    }

    Ok(())
}

/// Explicit ids must be unique across the batch.
pub fn validate_record_collection(records: &[RawTaskRecord]) -> Result<(), ResolveError> {
    let mut seen_ids = HashSet::with_capacity(records.len());
    for record in records {
        if let Some(id) = &record.id {
            if !seen_ids.insert(id.as_str()) {
                return Err(ResolveError::DuplicateTaskId {
                    task_id: id.clone(),
                    line: record.line,
                });
            }
        }
    }
    Ok(())
}

/// Gives a record without duration the default one.
///
/// Only a record with no date and no dependency is warned about: `after x`
/// alone or a lone start date are ordinary ways to write a default-length task.
pub fn apply_default_duration(
    record: &mut RawTaskRecord,
    default_days: u32,
    warnings: &mut Warnings,
) {
    if record.duration_days.is_some() || (record.start.is_some() && record.end.is_some()) {
        return;
    }
    if !record.has_timing() {
        warnings.push(
            record.line,
            WarningKind::MissingTiming,
            format!(
                "task '{}' has no duration, date or dependency; assumed a default duration of {default_days} day(s), which is probably not what was meant",
                record.label()
            ),
        );
    }
    if record.end.is_none() {
        record.duration_days = Some(default_days);
    }
}
