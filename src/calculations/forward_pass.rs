use crate::calendar::WorkCalendar;
use crate::error::ResolveError;
use crate::graph::ScheduleDag;
use crate::task::Task;
use crate::warning::{WarningKind, Warnings};
use chrono::NaiveDate;

/// Dates the forward pass settled on for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Available days occupied; differs from the declared duration when the end is pinned.
    pub duration_days: u32,
}

pub struct ForwardPass<'a> {
    tasks: &'a [Task],
    dag: &'a ScheduleDag,
    calendar: &'a WorkCalendar,
    allow_override: bool,
}

impl<'a> ForwardPass<'a> {
    pub fn new(tasks: &'a [Task], dag: &'a ScheduleDag, calendar: &'a WorkCalendar) -> Self {
        Self {
            tasks,
            dag,
            calendar,
            allow_override: false,
        }
    }

    pub fn with_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    /// Earliest day a successor of `dates` may start. Milestones release on their own date.
    fn release_date(&self, pred: &Task, dates: &ScheduledDates) -> Option<NaiveDate> {
        if pred.is_milestone {
            self.calendar.first_available_on_or_after(dates.end)
        } else {
            self.calendar.next_available(dates.end)
        }
    }

    /// Dates for every task, indexed like the task slice.
    pub fn execute(
        &self,
        project_start: NaiveDate,
        warnings: &mut Warnings,
    ) -> Result<Vec<ScheduledDates>, ResolveError> {
        let order = self.dag.stable_topological_order()?;
        let mut scheduled: Vec<Option<ScheduledDates>> = vec![None; self.tasks.len()];

        for idx in order {
            let task = &self.tasks[idx];
            let out_of_range = || ResolveError::DateOutOfRange {
                task_id: task.id.clone(),
            };

            // Topological order guarantees every dependency is already dated
            let mut earliest: Option<NaiveDate> = None;
            for &dep in self.dag.dependencies(idx) {
                if let Some(dates) = scheduled[dep] {
                    let release = self
                        .release_date(&self.tasks[dep], &dates)
                        .ok_or_else(out_of_range)?;
                    earliest = earliest.max(Some(release));
                }
            }
            let has_dependencies = earliest.is_some();
            let earliest = match earliest {
                Some(date) => date,
                None => self
                    .calendar
                    .first_available_on_or_after(project_start)
                    .ok_or_else(out_of_range)?,
            };

            let start = match task.explicit_start {
                Some(explicit) if has_dependencies && explicit < earliest => {
                    if !self.allow_override {
                        return Err(ResolveError::ScheduleConflict {
                            task_id: task.id.clone(),
                            explicit,
                            earliest,
                        });
                    }
                    warnings.push(
                        task.line,
                        WarningKind::ScheduleOverride,
                        format!(
                            "task '{}' starts on {explicit}, before its dependencies allow ({earliest})",
                            task.id
                        ),
                    );
                    explicit
                }
                Some(explicit) => explicit,
                None => earliest,
            };

            let dates = match task.explicit_end {
                Some(end) if !task.is_milestone => {
                    if end < start {
                        return Err(ResolveError::ScheduleConflict {
                            task_id: task.id.clone(),
                            explicit: end,
                            earliest: start,
                        });
                    }
                    let days = self.calendar.count_available_days(start, end);
                    ScheduledDates {
                        start,
                        end,
                        duration_days: u32::try_from(days).unwrap_or(u32::MAX),
                    }
                }
                _ if task.is_milestone => ScheduledDates {
                    start,
                    end: start,
                    duration_days: 0,
                },
                _ => ScheduledDates {
                    start,
                    end: self
                        .calendar
                        .finish_date(start, task.duration_days)
                        .ok_or_else(out_of_range)?,
                    duration_days: task.duration_days,
                },
            };
            scheduled[idx] = Some(dates);
        }

        Ok(scheduled.into_iter().flatten().collect())
    }
}
