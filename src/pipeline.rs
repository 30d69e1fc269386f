use crate::calculations::{CriticalPath, ForwardPass};
use crate::calendar::WorkCalendar;
use crate::config::PlanConfig;
use crate::error::{ResolveError, Result};
use crate::graph::ScheduleDag;
use crate::metadata::PlanMetadata;
use crate::plan::ProjectPlan;
use crate::resolve::resolve_records;
use crate::source::{DslSource, TaskRecordSource};
use crate::task::RawTaskRecord;
use crate::warning::Warning;

#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: ProjectPlan,
    pub warnings: Vec<Warning>,
}

/// Runs a record source through resolution, scheduling and assembly.
#[derive(Debug, Clone, Default)]
pub struct PlanBuilder {
    config: PlanConfig,
}

impl PlanBuilder {
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn build<S: TaskRecordSource + ?Sized>(&self, source: &S) -> Result<PlanOutcome> {
        let config = &self.config;
        let output = source.records(config)?;
        let mut warnings = output.warnings;

        let mut tasks = resolve_records(output.records, config, &mut warnings)?;

        let calendar_mode = output.calendar_mode.unwrap_or(config.calendar_mode);
        let calendar = WorkCalendar::new(calendar_mode);
        let project_start = config.resolved_project_start();

        let dag = ScheduleDag::build(&tasks)?;
        if let Some(cycle) = dag.find_cycle() {
            return Err(ResolveError::CyclicDependency { cycle }.into());
        }

        let dates = ForwardPass::new(&tasks, &dag, &calendar)
            .with_override(config.allow_schedule_override)
            .execute(project_start, &mut warnings)?;
        for (task, scheduled) in tasks.iter_mut().zip(&dates) {
            task.computed_start = Some(scheduled.start);
            task.computed_end = Some(scheduled.end);
            task.duration_days = scheduled.duration_days;
        }

        let durations: Vec<u32> = dates.iter().map(|d| d.duration_days).collect();
        let critical = CriticalPath::compute(&dag, &durations)?;
        for (task, is_critical) in tasks.iter_mut().zip(critical.critical) {
            task.is_critical = is_critical;
        }
        tracing::debug!(
            mode = %calendar_mode,
            length_days = critical.length_days,
            "scheduled tasks"
        );

        let mut metadata = PlanMetadata::new(project_start)
            .with_title(output.title)
            .with_calendar_mode(calendar_mode)
            .with_sections(output.sections);
        if let Some(format) = output.date_format {
            metadata = metadata.with_date_format(format);
        }

        Ok(PlanOutcome {
            plan: ProjectPlan::assemble(metadata, tasks, critical.length_days),
            warnings: warnings.into_vec(),
        })
    }
}

pub fn build_plan_from_dsl(text: &str, config: &PlanConfig) -> Result<PlanOutcome> {
    PlanBuilder::new(config.clone()).build(&DslSource::new(text))
}

pub fn build_plan_from_records(
    records: Vec<RawTaskRecord>,
    config: &PlanConfig,
) -> Result<PlanOutcome> {
    PlanBuilder::new(config.clone()).build(records.as_slice())
}
