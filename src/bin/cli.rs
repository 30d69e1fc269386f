use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use gantt_schedule::{
    CalendarMode, DslSource, PlanBuilder, PlanConfig, PlanOutcome, ProjectPlan, load_config,
    load_records_from_json, save_plan_to_csv, save_plan_to_json,
};
use polars::prelude::{AnyValue, Column, DataFrame};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gantt")]
#[command(about = "Parse gantt text and compute a dated project plan", long_about = None)]
struct Cli {
    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PlanOptions {
    /// TOML file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Project start (YYYY-MM-DD); defaults to today
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Skip weekends when advancing dates
    #[arg(long)]
    business_days: bool,
    /// Let explicit start dates win over dependencies
    #[arg(long)]
    allow_override: bool,
    /// Treat inputs as JSON task records instead of gantt text
    #[arg(long)]
    records: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a plan from one input and report it
    Build {
        file: PathBuf,
        #[command(flatten)]
        options: PlanOptions,
        /// Write the plan as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the plan as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print every task as a table
        #[arg(long)]
        table: bool,
    },
    /// Validate several inputs in parallel
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        options: PlanOptions,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "gantt_schedule=debug"
    } else {
        "gantt_schedule=error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn plan_config(options: &PlanOptions) -> Result<PlanConfig, String> {
    let mut config = match &options.config {
        Some(path) => load_config(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => PlanConfig::default(),
    };
    if let Some(start) = options.start {
        config = config.with_project_start(start);
    }
    if options.business_days {
        config = config.with_calendar_mode(CalendarMode::BusinessDay);
    }
    if options.allow_override {
        config = config.with_schedule_override(true);
    }
    Ok(config)
}

fn build_file(path: &Path, records: bool, builder: &PlanBuilder) -> Result<PlanOutcome, String> {
    let outcome = if records {
        let batch = load_records_from_json(path).map_err(|e| e.to_string())?;
        builder.build(&batch)
    } else {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        builder.build(&DslSource::new(&text))
    };
    outcome.map_err(|e| e.to_string())
}

fn cell_text(col: &Column, row_idx: usize) -> String {
    match col.get(row_idx) {
        Ok(AnyValue::Null) | Err(_) => String::new(),
        Ok(AnyValue::String(s)) => s.to_string(),
        Ok(AnyValue::List(inner)) => match inner.str() {
            Ok(ca) => ca.into_iter().flatten().collect::<Vec<_>>().join(","),
            Err(_) => inner.to_string(),
        },
        Ok(av) => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| columns.iter().map(|col| cell_text(col, row_idx)).collect())
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, row: &[String]| {
        out.push('|');
        for (ci, s) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(s);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(s.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_plan(plan: &ProjectPlan, table: bool) -> Result<(), String> {
    println!("{}", plan.metadata().display_title());
    println!("{}", plan.summary().to_cli_summary());
    if table {
        let df = plan.to_dataframe().map_err(|e| e.to_string())?;
        print!("{}", render_df_as_text_table(&df));
    }
    Ok(())
}

fn run_build(
    file: &Path,
    options: &PlanOptions,
    json: Option<&Path>,
    csv: Option<&Path>,
    table: bool,
) -> Result<(), String> {
    let builder = PlanBuilder::new(plan_config(options)?);
    let outcome = build_file(file, options.records, &builder)?;
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    print_plan(&outcome.plan, table)?;
    if let Some(path) = json {
        save_plan_to_json(&outcome.plan, path).map_err(|e| e.to_string())?;
    }
    if let Some(path) = csv {
        save_plan_to_csv(&outcome.plan, path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn run_check(files: &[PathBuf], options: &PlanOptions) -> Result<bool, String> {
    let builder = PlanBuilder::new(plan_config(options)?);
    let results: Vec<(String, Result<PlanOutcome, String>)> = files
        .par_iter()
        .map(|path| {
            (
                path.display().to_string(),
                build_file(path, options.records, &builder),
            )
        })
        .collect();

    let mut all_ok = true;
    for (name, result) in results {
        match result {
            Ok(outcome) => {
                println!(
                    "ok {name}: {} ({} warnings)",
                    outcome.plan.summary().to_cli_summary(),
                    outcome.warnings.len()
                );
            }
            Err(err) => {
                all_ok = false;
                println!("error {name}: {err}");
            }
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Build {
            file,
            options,
            json,
            csv,
            table,
        } => run_build(file, options, json.as_deref(), csv.as_deref(), *table).map(|_| true),
        Commands::Check { files, options } => run_check(files, options),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
