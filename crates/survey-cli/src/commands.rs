use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info_span;

use survey_cli::batch::{BatchResult, fold_subjects, read_observations};
use survey_cli::summary::{failure_table, plan_rows, plan_table, scheme_table};
use survey_model::CodingPlan;
use survey_standards::{PipelineConfig, PipelineConfiguration};

use crate::cli::{ConfigArgs, FoldArgs};

fn load_pipeline(path: &Path) -> Result<PipelineConfiguration> {
    let config = PipelineConfig::load(path)
        .with_context(|| format!("load pipeline config {}", path.display()))?;
    let _span = info_span!("pipeline", name = %config.pipeline_name).entered();
    PipelineConfiguration::initialize(&config).context("initialize pipeline configuration")
}

pub fn run_plans(args: &ConfigArgs) -> Result<()> {
    let pipeline = load_pipeline(&args.config)?;
    let rows = plan_rows(pipeline.all_plans());
    println!("Pipeline: {}", pipeline.pipeline_name());
    println!("{}", plan_table(&rows));
    Ok(())
}

pub fn run_verify(args: &ConfigArgs) -> Result<()> {
    let pipeline = load_pipeline(&args.config)?;
    println!("Pipeline: {}", pipeline.pipeline_name());
    println!("{}", scheme_table(pipeline.schemes().summaries()));
    println!(
        "{} schemes, {} plans OK",
        pipeline.schemes().len(),
        pipeline.all_plans().count()
    );
    Ok(())
}

pub fn run_fold(args: &FoldArgs) -> Result<BatchResult> {
    let pipeline = load_pipeline(&args.config.config)?;
    let plans: Vec<CodingPlan> = pipeline.all_plans().cloned().collect();
    let subjects = read_observations(&args.observations)?;
    let result = fold_subjects(&plans, &subjects);

    let folded = result.folded();
    let json = if args.pretty {
        serde_json::to_string_pretty(&folded)
    } else {
        serde_json::to_string(&folded)
    }
    .context("serialize folded subjects")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("write folded subjects")?;

    if result.has_errors() {
        eprintln!(
            "{} of {} subjects had fields that could not be folded:",
            result.failed_subjects(),
            result.outcomes.len()
        );
        eprintln!("{}", failure_table(&result.outcomes));
    }
    Ok(result)
}
