use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use csvgen_cli::job::JobConfig;
use csvgen_core::{GeneratorOptions, LineTerminator};

use crate::cli::{CheckArgs, GenerateArgs};

/// Outcome of a `generate` run.
#[derive(Debug)]
pub struct GenerateSummary {
    pub records: usize,
    pub columns: usize,
    pub bytes: usize,
    pub output: Option<PathBuf>,
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateSummary> {
    let span = info_span!("generate", job = %args.job.display());
    let _guard = span.enter();

    let job = load_job(&args.job)?;
    let options = effective_options(&job.options, args);
    let generator = job.build_generator(options)?;
    let columns = generator.header_labels()?.len();
    let csv = generator.generate()?;

    match &args.output {
        Some(path) => fs::write(path, &csv)
            .with_context(|| format!("write output {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(csv.as_bytes()).context("write to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }

    let summary = GenerateSummary {
        records: generator.records().len(),
        columns,
        bytes: csv.len(),
        output: args.output.clone(),
    };
    info!(
        records = summary.records,
        columns = summary.columns,
        bytes = summary.bytes,
        "generated CSV"
    );
    Ok(summary)
}

/// Renders the job in memory and prints its visible column labels.
pub fn run_check(args: &CheckArgs) -> Result<()> {
    let span = info_span!("check", job = %args.job.display());
    let _guard = span.enter();

    let labels = check_job(&args.job)?;
    let mut stdout = io::stdout().lock();
    for label in &labels {
        writeln!(stdout, "{label}")?;
    }
    Ok(())
}

/// Header labels of the job's visible columns, once the job renders cleanly.
fn check_job(path: &Path) -> Result<Vec<String>> {
    let job = load_job(path)?;
    let generator = job.build_generator(job.options.clone())?;
    // Rendering catches kind drift and patterns the data cannot satisfy.
    generator.generate()?;
    info!(records = generator.records().len(), "job is valid");
    Ok(generator.header_labels()?)
}

pub fn print_summary(summary: &GenerateSummary) {
    if let Some(path) = &summary.output {
        eprintln!(
            "Wrote {} records x {} columns ({} bytes) to {}",
            summary.records,
            summary.columns,
            summary.bytes,
            path.display()
        );
    }
}

fn load_job(path: &Path) -> Result<JobConfig> {
    Ok(JobConfig::from_path(path)?)
}

/// Command-line flags override the job's layout options.
fn effective_options(job: &GeneratorOptions, args: &GenerateArgs) -> GeneratorOptions {
    let mut options = job.clone();
    if args.crlf {
        options.line_terminator = LineTerminator::CrLf;
    }
    if args.no_trailing_separator {
        options.trailing_separator = false;
    }
    options
}
