//! Implementation of the `run` subcommand.

use crate::cli::RunArgs;
use crate::config::build_core_config;
use console::style;
use log::info;
use recast_core::{CoreError, CoreResult, RunSummary, format_duration, run_pipeline};

/// Executes one batch run and prints the summary.
///
/// # Errors
///
/// Returns only fatal pipeline errors; per-file failures are reflected in
/// the summary and the persisted error report, not the exit status.
pub fn execute(args: RunArgs) -> CoreResult<RunSummary> {
    let input_root = args.input_root.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "Invalid input path '{}': {}",
            args.input_root.display(),
            e
        ))
    })?;

    let mut config = build_core_config(&args);
    config.input_root = input_root;

    info!("Input root:  {}", config.input_root.display());
    info!("Output root: {}", config.output_root.display());
    info!("Concurrency: {}", config.concurrency);

    let summary = run_pipeline(&config)?;
    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("=== Run Summary ===").cyan().bold());
    println!("  Discovered: {}", summary.discovered);
    println!("  Converted:  {}", style(summary.converted).green());
    println!("  Skipped:    {}", summary.skipped);
    if summary.errored > 0 {
        println!("  Errored:    {}", style(summary.errored).red());
        println!(
            "  {} stage failures recorded in {}",
            summary.error_count,
            summary.report_path.display()
        );
    } else {
        println!("  Errored:    0");
    }
    println!("  Elapsed:    {}", format_duration(summary.elapsed.as_secs()));
}
