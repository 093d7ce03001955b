//! The `scour clean` command: batch cleaning with progress and a report.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use scour_core::{
    discover, Config, OutputFormat, OutputWriter, ProcessingResult, ProcessingStats, Processor,
};

/// Arguments for the `clean` command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Image files or directories to clean
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Destination directory for cleaned files (defaults to the config
    /// value, then the Downloads directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write the batch report to a file instead of stdout
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Number of parallel workers (overrides the config value)
    #[arg(short, long)]
    pub parallel: Option<usize>,
}

/// Execute the clean command.
pub async fn execute(args: CleanArgs, mut config: Config) -> anyhow::Result<()> {
    let Some(format) = OutputFormat::parse(&args.format) else {
        anyhow::bail!("unknown report format {:?} (expected json or jsonl)", args.format);
    };
    if let Some(dir) = &args.output_dir {
        config.general.output_dir = Some(dir.clone());
    }
    if let Some(parallel) = args.parallel {
        anyhow::ensure!(parallel > 0, "--parallel must be > 0");
        config.processing.parallel_workers = parallel;
    }

    let inputs = discover(&args.paths);
    if inputs.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.paths);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to clean", inputs.len());

    let start_time = std::time::Instant::now();
    let processor = Processor::new(&config);
    let mut handle = processor.submit(inputs);

    let progress = create_progress_bar(handle.total() as u64);
    let mut slots: Vec<Option<ProcessingResult>> = Vec::new();
    slots.resize_with(handle.total(), || None);

    loop {
        tokio::select! {
            event = handle.next_event() => {
                let Some(event) = event else { break };
                if let Some(message) = event.result.status.message() {
                    progress.set_message(format!("{}: {}", event.result.input.display(), message));
                } else {
                    progress.set_message(event.result.input.display().to_string());
                }
                progress.inc(1);
                slots[event.index] = Some(event.result);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted; waiting for running items to finish");
                handle.cancel();
            }
        }
    }
    progress.finish_and_clear();

    // Cancellation leaves unstarted slots empty; input order is kept.
    let results: Vec<ProcessingResult> = slots.into_iter().flatten().collect();
    let stats = ProcessingStats::tally(&results, start_time.elapsed());

    for result in results.iter().filter(|r| !r.status.is_success()) {
        if let Some(message) = result.status.message() {
            eprintln!("  {} - {}", result.input.display(), message);
        }
    }

    if let Some(report_path) = &args.report {
        let file = File::create(report_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), format, config.output.pretty);
        writer.write_all(&results)?;
        writer.flush()?;
        tracing::info!("Report written to {:?}", report_path);
    } else {
        let mut writer = OutputWriter::new(std::io::stdout().lock(), format, true);
        writer.write_all(&results)?;
        writer.flush()?;
    }

    print_summary(&stats);

    if stats.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Create a progress bar for batch cleaning.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch cleaning.
fn print_summary(stats: &ProcessingStats) {
    let rate = if stats.total_seconds > 0.0 {
        stats.succeeded as f64 / stats.total_seconds
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Cleaned:      {:>8}", stats.succeeded);
    if stats.unsupported > 0 {
        eprintln!("    Unsupported:  {:>8}", stats.unsupported);
    }
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total());
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
