//! PDF Footer Remover - CLI Interface
//!
//! Command-line shell over the footer redaction library: takes one or
//! more PDFs, strips the configured footer band from every page and
//! writes the cleaned files (plus optional page previews) to an output
//! directory.

use clap::{Arg, Command, ValueEnum};
use defooter::config::{FillColor, ProcessingConfig, MAX_FOOTER_HEIGHT, MIN_FOOTER_HEIGHT};
use defooter::processor::BatchProcessor;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let log_level = matches.get_one::<LogLevel>("verbose").unwrap_or(&LogLevel::Info);
    init_logging(log_level, matches.get_flag("quiet"));

    info!("🚀 PDF Footer Remover - Starting...");

    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("input")
        .unwrap()
        .map(PathBuf::from)
        .collect();
    let output_dir = PathBuf::from(matches.get_one::<String>("output-dir").unwrap());
    let force_overwrite = matches.get_flag("force");
    let dry_run = matches.get_flag("dry-run");

    // Validate input files exist before doing anything
    for input in &inputs {
        if !input.exists() {
            error!("❌ Input file does not exist: {}", input.display());
            process::exit(1);
        }
    }

    // Load configuration, then apply CLI overrides
    let mut config = if let Some(config_path) = matches.get_one::<String>("config") {
        match load_config_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("❌ Failed to load config file: {}", e);
                process::exit(1);
            }
        }
    } else {
        ProcessingConfig::default()
    };

    if let Some(height) = matches.get_one::<f64>("height") {
        config.redaction.footer_height = *height;
    }
    if let Some(fill) = matches.get_one::<String>("fill") {
        match FillColor::from_hex(fill) {
            Ok(color) => config.redaction.fill = color,
            Err(e) => {
                error!("❌ {}", e);
                process::exit(1);
            }
        }
    }
    if matches.get_flag("previews") {
        config.previews.enabled = true;
    }
    if let Some(pages) = matches.get_one::<usize>("preview-pages") {
        config.previews.max_pages = *pages;
    }

    if let Err(e) = config.validate() {
        error!("❌ {}", e);
        process::exit(1);
    }

    // Refuse to clobber existing outputs unless forced
    if !force_overwrite {
        for input in &inputs {
            if let Some(name) = input.file_name().and_then(|n| n.to_str()) {
                let output = output_dir.join(format!("footer_removed_{}", name));
                if output.exists() {
                    error!("❌ Output file already exists: {}", output.display());
                    error!("   Use --force to overwrite existing files");
                    process::exit(1);
                }
            }
        }
    }

    display_config_summary(&config, &inputs, &output_dir);

    if dry_run {
        info!("🔍 Dry run mode - no files will be modified");
        info!("✅ Configuration validated successfully");
        return;
    }

    let processor = BatchProcessor::new(config);
    let summary = match processor.execute(inputs, output_dir).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("❌ Batch execution failed: {}", e);
            process::exit(1);
        }
    };

    for report in &summary.reports {
        info!(
            "✅ {} → {} ({} pages, {} redacted, {} previews) in {:.2?}",
            report.original_name,
            report.output_path.display(),
            report.pages_total,
            report.pages_redacted,
            report.preview_paths.len(),
            report.duration
        );
    }
    for failure in &summary.failures {
        error!("❌ {}: {}", failure.input.display(), failure.error);
    }

    info!(
        "📊 Batch {}: {} succeeded, {} failed in {:.2?}",
        summary.run_id,
        summary.reports.len(),
        summary.failures.len(),
        summary.duration
    );

    if !summary.all_succeeded() {
        process::exit(1);
    }

    info!("🎉 Footer removal completed successfully!");
}

fn build_cli() -> Command {
    Command::new("PDF Footer Remover")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Removes footer text from the bottom of every page in your PDF(s)")
        .long_about(
            "Strips a fixed-height band from the bottom of every page of the given \
             PDF files. Content inside the band is permanently removed (not just \
             covered) and replaced with an opaque fill. Tune --height until the \
             whole footer disappears; 60-90 points covers most footers.",
        )
        // Input/Output
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Input PDF file path(s)")
                .num_args(1..)
                .required(true),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for cleaned files and previews")
                .default_value("."),
        )
        // Configuration
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (JSON/YAML)"),
        )
        .arg(
            Arg::new("height")
                .short('H')
                .long("height")
                .value_name("POINTS")
                .value_parser(clap::value_parser!(f64))
                .help(format!(
                    "Height from bottom to remove, in points ({}-{}); 1cm is about 28 points",
                    MIN_FOOTER_HEIGHT, MAX_FOOTER_HEIGHT
                )),
        )
        .arg(
            Arg::new("fill")
                .long("fill")
                .value_name("COLOR")
                .help("Fill color for the redacted band as #RRGGBB (default white)"),
        )
        // Previews
        .arg(
            Arg::new("previews")
                .short('p')
                .long("previews")
                .action(clap::ArgAction::SetTrue)
                .help("Render PNG previews of the first pages of each cleaned PDF"),
        )
        .arg(
            Arg::new("preview-pages")
                .long("preview-pages")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Maximum preview pages per document (default 3)")
                .requires("previews"),
        )
        // Advanced options
        .arg(
            Arg::new("force")
                .long("force")
                .action(clap::ArgAction::SetTrue)
                .help("Force overwrite existing output files"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(clap::ArgAction::SetTrue)
                .help("Show what would be done without making changes"),
        )
        // Logging
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .value_parser(clap::value_parser!(LogLevel))
                .default_value("info")
                .help("Set logging verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Suppress all output except errors"),
        )
}

fn init_logging(level: &LogLevel, quiet: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let filter_level = if quiet {
        "error"
    } else {
        match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(format!("defooter={}", filter_level)))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn load_config_file(path: &str) -> Result<ProcessingConfig, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    // Try JSON first, then YAML
    serde_json::from_str(&content)
        .or_else(|_| serde_yaml::from_str(&content))
        .map_err(|e: serde_yaml::Error| format!("Config parsing error: {}", e))
}

fn display_config_summary(config: &ProcessingConfig, inputs: &[PathBuf], output_dir: &PathBuf) {
    info!("📋 Configuration Summary:");
    info!("   Inputs: {} file(s)", inputs.len());
    info!("   Output Dir: {}", output_dir.display());
    info!("   Footer Height: {} points", config.redaction.footer_height);
    info!(
        "   Fill: rgb({:.2}, {:.2}, {:.2})",
        config.redaction.fill.r, config.redaction.fill.g, config.redaction.fill.b
    );

    if config.previews.enabled {
        info!(
            "   Previews: up to {} page(s) at {} dpi",
            config.previews.max_pages, config.previews.dpi
        );
        if cfg!(not(feature = "preview")) {
            warn!("   Previews requested but this build has no preview support");
        }
    }
}
