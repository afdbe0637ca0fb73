use anyhow::Context;
use clap::Parser;
use ladder_etl::core::pipeline::LadderRequest;
use ladder_etl::core::ConfigProvider;
use ladder_etl::utils::error::ErrorSeverity;
use ladder_etl::utils::{logger, validation::Validate};
use ladder_etl::{EtlEngine, HttpFetcher, LadderPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-ladder")]
#[command(about = "Season ladder driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "ladder-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the season from the config file
    #[arg(long)]
    season: Option<i32>,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose, config.log_format());

    tracing::info!("🚀 Starting TOML-based ladder tool");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 命令列覆蓋設定
    if let Some(season) = args.season {
        config.ladder.season = season;
        tracing::info!("🔧 Season overridden to: {}", season);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let display = config.display_options();

    let fetcher = HttpFetcher::new(config.base_url())?;
    let data = LocalStorage::new(config.data_dir().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = LadderPipeline::new(data, output, fetcher, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(run) => {
            println!("{}", run.ladder.render(&display));
            for path in &run.outputs {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Ladder ETL failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}/{}", config.data_dir(), config.input_name());
    println!("  Source: {}", config.base_url());
    println!("  Season: {}", config.season());
    println!("  Rounds: {} ({:?})", config.round_range(), config.round_range().ordering);
    println!("  Output: {}", config.output_path());
    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let request = LadderRequest::from_config(config)?;

    println!("🔍 Dry Run Analysis:");
    println!("  Layout: {}", request.layout);
    println!("  Season filter: {}", request.season);
    println!("  Round filter: {} ({:?})", request.rounds, request.rounds.ordering);
    println!("  Percentage policy: {:?}", request.policy);

    let formats: Vec<&str> = config.output_formats().iter().map(|f| f.extension()).collect();
    if formats.is_empty() {
        println!("  Outputs: none (table only)");
    } else {
        println!("  Outputs: {}", formats.join(", "));
        if config.compress_output() {
            println!("  Compression: ZIP bundle");
        }
    }

    let display = config.display_options();
    match display.max_rows {
        Some(rows) => println!("  Display: {} rows, {} columns", rows, display.width),
        None => println!("  Display: all rows, {} columns", display.width),
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
