use clap::Parser;
use ladder_etl::adapters::SAMPLE_FILES;
use ladder_etl::utils::error::{EtlError, ErrorSeverity};
use ladder_etl::utils::{logger, validation::Validate};
use ladder_etl::{
    download_sample_data, CliConfig, EtlEngine, HttpFetcher, LadderPipeline, LocalStorage,
};

fn exit_code(e: &EtlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(e: &EtlError) {
    tracing::error!(
        "❌ Ladder ETL failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let code = exit_code(e);
    if code > 0 {
        std::process::exit(code);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting ladder-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let fetcher = match HttpFetcher::new(&config.base_url) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            report_failure(&e);
            return Ok(());
        }
    };
    let data = LocalStorage::new(config.data_dir.clone());

    if config.fetch_only {
        match download_sample_data(&fetcher, &data, &SAMPLE_FILES).await {
            Ok(written) => {
                for (name, bytes) in written {
                    println!("Wrote {} bytes to {}", bytes, name);
                }
            }
            Err(e) => report_failure(&e),
        }
        return Ok(());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let display = config.display_options();
    let output = LocalStorage::new(config.output_path.clone());
    let pipeline = LadderPipeline::new(data, output, fetcher, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(run) => {
            tracing::info!("✅ Ladder computed for {} ({})", run.ladder.season, run.ladder.rounds);
            println!("{}", run.ladder.render(&display));
            for path in &run.outputs {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}
