use audcast_sync::utils::{logger, output};
use audcast_sync::{
    AudcastPipeline, CliConfig, LocalFs, LogFormat, SyncEngine, SyncError, SystemSpaceProbe,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    let verbose = config.verbose || config.debug;
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting audcast-sync CLI");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.load_file().and_then(|file| config.resolve(file.as_ref())) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if config.monitor {
        tracing::info!("🔍 Disk monitoring enabled");
    }

    let pipeline = AudcastPipeline::new(LocalFs::new(), SystemSpaceProbe::new(), settings);
    let engine = SyncEngine::new_with_monitoring(pipeline, config.monitor);

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    if config.json {
        match output::render_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(&e),
        }
    } else {
        for line in output::action_lines(&report) {
            println!("{}", line);
        }
        println!("✅ {}", report.summary());
    }

    Ok(())
}

fn exit_with(e: &SyncError) -> ! {
    tracing::error!(
        "❌ Sync failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}
