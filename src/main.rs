use anyhow::Context;
use clap::Parser;
use vacancy_stats::utils::error::ErrorSeverity;
use vacancy_stats::utils::{logger, validation::Validate};
use vacancy_stats::{
    render_table, run_enabled_sources, CliConfig, ConsoleResolver, LocalStorage, ReportExporter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在也沒關係
    let _ = dotenvy::dotenv();
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting vacancy-stats");

    let config = cli
        .load_run_config()
        .with_context(|| format!("failed to load config {:?}", cli.config))?;
    if cli.verbose {
        tracing::debug!("Run config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let outcomes = run_enabled_sources(&config, ConsoleResolver::stdin()).await;

    let exporter = config
        .run
        .output_path
        .clone()
        .map(|path| ReportExporter::new(LocalStorage::new(path)));

    let mut worst: Option<ErrorSeverity> = None;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                println!("{}", render_table(&outcome.title, result));
                if let Some(exporter) = &exporter {
                    exporter
                        .export(result)
                        .await
                        .with_context(|| format!("failed to export {}", result.source))?;
                }
            }
            Err(e) => {
                tracing::error!(
                    "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
                    outcome.title,
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}: {}", outcome.title, e.user_friendly_message());
                worst = worst.max(Some(e.severity()));
            }
        }
    }

    // 任一來源失敗就以非零結束，結果不當作完整統計
    let exit_code = match worst {
        None | Some(ErrorSeverity::Low) => 0,
        Some(ErrorSeverity::Medium) => 2,
        Some(ErrorSeverity::High) => 1,
        Some(ErrorSeverity::Critical) => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
