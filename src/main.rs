use clap::Parser;
use std::sync::Arc;
use translation_bot::app::{self, AppState};
use translation_bot::utils::error::ErrorSeverity;
use translation_bot::utils::{logger, validation::Validate};
use translation_bot::{BotConfig, BotError, CliArgs, LanguageCatalog, UpstreamClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting translation-bot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match BotConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }
    if args.verbose {
        tracing::debug!(
            "Server: {}:{}, timeout: {}s",
            config.server.host,
            config.server.port,
            config.api.timeout_seconds
        );
    }

    let addr = match config.addr() {
        Ok(addr) => addr,
        Err(e) => exit_with(&e),
    };
    let config = Arc::new(config);

    let upstream = UpstreamClient::new();
    let catalog = Arc::new(LanguageCatalog::new(upstream.clone()));

    if config.bot.preload {
        let config = Arc::clone(&config);
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move {
            catalog.preload(config.as_ref()).await;
        });
    }

    let state = AppState::with_catalog(Arc::clone(&config), catalog, upstream);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("👂 Listening on {}", addr);

    app::serve(listener, state).await?;

    tracing::info!("✅ translation-bot v{} stopped", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn exit_with(e: &BotError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
