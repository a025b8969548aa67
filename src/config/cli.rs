use crate::config::toml_config::{BotConfig, DEFAULT_CONFIG_FILE};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "translation-bot")]
#[command(version)]
#[command(about = "Chat bot translating messages that carry a language direction like en-ru")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Override server.host from config
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port from config
    #[arg(long)]
    pub port: Option<u16>,

    /// Load both direction catalogs in the background at startup
    #[arg(long)]
    pub preload: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// 應用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut BotConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.preload {
            config.bot.preload = true;
        }
    }
}
