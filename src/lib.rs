pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use config::BotConfig;
pub use core::{LanguageCatalog, Translator, UpstreamClient};
pub use utils::error::{BotError, Result};
