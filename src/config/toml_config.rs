use crate::domain::model::Service;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 3;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub bot: BotInfoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub translation_key: String,
    pub dictionary_key: String,
    pub timeout_seconds: u64,
    pub endpoints: EndpointsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            translation_key: String::new(),
            dictionary_key: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            endpoints: EndpointsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub translate: String,
    pub translation_langs: String,
    pub dictionary: String,
    pub dictionary_langs: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            translate: "https://translate.yandex.net/api/v1.5/tr.json/translate".to_string(),
            translation_langs: "https://translate.yandex.net/api/v1.5/tr.json/getLangs"
                .to_string(),
            dictionary: "https://dictionary.yandex.net/api/v1/dicservice.json/lookup".to_string(),
            dictionary_langs: "https://dictionary.yandex.net/api/v1/dicservice.json/getLangs"
                .to_string(),
        }
    }
}

impl EndpointsConfig {
    /// Same API paths as the public services, rooted at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            translate: format!("{}/tr.json/translate", base),
            translation_langs: format!("{}/tr.json/getLangs", base),
            dictionary: format!("{}/dicservice.json/lookup", base),
            dictionary_langs: format!("{}/dicservice.json/getLangs", base),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotInfoConfig {
    pub name: String,
    pub author: String,
    pub info: String,
    pub preload: bool,
}

impl Default for BotInfoConfig {
    fn default() -> Self {
        Self {
            name: "translation-bot".to_string(),
            author: String::new(),
            info: "Radio-t chat yandex translation-bot".to_string(),
            preload: false,
        }
    }
}

impl BotConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRANSLATION_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::require_non_empty("server.host", &self.server.host)?;
        if self.server.port == 0 {
            return Err(BotError::InvalidConfigValue {
                field: "server.port".to_string(),
                value: "0".to_string(),
                reason: "Port must be non-zero".to_string(),
            });
        }

        validation::require_non_empty("api.translation_key", &self.api.translation_key)?;
        validation::require_non_empty("api.dictionary_key", &self.api.dictionary_key)?;
        validation::validate_range(
            "api.timeout_seconds",
            self.api.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        let endpoints = &self.api.endpoints;
        validation::validate_url("api.endpoints.translate", &endpoints.translate)?;
        validation::validate_url(
            "api.endpoints.translation_langs",
            &endpoints.translation_langs,
        )?;
        validation::validate_url("api.endpoints.dictionary", &endpoints.dictionary)?;
        validation::validate_url("api.endpoints.dictionary_langs", &endpoints.dictionary_langs)?;

        Ok(())
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let joined = format!("{}:{}", self.server.host, self.server.port);
        joined
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| BotError::InvalidConfigValue {
                field: "server.host".to_string(),
                value: self.server.host.clone(),
                reason: "Host does not resolve to any address".to_string(),
            })
    }
}

impl ConfigProvider for BotConfig {
    fn translation_key(&self) -> &str {
        &self.api.translation_key
    }

    fn dictionary_key(&self) -> &str {
        &self.api.dictionary_key
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn directions_url(&self, service: Service) -> &str {
        match service {
            Service::Translation => &self.api.endpoints.translation_langs,
            Service::Dictionary => &self.api.endpoints.dictionary_langs,
        }
    }

    fn content_url(&self, service: Service) -> &str {
        match service {
            Service::Translation => &self.api.endpoints.translate,
            Service::Dictionary => &self.api.endpoints.dictionary,
        }
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
