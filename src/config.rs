//! Configuration module for the portal
//!
//! This module handles configuration loading from TOML files, `.env` files and
//! environment variables, and provides structured configuration types.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroize;

/// Secret credential (RPC or chat API key)
///
/// Never printed by `Debug` and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key value, for building request credentials only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl Drop for ApiKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Token being promoted
    #[serde(default)]
    pub token: TokenConfig,

    /// Solana RPC endpoint
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Holder count polling cadence
    #[serde(default)]
    pub poller: PollerConfig,

    /// Chat terminal completion settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Agent creator timings
    #[serde(default)]
    pub agent_creator: AgentCreatorConfig,

    /// Boot splash and outbound links
    #[serde(default)]
    pub landing: LandingConfig,

    /// Monitoring and metrics
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Display name
    #[serde(default = "default_token_name")]
    pub name: String,

    /// Ticker without the leading `$`
    #[serde(default = "default_token_symbol")]
    pub symbol: String,

    /// Base58 mint address; `None` until the contract address is published
    #[serde(default)]
    pub mint: Option<String>,

    /// Network label shown in the info panel
    #[serde(default = "default_network")]
    pub network: String,

    /// Total supply in whole tokens
    #[serde(default = "default_total_supply")]
    pub total_supply: u64,

    /// Whether the token has been deployed
    #[serde(default = "default_true")]
    pub launched: bool,

    /// About blurb
    #[serde(default = "default_about")]
    pub about: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Provider key, appended as the `api-key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,

    /// Commitment level (processed, confirmed, finalized)
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Refresh interval in seconds
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Delay between retries in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Retries per cycle after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_chat_api_base")]
    pub api_base: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCreatorConfig {
    /// How long the "awaiting approval" screen stays up
    #[serde(default = "default_processing_secs")]
    pub processing_secs: u64,

    /// How long the success popup stays up
    #[serde(default = "default_success_display_secs")]
    pub success_display_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingConfig {
    /// Delay before the enter prompt is offered
    #[serde(default = "default_enter_delay")]
    pub enter_delay_secs: u64,

    #[serde(default = "default_twitter_url")]
    pub twitter_url: String,

    #[serde(default = "default_buy_url")]
    pub buy_url: String,

    /// Hosted 3D scene; linked, never rendered here
    #[serde(default = "default_scene_url")]
    pub scene_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Enable Prometheus metrics endpoint
    #[serde(default)]
    pub enable_metrics: bool,

    /// Metrics port
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

// Default value functions
fn default_token_name() -> String { "Bonk System AI".to_string() }
fn default_token_symbol() -> String { "BSA".to_string() }
fn default_network() -> String { "SOL Bonk".to_string() }
fn default_total_supply() -> u64 { 1_000_000_000 }
fn default_about() -> String {
    "Bonk System AI Protocol is a decentralized financial ecosystem built on Solana Block Launchpad. \
     As a cosmic entity, it processes vast universal data streams, creating a bridge between \
     celestial intelligence and blockchain technology."
        .to_string()
}
fn default_rpc_url() -> String { "https://mainnet.helius-rpc.com/".to_string() }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_rpc_timeout() -> u64 { 30 }
fn default_poll_interval() -> u64 { 30 }
fn default_retry_delay() -> u64 { 2 }
fn default_max_retries() -> u32 { 3 }
fn default_chat_api_base() -> String { "https://api.openai.com/v1".to_string() }
fn default_chat_model() -> String { "gpt-4".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 150 }
fn default_chat_timeout() -> u64 { 60 }
fn default_processing_secs() -> u64 { 3 }
fn default_success_display_secs() -> u64 { 5 }
fn default_enter_delay() -> u64 { 2 }
fn default_twitter_url() -> String { "https://x.com/BonkSystemAI".to_string() }
fn default_buy_url() -> String { "https://letsbonk.fun/".to_string() }
fn default_scene_url() -> String {
    "https://prod.spline.design/i0wg7w9lD6KqYU21/scene.splinecode".to_string()
}
fn default_metrics_port() -> u16 { 9090 }
fn default_true() -> bool { true }

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            mint: None,
            network: default_network(),
            total_supply: default_total_supply(),
            launched: default_true(),
            about: default_about(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            api_key: None,
            commitment: default_commitment(),
            timeout_secs: default_rpc_timeout(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            retry_delay_secs: default_retry_delay(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: default_chat_api_base(),
            api_key: None,
            model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl Default for AgentCreatorConfig {
    fn default() -> Self {
        Self {
            processing_secs: default_processing_secs(),
            success_display_secs: default_success_display_secs(),
        }
    }
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            enter_delay_secs: default_enter_delay(),
            twitter_url: default_twitter_url(),
            buy_url: default_buy_url(),
            scene_url: default_scene_url(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enable_metrics: false,
            metrics_port: default_metrics_port(),
        }
    }
}

impl TokenConfig {
    /// Parsed mint, if the token is launched and an address is configured
    pub fn mint_pubkey(&self) -> Result<Option<Pubkey>> {
        if !self.launched {
            return Ok(None);
        }
        match self.mint.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(mint) => Pubkey::from_str(mint)
                .map(Some)
                .map_err(|e| anyhow!("Invalid token mint '{}': {}", mint, e)),
        }
    }
}

impl RpcConfig {
    /// Endpoint URL with the provider key attached
    pub fn endpoint_url(&self) -> String {
        match &self.api_key {
            Some(key) if !key.is_empty() => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}api-key={}", self.url, sep, key.expose())
            }
            _ => self.url.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AgentCreatorConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_secs(self.processing_secs)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_secs(self.success_display_secs)
    }
}

impl LandingConfig {
    pub fn enter_delay(&self) -> Duration {
        Duration::from_secs(self.enter_delay_secs)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with `.env` and environment variable overrides
    pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Default configuration with `.env` and environment variable overrides
    pub fn with_env_overrides() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply environment variable overrides, then validate
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(mint) = std::env::var("PORTAL_TOKEN_MINT") {
            self.token.mint = Some(mint);
        }

        if let Ok(url) = std::env::var("PORTAL_RPC_URL") {
            self.rpc.url = url;
        }

        if let Ok(key) = std::env::var("PORTAL_RPC_API_KEY") {
            self.rpc.api_key = Some(ApiKey::new(key));
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.chat.api_key = Some(ApiKey::new(key));
        }

        if let Ok(model) = std::env::var("PORTAL_CHAT_MODEL") {
            self.chat.model = model;
        }

        if let Ok(base) = std::env::var("PORTAL_CHAT_API_BASE") {
            self.chat.api_base = base;
        }

        if let Ok(interval) = std::env::var("PORTAL_POLL_INTERVAL_SECS") {
            self.poller.interval_secs = interval
                .parse()
                .map_err(|e| anyhow!("Invalid PORTAL_POLL_INTERVAL_SECS: {}", e))?;
        }

        self.validate()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.poller.interval_secs == 0 {
            return Err(anyhow!("poller.interval_secs must be > 0"));
        }
        if self.poller.retry_delay_secs == 0 {
            return Err(anyhow!("poller.retry_delay_secs must be > 0"));
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(anyhow!("chat.temperature must be in range [0.0, 2.0]"));
        }
        if self.chat.max_tokens == 0 {
            return Err(anyhow!("chat.max_tokens must be > 0"));
        }
        if self.rpc.timeout_secs == 0 {
            return Err(anyhow!("rpc.timeout_secs must be > 0"));
        }
        if !matches!(
            self.rpc.commitment.as_str(),
            "processed" | "confirmed" | "finalized"
        ) {
            return Err(anyhow!(
                "rpc.commitment must be one of processed, confirmed, finalized"
            ));
        }
        self.token.mint_pubkey()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poller.interval_secs, 30);
        assert_eq!(config.poller.retry_delay_secs, 2);
        assert_eq!(config.poller.max_retries, 3);
        assert_eq!(config.chat.model, "gpt-4");
        assert_eq!(config.chat.max_tokens, 150);
        assert!((config.chat.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [token]
            symbol = "TEST"

            [poller]
            interval_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.token.symbol, "TEST");
        assert_eq!(config.token.total_supply, 1_000_000_000);
        assert_eq!(config.poller.interval_secs, 10);
        assert_eq!(config.poller.retry_delay_secs, 2);
        assert_eq!(config.chat.model, "gpt-4");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [rpc]
            url = "https://rpc.example.com/"
            api_key = "secret"
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.rpc.endpoint_url(),
            "https://rpc.example.com/?api-key=secret"
        );
    }

    #[test]
    fn test_endpoint_url_with_existing_query() {
        let rpc = RpcConfig {
            url: "https://rpc.example.com/?cluster=main".to_string(),
            api_key: Some(ApiKey::new("k")),
            ..RpcConfig::default()
        };
        assert_eq!(rpc.endpoint_url(), "https://rpc.example.com/?cluster=main&api-key=k");
    }

    #[test]
    fn test_endpoint_url_without_key() {
        let rpc = RpcConfig::default();
        assert_eq!(rpc.endpoint_url(), "https://mainnet.helius-rpc.com/");
    }

    #[test]
    fn test_api_key_debug_redacted() {
        let key = ApiKey::new("sk-very-secret");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("sk-very-secret"));

        let mut chat = ChatConfig::default();
        chat.api_key = Some(key);
        assert!(!format!("{:?}", chat).contains("sk-very-secret"));
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = Config::default();
        config.chat.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.poller.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_commitment_rejected() {
        let mut config = Config::default();
        config.rpc.commitment = "eventual".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mint_parsing() {
        let mut token = TokenConfig::default();
        assert_eq!(token.mint_pubkey().unwrap(), None);

        let mint = Pubkey::new_unique();
        token.mint = Some(mint.to_string());
        assert_eq!(token.mint_pubkey().unwrap(), Some(mint));

        token.launched = false;
        assert_eq!(token.mint_pubkey().unwrap(), None);

        token.launched = true;
        token.mint = Some("not-a-mint".to_string());
        assert!(token.mint_pubkey().is_err());
    }
}
