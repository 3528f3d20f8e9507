use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_SIGNUP_CODE: &str = "we_sell_houses_agent";

/// Service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub signup_codes: Vec<String>,
    pub cors_origin: String,
}

#[derive(Debug, Default, Deserialize)]
struct AppConfigOverride {
    bind_addr: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    signup_codes: Option<Vec<String>>,
    cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("ESTATE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .with_context(|| "parse ESTATE_BIND")?;
        let jwt_secret = std::env::var("ESTATE_JWT_SECRET").unwrap_or_default();
        let token_ttl = match std::env::var("ESTATE_TOKEN_TTL_SECS") {
            Ok(value) => Duration::from_secs(
                value
                    .parse()
                    .with_context(|| "parse ESTATE_TOKEN_TTL_SECS")?,
            ),
            Err(_) => Duration::from_secs(24 * 60 * 60),
        };
        let signup_codes = std::env::var("ESTATE_SIGNUP_CODES")
            .map(|codes| parse_codes(&codes))
            .unwrap_or_else(|_| vec![DEFAULT_SIGNUP_CODE.to_string()]);
        let cors_origin = std::env::var("ESTATE_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl,
            signup_codes,
            cors_origin,
        })
    }

    /// Environment first, then the YAML file named by `ESTATE_CONFIG`.
    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ESTATE_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read ESTATE_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: AppConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse estate-agent config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.jwt_secret {
            self.jwt_secret = value;
        }
        if let Some(value) = override_cfg.token_ttl_secs {
            self.token_ttl = Duration::from_secs(value);
        }
        if let Some(value) = override_cfg.signup_codes {
            self.signup_codes = value;
        }
        if let Some(value) = override_cfg.cors_origin {
            self.cors_origin = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("ESTATE_JWT_SECRET (or jwt_secret in ESTATE_CONFIG) must be set");
        }
        if self.token_ttl.is_zero() {
            bail!("token ttl must be positive");
        }
        Ok(())
    }
}

fn parse_codes(codes: &str) -> Vec<String> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
