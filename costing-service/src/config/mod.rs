use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct CostingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub pricing: PricingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Relative tolerance when comparing client-submitted totals with the
    /// server's recomputation.
    pub mismatch_tolerance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CostingConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let mismatch_tolerance: f64 = get_env("PRICING_MISMATCH_TOLERANCE", Some("1e-6"), is_prod)?
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "PRICING_MISMATCH_TOLERANCE is not a number: {}",
                    e
                ))
            })?;
        if !mismatch_tolerance.is_finite() || mismatch_tolerance < 0.0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PRICING_MISMATCH_TOLERANCE must be a non-negative number"
            )));
        }

        Ok(CostingConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("freefuel"), is_prod)?,
            },
            pricing: PricingConfig { mismatch_tolerance },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://app.example.com, http://localhost:5173,,"),
            vec!["https://app.example.com", "http://localhost:5173"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }
}
