// Runtime settings read from the environment, with an optional `.env` file.

use std::str::FromStr;

use thiserror::Error;

use crate::shared::infrastructure::object_store::s3::S3Settings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app_env: String,
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub db_init_on_startup: bool,
    pub s3_endpoint: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub jwt_secret_key: String,
    pub jwt_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: Vec<String>,
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

impl Settings {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Ok(Self {
            app_env: text("APP_ENV", "dev"),
            host: text("APP_HOST", "0.0.0.0"),
            port: parsed(&lookup, "APP_PORT", 8000)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_init_on_startup: flag(&lookup, "DB_INIT_ON_STARTUP", true)?,
            s3_endpoint: text("S3_ENDPOINT", "http://localhost:9000"),
            s3_access_key: text("S3_ACCESS_KEY", "minioadmin"),
            s3_secret_key: text("S3_SECRET_KEY", "minioadmin"),
            s3_bucket: text("S3_BUCKET", "maps"),
            s3_region: text("S3_REGION", "us-east-1"),
            jwt_secret_key: text("JWT_SECRET_KEY", "dev-secret"),
            jwt_expire_minutes: parsed(&lookup, "JWT_EXPIRE_MINUTES", 60)?,
            refresh_token_expire_days: parsed(&lookup, "REFRESH_TOKEN_EXPIRE_DAYS", 30)?,
            bcrypt_cost: parsed(&lookup, "BCRYPT_COST", 12)?,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn is_dev(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("dev")
    }

    pub fn s3(&self) -> S3Settings {
        S3Settings {
            endpoint: self.s3_endpoint.clone(),
            access_key: self.s3_access_key.clone(),
            secret_key: self.s3_secret_key.clone(),
            region: self.s3_region.clone(),
        }
    }
}

#[cfg(test)]
mod settings_tests {
    use std::collections::HashMap;

    use super::*;
    use rstest::rstest;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[rstest]
    fn it_should_fall_back_to_development_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.database_url, None);
        assert!(settings.db_init_on_startup);
        assert_eq!(settings.s3_bucket, "maps");
        assert_eq!(settings.jwt_expire_minutes, 60);
        assert_eq!(settings.refresh_token_expire_days, 30);
        assert_eq!(settings.bcrypt_cost, 12);
        assert!(settings.cors_allowed_origins.is_empty());
        assert!(settings.is_dev());
    }

    #[rstest]
    fn it_should_read_overrides() {
        let settings = settings(&[
            ("APP_ENV", "prod"),
            ("APP_PORT", "9000"),
            ("DATABASE_URL", "postgres://u:p@db/maps"),
            ("DB_INIT_ON_STARTUP", "false"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.database_url.as_deref(), Some("postgres://u:p@db/maps"));
        assert!(!settings.db_init_on_startup);
        assert_eq!(settings.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!settings.is_dev());
    }

    #[rstest]
    #[case("APP_PORT", "eighty")]
    #[case("BCRYPT_COST", "-1")]
    #[case("DB_INIT_ON_STARTUP", "maybe")]
    fn it_should_reject_unparsable_values(#[case] key: &'static str, #[case] value: &str) {
        assert_eq!(
            settings(&[(key, value)]),
            Err(ConfigError::Invalid {
                key,
                value: value.to_string()
            })
        );
    }

    #[rstest]
    fn a_blank_database_url_should_mean_in_memory() {
        assert_eq!(settings(&[("DATABASE_URL", "  ")]).unwrap().database_url, None);
    }
}
