use std::{env::var, sync::Arc, time::Duration};

use dotenv::dotenv;
use eyre::{Context, Error};
use log::info;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Env(Arc<EnvInner>);

#[derive(Clone)]
pub struct EnvInner {
    shop_id: i64,
    secret_key: String,
    username: Option<String>,
    password: Option<String>,
    sandbox: bool,
    timeout: Duration,
    base_url: Option<String>,
}

impl Env {
    pub fn shop_id(&self) -> i64 {
        self.0.shop_id
    }

    pub fn secret_key(&self) -> &str {
        &self.0.secret_key
    }

    pub fn username(&self) -> Option<&str> {
        self.0.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.0.password.as_deref()
    }

    pub fn sandbox(&self) -> bool {
        self.0.sandbox
    }

    pub fn timeout(&self) -> Duration {
        self.0.timeout
    }

    pub fn base_url(&self) -> Option<&str> {
        self.0.base_url.as_deref()
    }

    pub fn load() -> Result<Env, Error> {
        if let Err(err) = dotenv() {
            info!("Failed to load .env file: {}", err);
        }
        Env::from_process()
    }

    /// Reads the process environment only, for callers that loaded `.env` themselves.
    pub fn from_process() -> Result<Env, Error> {
        Env::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Env, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| eyre::eyre!("{} is not set", key));

        let shop_id = required("EPAYMENTS_SHOP_ID")?
            .trim()
            .parse::<i64>()
            .context("EPAYMENTS_SHOP_ID must be an integer")?;
        let secret_key = required("EPAYMENTS_SECRET_KEY")?;
        let sandbox = match lookup("EPAYMENTS_SANDBOX") {
            Some(value) => parse_flag(&value)
                .ok_or_else(|| eyre::eyre!("EPAYMENTS_SANDBOX must be true or false"))?,
            None => true,
        };
        let timeout = match lookup("EPAYMENTS_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .context("EPAYMENTS_TIMEOUT_SECS must be a number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Env(Arc::new(EnvInner {
            shop_id,
            secret_key,
            username: lookup("EPAYMENTS_USERNAME").filter(|v| !v.is_empty()),
            password: lookup("EPAYMENTS_PASSWORD").filter(|v| !v.is_empty()),
            sandbox,
            timeout: Duration::from_secs(timeout),
            base_url: lookup("EPAYMENTS_BASE_URL").filter(|v| !v.is_empty()),
        })))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
