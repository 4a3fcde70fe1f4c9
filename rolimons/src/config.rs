use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "ROLIMONS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";
const SECONDS_PER_MINUTE: u64 = 60;
const REQUIRED_FIELDS: [&str; 5] = [
    "roli_verification",
    "player_id",
    "trade_ads",
    "min_delay",
    "max_delay",
];

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "roli_verification")]
    pub verification_token: String,
    pub player_id: i64,
    pub trade_ads: Vec<TradeAd>,
    /// Minutes
    pub min_delay: u64,
    /// Minutes
    pub max_delay: u64,
    /// Multiplier applied to both delay bounds after a failed post.
    #[serde(default = "default_failure_backoff")]
    pub failure_backoff: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TradeAd {
    pub name: String,
    pub offer_items: Vec<i64>,
    /// Empty means anything
    #[serde(default)]
    pub request_items: Vec<i64>,
    #[serde(default)]
    pub request_tags: Vec<String>,
}

fn default_failure_backoff() -> u64 {
    2
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("verification_token", &"<redacted>")
            .field("player_id", &self.player_id)
            .field("trade_ads", &self.trade_ads)
            .field("min_delay", &self.min_delay)
            .field("max_delay", &self.max_delay)
            .field("failure_backoff", &self.failure_backoff)
            .finish()
    }
}

/// Path of the config file, from `ROLIMONS_CONFIG` or `config.json`.
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Config {
    /// Reads and validates the config file at `path`.
    ///
    /// `player_id` may be given either as a number or as a numeric string.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(Error::ConfigParse)?;
        let Value::Object(mut map) = value else {
            return Err(Error::Config("Config must be a JSON object".into()));
        };

        let missing = missing_fields(&map);
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Missing required config fields: {}",
                missing.join(", ")
            )));
        }

        let player_id = parse_player_id(&map["player_id"])?;
        map.insert("player_id".into(), Value::from(player_id));

        let config: Config =
            serde_json::from_value(Value::Object(map)).map_err(Error::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.min_delay > self.max_delay {
            return Err(Error::Config(format!(
                "min_delay ({}) must not exceed max_delay ({})",
                self.min_delay, self.max_delay
            )));
        }
        if self.failure_backoff == 0 {
            return Err(Error::Config("failure_backoff must be at least 1".into()));
        }
        let longest_wait_secs = self
            .max_delay
            .checked_mul(self.failure_backoff)
            .and_then(|minutes| minutes.checked_mul(SECONDS_PER_MINUTE));
        if longest_wait_secs.is_none() {
            return Err(Error::Config(format!(
                "max_delay ({}) times failure_backoff ({}) is too large",
                self.max_delay, self.failure_backoff
            )));
        }
        if let Some(ad) = self.trade_ads.iter().find(|ad| ad.offer_items.is_empty()) {
            return Err(Error::Config(format!(
                "Trade ad '{}' must offer at least one item",
                ad.name
            )));
        }
        Ok(())
    }
}

/// A field is missing when absent, null, an empty string or an empty list.
fn missing_fields(map: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| match map.get(*field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(a)) => a.is_empty(),
            Some(_) => false,
        })
        .collect()
}

fn parse_player_id(value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::Config("player_id must be a valid integer".into()))
}
