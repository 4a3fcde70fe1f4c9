use crate::endpoint::Endpoint;
use crate::{Error, HttpClient, Result, TradeAd};
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Deserialize)]
pub struct CreateAdResponse {
    #[serde(default)]
    pub success: Value,
    /// Only read when the post was rejected; any JSON type is accepted.
    #[serde(default)]
    pub message: Value,
}

impl CreateAdResponse {
    /// `success` is read with JSON truthiness, so `1` or `"ok"` also count.
    pub fn succeeded(&self) -> bool {
        match &self.success {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    pub fn message(&self) -> String {
        match &self.message {
            Value::Null => UNKNOWN_ERROR.to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Result of a single post, consumed by the scheduler to pick the next delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl PostOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl HttpClient {
    /// Creates a trade ad. A falsy `success` in the response is returned as
    /// `Error::Rejected` carrying the API's message.
    pub async fn create_ad(&self, player_id: i64, ad: &TradeAd) -> Result<CreateAdResponse> {
        let payload = json!({
            "player_id": player_id,
            "offer_item_ids": ad.offer_items,
            "request_item_ids": ad.request_items,
            "request_tags": ad.request_tags,
        });

        let value = self.post(Endpoint::CreateAd, payload).await?;
        if !value.is_object() {
            return Err(Error::Deserialize(format!("expected a JSON object, got {value}")));
        }

        let response: CreateAdResponse =
            serde_json::from_value(value).map_err(|e| Error::Deserialize(e.to_string()))?;
        if !response.succeeded() {
            return Err(Error::Rejected(response.message()));
        }
        Ok(response)
    }

    /// Posts one trade ad and reports the outcome. Never returns an error:
    /// transport, parse and API failures all become a failed outcome.
    pub async fn post_ad(&self, player_id: i64, ad: &TradeAd) -> PostOutcome {
        info!("Offering: {:?}", ad.offer_items);
        info!("Requesting: {}", describe_request(ad));

        match self.create_ad(player_id, ad).await {
            Ok(_) => {
                info!("Ad '{}' posted successfully!", ad.name);
                PostOutcome::succeeded()
            }
            Err(Error::Rejected(message)) => {
                error!("Failed to post '{}': {message}", ad.name);
                PostOutcome::failed(message)
            }
            Err(e @ Error::Deserialize(_)) => {
                error!("Invalid JSON response: {e}");
                PostOutcome::failed(e.to_string())
            }
            Err(e) => {
                error!("API request failed: {e}");
                PostOutcome::failed(e.to_string())
            }
        }
    }
}

fn describe_request(ad: &TradeAd) -> String {
    let items = if ad.request_items.is_empty() {
        "Anything".to_string()
    } else {
        format!("{:?}", ad.request_items)
    };
    let tags = if ad.request_tags.is_empty() {
        "No tags".to_string()
    } else {
        ad.request_tags.join(", ")
    };
    format!("{items} ({tags})")
}
