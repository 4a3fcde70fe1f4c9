//! Client for the Rolimons trade ad API.
//! It includes the configuration loader, an HTTP session with transport-level
//! retries and the trade ad poster.
pub mod config;
mod endpoint;
mod error;
mod http;
mod poster;

pub use config::{config_path, Config, TradeAd};
pub use endpoint::Endpoint;
pub use error::Error;
pub use http::{HttpClient, RetryPolicy, BASE_URL};
pub use poster::{CreateAdResponse, PostOutcome};

pub type Result<T> = std::result::Result<T, Error>;
