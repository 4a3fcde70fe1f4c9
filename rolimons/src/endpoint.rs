use strum_macros::{Display, EnumString};

/// Endpoints of the Rolimons API used by the poster
#[derive(EnumString, Display, Copy, Clone, Debug)]
pub enum Endpoint {
    #[strum(serialize = "/tradeads/v1/createad")]
    CreateAd,
}
