use env_logger::{Builder, Env};

/// Loads `.env` if present and initialises the logger, honouring `RUST_LOG`
/// with a fallback of `info`.
pub fn setup_env() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
}
