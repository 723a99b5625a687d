pub mod config;
pub mod detection;
pub mod errors;
pub mod overlay;
pub mod session;
pub mod source;

/// Install the global fmt subscriber. `RUST_LOG` overrides the default `debug` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();
}
