use tracing_subscriber::EnvFilter;

/// JSON lines for CloudWatch. `RUST_LOG` overrides the default `info` level.
/// Lambda timestamps each line, so the subscriber doesn't.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        .init();
}
