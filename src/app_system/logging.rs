use super::SystemConfig;

/// Configures `tracing` for the whole application. Call once at startup.
///
/// `RUST_LOG` wins when set; otherwise the configured filter applies.
///
/// ```bash
/// RUST_LOG=debug cargo run                      # Everything, including client requests
/// RUST_LOG=order_editor::editor=debug cargo run # Only the editor's decisions
/// ```
pub fn setup_tracing(config: &SystemConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
