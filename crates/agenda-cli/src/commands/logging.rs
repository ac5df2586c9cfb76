use agenda_core::Config;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins; otherwise `logging.level` from the config file, falling
/// back to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = Config::load()
                .map(|c| c.logging.level)
                .unwrap_or_else(|_| "info".to_string());
            EnvFilter::try_new(level)
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
