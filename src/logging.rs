use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "timetable_layout=warn",
        1 => "timetable_layout=info",
        2 => "timetable_layout=debug",
        _ => "timetable_layout=trace",
    }
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `-v`.
/// Returns false if a global subscriber was already set.
pub fn init(verbosity: u8) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(verbosity >= 3),
    );
    if subscriber.try_init().is_err() {
        return false;
    }
    tracing::debug!(verbosity, "tracing initialized");
    true
}
