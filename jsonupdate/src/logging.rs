//! Development-time tracing for debugging update resolution.
//!
//! The core only emits `debug`/`trace` events (update dispatch, segment
//! descent). Failures are returned to the caller, never logged here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format. Panics if a global subscriber is
/// already installed, so call it once from the embedding binary.
///
/// ```no_run
/// use jsonupdate::{Update, impl_record, logging};
///
/// #[derive(Default)]
/// struct Settings {
///     theme: String,
/// }
///
/// impl_record!(Settings { theme: leaf [json = "theme"] });
///
/// fn main() -> Result<(), jsonupdate::UpdateError> {
///     // RUST_LOG=jsonupdate=trace shows segment descent.
///     logging::init();
///     let mut settings = Settings::default();
///     let mut update = Update::set("theme", "dark");
///     update.validate()?;
///     update.apply(&mut settings)
/// }
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Like [`init`], but writes through the test harness's captured output and
/// returns `false` instead of panicking when a subscriber is already
/// installed. Safe to call from every test.
pub fn try_init() -> bool {
    tracing_subscriber::registry()
        .with(filter())
        .with(
            fmt::layer()
                .with_writer(fmt::TestWriter::new())
                .compact(),
        )
        .try_init()
        .is_ok()
}
