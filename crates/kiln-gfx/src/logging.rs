//! Global logger setup.
//!
//! The library itself only emits through the `log` facade; binaries call
//! [`init_logging`] once, early in `main`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `env_logger` once; later calls are ignored.
///
/// `filter` follows the `env_logger` syntax (e.g. `"kiln_gfx=debug"`).
/// When `None`, `RUST_LOG` applies, falling back to info level.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(env) = std::env::var("RUST_LOG") {
            builder.parse_filters(&env);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
