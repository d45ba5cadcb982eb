use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "dirtidy=debug"
    } else {
        "dirtidy=info"
    }
}

/// Install the process-wide subscriber. Log lines go to stderr so they
/// never mix with listings and prompts on stdout.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_verbosity() {
        assert_eq!(default_filter(false), "dirtidy=info");
        assert_eq!(default_filter(true), "dirtidy=debug");
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }
}
