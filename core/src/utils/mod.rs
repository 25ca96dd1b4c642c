//! Utility functions and helpers
//!
//! Logging setup and operation timing shared by the registry.

pub mod timer;

pub use timer::OperationTimer;

/// Initialise `env_logger`, using `default_level` unless `RUST_LOG` is set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(default_level: &str) {
    let _ = logger_builder(env_logger::Env::default(), default_level).try_init();
}

/// Logger builder reading filters from `env`, falling back to `default_level`
pub(crate) fn logger_builder<'a>(
    env: env_logger::Env<'a>,
    default_level: &'a str,
) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(default_level))
}

/// Initialise logging for tests, capturing output per test
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("info");
        init_logging("debug");
        log::info!("logging initialised");
    }

    #[test]
    fn test_default_level_sets_filter() {
        let env = || env_logger::Env::new().filter("DATA_REGISTRY_UNSET_FILTER");

        assert_eq!(logger_builder(env(), "debug").build().filter(), log::LevelFilter::Debug);
        assert_eq!(logger_builder(env(), "warn").build().filter(), log::LevelFilter::Warn);
    }
}
