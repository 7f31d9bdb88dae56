//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, before the provider is built. Logs go to
//! stderr so stdout stays clean for the JSON record.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::common::error::AppError;

/// Level used when neither a flag, an env var nor `RUST_LOG` asks for one.
pub const DEFAULT_LEVEL: &str = "info";

/// Initialise the global tracing subscriber.
///
/// An explicit `level` wins outright. Without one, `RUST_LOG` is honoured
/// and [`DEFAULT_LEVEL`] applies when it is unset or unparsable.
pub fn init(level: Option<LevelFilter>) -> Result<(), AppError> {
    let filter = match level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Map repeated `-v` flags to a level louder than the default.
/// Zero flags means "no opinion".
pub fn verbosity_level(count: u8) -> Option<LevelFilter> {
    match count {
        0 => None,
        1 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

/// Count the `v`s in a `-v`, `-vv`, … flag; `None` for anything else.
/// Saturates at `u8::MAX`.
pub fn verbosity_flag_count(arg: &str) -> Option<u8> {
    let vs = arg.strip_prefix('-')?;
    if vs.is_empty() || !vs.chars().all(|c| c == 'v') {
        return None;
    }
    Some(u8::try_from(vs.len()).unwrap_or(u8::MAX))
}

/// Pick the explicit level: CLI flags first, then the env override.
/// A malformed env value is an error rather than a silent filter.
pub fn effective_level(
    cli: Option<LevelFilter>,
    env: Option<&str>,
) -> Result<Option<LevelFilter>, AppError> {
    match cli {
        Some(level) => Ok(Some(level)),
        None => env.map(parse_level).transpose(),
    }
}

/// Parse a log level string into a [`LevelFilter`], returning an error on
/// unrecognised values.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    let level = level.trim();
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels_parse() {
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level(" debug ").unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn garbage_level_rejected() {
        assert!(parse_level("garbage").is_err());
        assert!(parse_level("   ").is_err());
    }

    #[test]
    fn verbosity_tiers_never_quieter_than_default() {
        let default = parse_level(DEFAULT_LEVEL).unwrap();
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(1), Some(LevelFilter::DEBUG));
        assert_eq!(verbosity_level(u8::MAX), Some(LevelFilter::TRACE));
        for count in 1..=4 {
            let tier = verbosity_level(count).unwrap();
            assert!(tier > default, "-v x{count} gave {tier}, not louder than {default}");
        }
    }

    #[test]
    fn verbosity_flags_counted() {
        assert_eq!(verbosity_flag_count("-v"), Some(1));
        assert_eq!(verbosity_flag_count("-vvv"), Some(3));
        assert_eq!(verbosity_flag_count("-"), None);
        assert_eq!(verbosity_flag_count("-e"), None);
        assert_eq!(verbosity_flag_count("--verbose"), None);
        assert_eq!(verbosity_flag_count("vv"), None);
    }

    #[test]
    fn long_verbosity_flag_saturates() {
        let flag = format!("-{}", "v".repeat(300));
        assert_eq!(verbosity_flag_count(&flag), Some(u8::MAX));
    }

    #[test]
    fn cli_beats_env() {
        let level = effective_level(Some(LevelFilter::TRACE), Some("warn")).unwrap();
        assert_eq!(level, Some(LevelFilter::TRACE));
        assert_eq!(effective_level(None, Some("warn")).unwrap(), Some(LevelFilter::WARN));
        assert_eq!(effective_level(None, None).unwrap(), None);
    }

    #[test]
    fn malformed_env_level_is_an_error() {
        match effective_level(None, Some("verbose")) {
            Err(AppError::Logger(msg)) => assert!(msg.contains("'verbose'")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn flags_override_malformed_env_level() {
        assert!(effective_level(Some(LevelFilter::DEBUG), Some("verbose")).is_ok());
    }

    #[test]
    fn init_succeeds_or_already_init() {
        // A prior test in this process may have installed a subscriber.
        match init(Some(LevelFilter::INFO)) {
            Ok(()) => {}
            Err(AppError::Logger(msg)) if msg.contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
