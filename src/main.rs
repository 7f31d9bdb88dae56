//! coffee-shop-env: resolve a deployment target and print its record.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args, resolve env overrides
//!   3. Init logger once (CLI `-v` flags > env > RUST_LOG > info);
//!      a malformed env level aborts startup
//!   4. Build the provider (built-ins + config dir)
//!   5. Load the target, print it as JSON

use std::env;

use tracing::info;

use coffee_shop_env::bootstrap::logger;
use coffee_shop_env::config::expand_home;
use coffee_shop_env::{AppError, ConfigProvider};

const ENV_TARGET: &str = "COFFEE_SHOP_ENV";
const ENV_CONFIG_DIR: &str = "COFFEE_SHOP_CONFIG_DIR";
const ENV_LOG_LEVEL: &str = "COFFEE_SHOP_LOG_LEVEL";

const DEFAULT_TARGET: &str = "development";
const DEFAULT_CONFIG_DIR: &str = "config";

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let env_level = env::var(ENV_LOG_LEVEL).ok();
    let level =
        logger::effective_level(logger::verbosity_level(args.verbosity), env_level.as_deref())?;
    logger::init(level)?;

    let target = args
        .target
        .or_else(|| env::var(ENV_TARGET).ok())
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());
    let config_dir = args
        .config_dir
        .or_else(|| env::var(ENV_CONFIG_DIR).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
    let config_dir = expand_home(&config_dir);

    let provider = ConfigProvider::builder().with_dir(&config_dir).build()?;

    info!(
        config_dir = %config_dir.display(),
        targets = ?provider.targets(),
        "provider ready"
    );

    if args.check {
        provider.check_all()?;
    }

    let record = provider.load_named(&target)?;
    let json = serde_json::to_string_pretty(record).map_err(std::io::Error::from)?;
    println!("{json}");

    Ok(())
}

struct CliArgs {
    target: Option<String>,
    config_dir: Option<String>,
    verbosity: u8,
    check: bool,
}

fn parse_cli_args() -> CliArgs {
    let mut target = None;
    let mut config_dir = None;
    let mut verbosity = 0u8;
    let mut check = false;

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: coffee-shop-env [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -e, --env <TARGET>         Deployment target (default: ${ENV_TARGET} or {DEFAULT_TARGET})");
                println!("  -c, --config-dir <DIR>     Per-target TOML directory (default: ${ENV_CONFIG_DIR} or {DEFAULT_CONFIG_DIR})");
                println!("      --check                Validate every registered target before loading");
                println!("  -v, -vv                    Increase logging verbosity (debug, trace)");
                std::process::exit(0);
            }
            "-e" | "--env" => target = Some(required_value(&mut iter, "-e/--env", "a target")),
            "-c" | "--config-dir" => {
                config_dir = Some(required_value(&mut iter, "-c/--config-dir", "a directory"))
            }
            "--check" => check = true,
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a => {
                if let Some(count) = logger::verbosity_flag_count(a) {
                    verbosity = verbosity.saturating_add(count);
                }
            }
        }
    }

    CliArgs {
        target,
        config_dir,
        verbosity,
        check,
    }
}

fn required_value(iter: &mut impl Iterator<Item = String>, flag: &str, what: &str) -> String {
    match iter.next() {
        Some(value) => value,
        None => {
            eprintln!("error: {flag} requires {what}");
            std::process::exit(1);
        }
    }
}
