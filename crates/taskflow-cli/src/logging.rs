use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `taskflow_core=debug`.
pub const LOG_ENV: &str = "TASKFLOW_LOG";

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean for `export` and scripting.
///
/// `verbosity` is the number of `-v` flags: none shows warnings, one shows
/// info, two or more show debug. `TASKFLOW_LOG` overrides both.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    // A second init (tests) is not an error worth surfacing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init();
}
