use log::debug;

use crate::config::Config;

/// Initialize the logger. `RUST_LOG` still applies on top of the chosen level.
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

pub fn log_config_info(config: &Config) {
    debug!(
        "Configuration: seed={}, count={}, policy={:?}, export_path={}",
        config.seed,
        config.count,
        config.policy,
        config.export_path.display()
    );
    if let Some(path) = &config.dataset_path {
        debug!("Dataset source: {}", path.display());
    }
}
