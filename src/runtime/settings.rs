use std::fs::OpenOptions;

use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("cortex-fm: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("cortex-fm: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Send `log` output to the configured file; the terminal belongs to the UI.
///
/// `RUST_LOG` takes precedence over `logging.level`. Logging stays off when
/// the file cannot be opened.
pub fn init_logging(settings: &config::LoggingSettings) {
    let path = settings.resolve_file();
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "cortex-fm: cannot open log file {}, logging disabled: {e}",
                path.display()
            );
            return;
        }
    };

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.level.as_str()),
    );
    logger
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .format_timestamp_millis();

    if let Err(e) = logger.try_init() {
        eprintln!("cortex-fm: logger already initialised: {e}");
    }
}
