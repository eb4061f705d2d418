use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "class_schedule.log";

/// Log file placed next to the settings file.
pub fn log_path_for(settings_path: &Path) -> PathBuf {
    settings_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(LOG_FILE_NAME)
}

/// Install the global subscriber. Level is `info` unless `debug` is set, in
/// which case it is `debug` or whatever `RUST_LOG` asks for. Output goes to
/// stdout and, when `log_file` is given, to that file as well.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // `RUST_LOG` is only honoured in debug mode.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| LOG_FILE_NAME.into());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender.and(std::io::stdout))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
}
