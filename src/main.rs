#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use class_schedule::autostart::{AutostartMethod, AutostartOutcome};
use class_schedule::settings::{resolve_settings_path, ScheduleSettings, SettingsSource};
use class_schedule::{gui, logging};

fn main() -> anyhow::Result<()> {
    let settings_path = resolve_settings_path()?;
    let loaded = ScheduleSettings::load(&settings_path);

    let log_file = loaded
        .settings
        .debug_logging
        .then(|| logging::log_path_for(&settings_path));
    logging::init(loaded.settings.debug_logging, log_file);

    match &loaded.source {
        SettingsSource::File => {
            tracing::info!(path = %settings_path.display(), "settings loaded")
        }
        SettingsSource::Defaults { reason } => {
            tracing::warn!(path = %settings_path.display(), "using default settings: {reason}")
        }
    }
    if let Some(err) = &loaded.persist_error {
        tracing::error!("failed to write default settings: {err}");
    }

    register_autostart();

    gui::run(loaded.settings, settings_path)
}

/// Failures here are logged; the overlay still starts.
fn register_autostart() {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            tracing::error!("cannot resolve executable for autostart: {e}");
            return;
        }
    };
    let result = AutostartMethod::for_current_platform()
        .and_then(|method| method.ensure_registered(&exe));
    match result {
        Ok(AutostartOutcome::AlreadyRegistered) => tracing::debug!("autostart already registered"),
        Ok(AutostartOutcome::Registered) => {
            tracing::info!(exe = %exe.display(), "registered autostart")
        }
        Err(e) => tracing::error!("autostart registration failed: {e:#}"),
    }
}
