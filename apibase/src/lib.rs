//! A library for resolving the base URL of a backend API and building request URLs against it.
//!
//! The base URL is read from the `VITE_API_BASE_URL` setting. If that isn't set, or is set to an
//! empty string, the default of `http://127.0.0.1:9000` is used instead. Resolving the base URL
//! never fails.
//!
//! The main entry point for programmatic use is the [`SettingsBuilder`] struct. It produces a
//! [`Settings`] value that you build once at startup and hand to whatever needs to make requests.
//! Here is an example of its usage:
//!
//! ```
//! use apibase::{MapSource, SettingsBuilder};
//!
//! let settings = SettingsBuilder::new()
//!     .source(MapSource::new("injected").with("VITE_API_BASE_URL", "https://api.example.com"))
//!     .build();
//!
//! assert_eq!(settings.api_url("/v1/ping"), "https://api.example.com/v1/ping");
//! assert_eq!(settings.api_url("v1/ping"), "https://api.example.com/v1/ping");
//! assert_eq!(settings.api_url(()), "https://api.example.com/");
//! ```
//!
//! ## Where the Base URL Comes From
//!
//! [`SettingsBuilder::build`] takes the first non-empty value from:
//!
//! - An explicit value passed to [`SettingsBuilder::api_base_url`].
//! - Each [`SettingSource`] added to the builder, in order. The sources that ship with this crate
//!   are [`EnvSource`] (the process environment), [`MapSource`] (an in-memory map), and
//!   [`DotenvSource`] (a `.env` file). If you don't add any, the process environment is used.
//! - [`DEFAULT_API_BASE_URL`].
//!
//! The value is used exactly as given. It is not parsed or trimmed.
//!
//! ## How Paths Are Joined
//!
//! [`Settings::api_url`] makes sure there is exactly one `/` where the base URL and the path meet.
//! An empty path (or `None`, or `()`) is treated as `/`. A path that doesn't start with `/` gets
//! one. Nothing else is normalized, so a base URL ending in `/` joined with a path starting with
//! `/` gives you `//`.
//!
//! ## Process-wide Settings
//!
//! For code that can't easily be handed a [`Settings`], the [`api_base_url`] and [`api_url`]
//! functions use a [`Settings`] that is resolved from the process environment the first time
//! either is called. It never changes after that.
//!
//! ## Features
//!
#![doc = document_features::document_features!()]

mod error;
pub mod path;
mod settings;
mod source;

pub use crate::{
    error::Error,
    path::PathArg,
    settings::{Resolution, Settings, SettingsBuilder, API_BASE_URL_VAR, DEFAULT_API_BASE_URL},
    source::{DotenvSource, EnvSource, MapSource, SettingSource},
};
use std::sync::LazyLock;

// The version of the `apibase` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::from_env);

/// Returns the process-wide [`Settings`]. These are resolved from the process environment the
/// first time this (or [`api_base_url`] or [`api_url`]) is called.
#[must_use]
pub fn settings() -> &'static Settings {
    &SETTINGS
}

/// Returns the process-wide API base URL.
#[must_use]
pub fn api_base_url() -> &'static str {
    SETTINGS.api_base_url()
}

/// Returns the full URL for `path` using the process-wide settings. See [`Settings::api_url`] for
/// how the path is joined.
#[must_use]
pub fn api_url<P: PathArg>(path: P) -> String {
    SETTINGS.api_url(path)
}

#[cfg(feature = "logging")]
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};

/// This function initializes logging for the application. It's public for the sake of the
/// `apibase` binary, but it lives in the library crate so that test code can also enable logging.
///
/// # Errors
///
/// This can return a `log::SetLoggerError` error.
#[cfg(feature = "logging")]
pub fn init_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    let line_colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::BrightBlack)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack);
    let level_colors = line_colors.info(Color::Green).debug(Color::Black);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{color_line}[{target}][{level}{color_line}] {message}\x1B[0m",
                color_line = format_args!(
                    "\x1B[{}m",
                    line_colors.get_color(&record.level()).to_fg_str()
                ),
                target = record.target(),
                level = level_colors.color(record.level()),
                message = message,
            ));
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    // The global is only resolved once per process, so this can only check that it agrees with
    // whatever the environment held at that point.
    #[test]
    #[serial]
    fn global_settings_match_environment() {
        let expect = match env::var(API_BASE_URL_VAR) {
            Ok(v) if !v.is_empty() => v,
            _ => DEFAULT_API_BASE_URL.to_string(),
        };

        assert_eq!(api_base_url(), expect);
        assert_eq!(settings().api_base_url(), expect);
        assert_eq!(api_url(()), format!("{expect}/"));
        assert_eq!(api_url("users"), format!("{expect}/users"));
        assert_eq!(api_url("/users"), format!("{expect}/users"));
        assert!(std::ptr::eq(settings(), settings()));
    }
}
