/// The `settings` module contains [`Settings`], which holds the resolved API base URL, and the
/// [`SettingsBuilder`] used to resolve it.
use crate::{
    error::Error,
    path::{self, PathArg},
    source::{EnvSource, SettingSource},
};
use log::{debug, trace};
use serde::Serialize;
use url::Url;

/// The base URL used when no setting provides one.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:9000";

/// The name of the setting that holds the API base URL.
pub const API_BASE_URL_VAR: &str = "VITE_API_BASE_URL";

/// Where the resolved base URL came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resolution {
    /// It was passed to [`SettingsBuilder::api_base_url`].
    Explicit,
    /// It was read from the named [`SettingSource`].
    Source { name: String },
    /// Nothing provided a value, so [`DEFAULT_API_BASE_URL`] was used.
    Default,
}

/// The resolved API configuration. Once built, this never changes, so it can be shared freely
/// between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    api_base_url: String,
    resolution: Resolution,
}

impl Settings {
    /// Resolves settings from the process environment alone. This is the same as
    /// `SettingsBuilder::new().build()`.
    #[must_use]
    pub fn from_env() -> Self {
        SettingsBuilder::new().build()
    }

    /// The base URL, exactly as it was provided.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Returns the full URL for `path`.
    ///
    /// An empty path, `None`, or `()` is treated as `/`. If the path does not start with `/`, one
    /// is inserted between the base URL and the path. Nothing else about either part is changed.
    #[must_use]
    pub fn api_url<P: PathArg>(&self, path: P) -> String {
        path::join(&self.api_base_url, &path.to_path_string())
    }

    /// Like [`Settings::api_url`], but parses the result into a [`Url`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error::InvalidUrl`] if the joined string is not a valid absolute URL.
    pub fn parse_api_url<P: PathArg>(&self, path: P) -> Result<Url, Error> {
        parse_url(self.api_url(path))
    }

    /// Parses the base URL itself into a [`Url`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error::InvalidUrl`] if the base URL is not a valid absolute URL.
    pub fn parse_api_base_url(&self) -> Result<Url, Error> {
        parse_url(self.api_base_url.clone())
    }
}

fn parse_url(url: String) -> Result<Url, Error> {
    Url::parse(&url).map_err(|source| Error::InvalidUrl { url, source })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            resolution: Resolution::Default,
        }
    }
}

/// `SettingsBuilder` is used to create a [`Settings`] instance.
///
/// The base URL is taken from the first of these that provides a non-empty value:
///
/// 1. The value passed to [`SettingsBuilder::api_base_url`].
/// 2. Each source added with [`SettingsBuilder::source`], in the order they were added. If no
///    sources are added, the process environment is used.
/// 3. [`DEFAULT_API_BASE_URL`].
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SettingsBuilder<'a> {
    api_base_url: Option<&'a str>,
    var_name: Option<&'a str>,
    sources: Vec<Box<dyn SettingSource + 'a>>,
}

impl<'a> SettingsBuilder<'a> {
    /// Returns a new empty `SettingsBuilder`.
    #[must_use]
    pub fn new() -> Self {
        SettingsBuilder::default()
    }

    /// Set the base URL directly. This takes precedence over every source. An empty string is
    /// ignored.
    #[must_use]
    pub fn api_base_url(mut self, api_base_url: &'a str) -> Self {
        self.api_base_url = Some(api_base_url);
        self
    }

    /// Set the name of the setting to look up in each source. This defaults to
    /// `VITE_API_BASE_URL`.
    #[must_use]
    pub fn var_name(mut self, var_name: &'a str) -> Self {
        self.var_name = Some(var_name);
        self
    }

    /// Add a source to consult. Sources are checked in the order they are added.
    #[must_use]
    pub fn source<S: SettingSource + 'a>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Resolves the base URL. This never fails. When nothing provides a value, the default is
    /// used.
    #[must_use]
    pub fn build(self) -> Settings {
        if let Some(url) = self.api_base_url.filter(|u| !u.is_empty()) {
            debug!("Using the API base URL that was set explicitly: `{url}`");
            return Settings {
                api_base_url: url.to_string(),
                resolution: Resolution::Explicit,
            };
        }

        let var_name = self.var_name.unwrap_or(API_BASE_URL_VAR);
        let sources = if self.sources.is_empty() {
            vec![Box::new(EnvSource) as Box<dyn SettingSource + 'a>]
        } else {
            self.sources
        };

        for source in &sources {
            trace!("Looking for {var_name} in {}", source.name());
            match source.get(var_name) {
                Some(url) if !url.is_empty() => {
                    debug!(
                        "Using the API base URL from {var_name} in {}: `{url}`",
                        source.name()
                    );
                    return Settings {
                        api_base_url: url,
                        resolution: Resolution::Source {
                            name: source.name().to_string(),
                        },
                    };
                }
                Some(_) => debug!("{var_name} is empty in {}", source.name()),
                None => {}
            }
        }

        debug!("{var_name} is not set, so the default API base URL, `{DEFAULT_API_BASE_URL}`, will be used");
        Settings::default()
    }
}
